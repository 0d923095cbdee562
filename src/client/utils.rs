use secrecy::{ExposeSecret, SecretString};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use crate::client::config::AuthMode;
use crate::client::consts::{API_KEY_HEADER, API_KEY_QUERY_PARAM};

pub fn build_request(url: &str, api_key: &SecretString, auth: AuthMode) -> tokio_tungstenite::tungstenite::Result<Request> {
    let api_key = api_key.expose_secret();
    if api_key.is_empty() {
        return url.into_client_request();
    }
    match auth {
        AuthMode::Header => {
            let mut request = url.into_client_request()?;
            request.headers_mut().insert(API_KEY_HEADER, api_key.parse()?);
            Ok(request)
        }
        AuthMode::Query => with_query_key(url, api_key).into_client_request(),
    }
}

fn with_query_key(url: &str, api_key: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, separator, API_KEY_QUERY_PARAM, urlencoding::encode(api_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_auth() {
        let key = SecretString::from("abc123");
        let request = build_request("wss://api.lokutor.com/ws/agent", &key, AuthMode::Header).unwrap();
        assert_eq!(request.uri().to_string(), "wss://api.lokutor.com/ws/agent");
        assert_eq!(request.headers().get("x-api-key").unwrap(), "abc123");
    }

    #[test]
    fn test_query_auth() {
        let key = SecretString::from("a b&c");
        let request = build_request("ws://localhost:9000/ws/tts", &key, AuthMode::Query).unwrap();
        assert_eq!(request.uri().to_string(), "ws://localhost:9000/ws/tts?api_key=a%20b%26c");
        assert!(request.headers().get(API_KEY_HEADER).is_none());

        let request = build_request("ws://localhost:9000/ws/tts?region=eu", &key, AuthMode::Query).unwrap();
        assert_eq!(request.uri().query(), Some("region=eu&api_key=a%20b%26c"));
    }

    #[test]
    fn test_empty_key_sends_no_credentials() {
        let key = SecretString::from("");
        let request = build_request("ws://localhost/ws/agent", &key, AuthMode::Header).unwrap();
        assert!(request.headers().get(API_KEY_HEADER).is_none());
        let request = build_request("ws://localhost/ws/agent", &key, AuthMode::Query).unwrap();
        assert_eq!(request.uri().query(), None);
    }

    #[test]
    fn test_invalid_url() {
        let key = SecretString::from("k");
        assert!(build_request("not a url", &key, AuthMode::Header).is_err());
    }
}
