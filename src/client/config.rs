use std::env;
use std::str::FromStr;
use std::time::Duration;

use lokutor_types::{AudioFormat, ClientEvent, Language, VoiceStyle};
use secrecy::SecretString;

use crate::client::consts::*;

/// How the API key travels with the WebSocket handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// `X-API-Key` request header.
    #[default]
    Header,
    /// `api_key` query parameter, for environments that cannot set handshake headers.
    Query,
}

impl FromStr for AuthMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "header" => Ok(AuthMode::Header),
            "query" => Ok(AuthMode::Query),
            _ => Err(ConfigError::InvalidValue(LOKUTOR_AUTH.to_string(), s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Connection settings shared by the voice agent and TTS clients.
#[derive(Debug, Clone)]
pub struct Config {
    agent_url: String,
    tts_url: String,
    api_key: SecretString,
    auth: AuthMode,
    audio: AudioFormat,
    capacity: usize,
    connect_timeout: Duration,
}

pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    pub fn with_agent_url(mut self, agent_url: &str) -> Self {
        self.config.agent_url = agent_url.to_string();
        self
    }

    pub fn with_tts_url(mut self, tts_url: &str) -> Self {
        self.config.tts_url = tts_url.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.config.api_key = SecretString::from(api_key.to_string());
        self
    }

    pub fn with_auth(mut self, auth: AuthMode) -> Self {
        self.config.auth = auth;
        self
    }

    pub fn with_audio_format(mut self, audio: AudioFormat) -> Self {
        self.config.audio = audio;
        self
    }

    /// Size of the outbound and event channels.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity.max(1);
        self
    }

    /// Upper bound on the WebSocket handshake.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.config.connect_timeout = connect_timeout;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Default endpoints, API key from `LOKUTOR_API_KEY` or empty.
    pub fn new() -> Self {
        Self {
            agent_url: DEFAULT_VOICE_AGENT_URL.to_string(),
            tts_url: DEFAULT_TTS_URL.to_string(),
            api_key: env::var(LOKUTOR_API_KEY).unwrap_or_default().into(),
            auth: AuthMode::default(),
            audio: AudioFormat::default(),
            capacity: DEFAULT_CAPACITY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Loads configuration from environment variables.
    ///
    // *   `LOKUTOR_API_KEY`: required.
    // *   `LOKUTOR_AGENT_URL`, `LOKUTOR_TTS_URL`: optional endpoint overrides.
    // *   `LOKUTOR_AUTH`: "header" (default) or "query".
    // *   `LOKUTOR_SAMPLE_RATE`: optional, 44100 unless the deployment says otherwise.
    // *   `LOKUTOR_CONNECT_TIMEOUT`: optional, handshake timeout in seconds (10).
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var(LOKUTOR_API_KEY)
            .map_err(|_| ConfigError::MissingVar(LOKUTOR_API_KEY.to_string()))?;

        let mut builder = ConfigBuilder::new().with_api_key(&api_key);
        if let Ok(url) = env::var(LOKUTOR_AGENT_URL) {
            builder = builder.with_agent_url(&url);
        }
        if let Ok(url) = env::var(LOKUTOR_TTS_URL) {
            builder = builder.with_tts_url(&url);
        }
        if let Ok(auth) = env::var(LOKUTOR_AUTH) {
            builder = builder.with_auth(auth.parse()?);
        }
        if let Ok(rate) = env::var(LOKUTOR_SAMPLE_RATE) {
            let rate = rate
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue(LOKUTOR_SAMPLE_RATE.to_string(), rate.clone()))?;
            builder = builder.with_audio_format(AudioFormat::new().with_sample_rate(rate));
        }
        if let Ok(secs) = env::var(LOKUTOR_CONNECT_TIMEOUT) {
            let secs = secs
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue(LOKUTOR_CONNECT_TIMEOUT.to_string(), secs.clone()))?;
            builder = builder.with_connect_timeout(Duration::from_secs(secs));
        }
        Ok(builder.build())
    }

    pub fn agent_url(&self) -> &str {
        &self.agent_url
    }

    pub fn tts_url(&self) -> &str {
        &self.tts_url
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn auth(&self) -> AuthMode {
        self.auth
    }

    pub fn audio(&self) -> AudioFormat {
        self.audio
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

/// Voice agent parameters pushed on connect and re-sent when changed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    prompt: String,
    voice: VoiceStyle,
    language: Language,
}

impl SessionSettings {
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            voice: VoiceStyle::default(),
            language: Language::default(),
        }
    }

    pub fn with_voice(mut self, voice: VoiceStyle) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn voice(&self) -> VoiceStyle {
        self.voice
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub(crate) fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    pub(crate) fn set_voice(&mut self, voice: VoiceStyle) {
        self.voice = voice;
    }

    pub(crate) fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Control messages in the order the server expects them.
    pub(crate) fn control_events(&self) -> [ClientEvent; 3] {
        [
            ClientEvent::Prompt(self.prompt.clone()),
            ClientEvent::Voice(self.voice),
            ClientEvent::Language(self.language.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .with_api_key("secret")
            .with_agent_url("ws://localhost:8080/ws/agent")
            .with_tts_url(LEGACY_TTS_URL)
            .with_auth(AuthMode::Query)
            .with_audio_format(AudioFormat::legacy())
            .with_capacity(0)
            .with_connect_timeout(Duration::from_millis(500))
            .build();

        assert_eq!(config.api_key().expose_secret(), "secret");
        assert_eq!(config.agent_url(), "ws://localhost:8080/ws/agent");
        assert_eq!(config.tts_url(), "wss://api.lokutor.com/ws/handler");
        assert_eq!(config.auth(), AuthMode::Query);
        assert_eq!(config.audio().sample_rate(), 16_000);
        assert_eq!(config.capacity(), 1);
        assert_eq!(config.connect_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_defaults() {
        let config = Config::builder().with_api_key("k").build();
        assert_eq!(config.agent_url(), DEFAULT_VOICE_AGENT_URL);
        assert_eq!(config.tts_url(), DEFAULT_TTS_URL);
        assert_eq!(config.auth(), AuthMode::Header);
        assert_eq!(config.audio().chunk_size(), 882);
        assert_eq!(config.capacity(), DEFAULT_CAPACITY);
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_auth_mode_from_str() {
        assert_eq!("Query".parse::<AuthMode>().unwrap(), AuthMode::Query);
        assert_eq!("header".parse::<AuthMode>().unwrap(), AuthMode::Header);
        assert!(matches!(
            "cookie".parse::<AuthMode>(),
            Err(ConfigError::InvalidValue(_, _))
        ));
    }

    #[test]
    fn test_control_events_order() {
        let settings = SessionSettings::new("Be kind")
            .with_voice(VoiceStyle::M2)
            .with_language(Language::Spanish);
        assert_eq!(
            settings.control_events(),
            [
                ClientEvent::Prompt("Be kind".to_string()),
                ClientEvent::Voice(VoiceStyle::M2),
                ClientEvent::Language(Language::Spanish),
            ]
        );
    }
}
