//! In-process WebSocket server standing in for the Lokutor endpoints.
#![allow(dead_code)]

use std::future::Future;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use lokutor::{SessionObserver, Status};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_hdr_async, WebSocketStream};

pub type ServerWs = WebSocketStream<TcpStream>;

pub const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
pub struct Handshake {
    pub uri: String,
    pub api_key: Option<String>,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Accepts one connection on `path` and runs `script` on it.
///
/// Returns the `ws://` URL to connect to and a handle resolving to the handshake and the
/// script's output.
pub async fn serve_once<F, Fut, T>(path: &str, script: F) -> (String, JoinHandle<(Handshake, T)>)
where
    F: FnOnce(ServerWs) -> Fut + Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("failed to bind mock server");
    let url = format!("ws://{}{}", listener.local_addr().expect("no local addr"), path);

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("failed to accept");
        let mut handshake = Handshake::default();
        let ws = accept_hdr_async(stream, |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            handshake.uri = req.uri().to_string();
            handshake.api_key = req
                .headers()
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            Ok(resp)
        })
        .await
        .expect("handshake failed");
        let output = script(ws).await;
        (handshake, output)
    });

    (url, handle)
}

/// A URL nothing listens on.
pub async fn refused_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("failed to bind");
    let addr = listener.local_addr().expect("no local addr");
    drop(listener);
    format!("ws://{}{}", addr, path)
}

/// Accepts the TCP connection on `path` but never answers the WebSocket handshake.
pub async fn silent_url(path: &str) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("failed to bind");
    let url = format!("ws://{}{}", listener.local_addr().expect("no local addr"), path);
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("failed to accept");
        tokio::time::sleep(TIMEOUT).await;
        drop(stream);
    });
    (url, handle)
}

/// Next text or binary frame from the client.
pub async fn next_message(ws: &mut ServerWs) -> Message {
    loop {
        let message = tokio::time::timeout(TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for client frame");
        match message {
            Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
            Some(Ok(message)) => return message,
            other => panic!("connection ended: {:?}", other),
        }
    }
}

pub async fn next_json(ws: &mut ServerWs) -> serde_json::Value {
    match next_message(ws).await {
        Message::Text(text) => serde_json::from_str(&text).expect("client sent invalid JSON"),
        other => panic!("expected a text frame, got {:?}", other),
    }
}

/// Reads the prompt, voice and language frames a voice agent sends first.
pub async fn read_config(ws: &mut ServerWs) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    for _ in 0..3 {
        frames.push(next_json(ws).await);
    }
    frames
}

pub async fn send_text(ws: &mut ServerWs, value: serde_json::Value) {
    ws.send(Message::Text(value.to_string())).await.expect("failed to send text");
}

pub async fn send_binary(ws: &mut ServerWs, bytes: &[u8]) {
    ws.send(Message::Binary(bytes.to_vec())).await.expect("failed to send binary");
}

/// Starts the close handshake and waits for the client's reply.
pub async fn close(mut ws: ServerWs) {
    if ws.close(None).await.is_err() {
        return;
    }
    let _ = tokio::time::timeout(TIMEOUT, async {
        while let Some(Ok(_)) = ws.next().await {}
    })
    .await;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
    Transcription(String),
    Response(String),
    Audio(Vec<u8>),
    Status(Status),
    Error(String),
    Closed(Option<String>),
}

/// Observer forwarding every callback into a channel.
pub struct Recorder {
    tx: mpsc::UnboundedSender<Seen>,
}

impl Recorder {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Seen>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn record(&self, seen: Seen) {
        let _ = self.tx.send(seen);
    }
}

impl SessionObserver for Recorder {
    fn on_transcription(&self, text: &str) {
        self.record(Seen::Transcription(text.to_string()));
    }

    fn on_response(&self, text: &str) {
        self.record(Seen::Response(text.to_string()));
    }

    fn on_audio(&self, chunk: &[u8]) {
        self.record(Seen::Audio(chunk.to_vec()));
    }

    fn on_status(&self, status: &Status) {
        self.record(Seen::Status(status.clone()));
    }

    fn on_error(&self, message: &str) {
        self.record(Seen::Error(message.to_string()));
    }

    fn on_close(&self, reason: Option<&str>) {
        self.record(Seen::Closed(reason.map(str::to_string)));
    }
}

pub async fn next_seen(rx: &mut mpsc::UnboundedReceiver<Seen>) -> Seen {
    tokio::time::timeout(TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for callback")
        .expect("observer dropped")
}

/// Everything seen up to and including the close callback.
pub async fn seen_until_closed(rx: &mut mpsc::UnboundedReceiver<Seen>) -> Vec<Seen> {
    let mut seen = Vec::new();
    loop {
        let next = next_seen(rx).await;
        let closed = matches!(next, Seen::Closed(_));
        seen.push(next);
        if closed {
            return seen;
        }
    }
}
