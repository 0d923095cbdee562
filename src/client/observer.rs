use std::sync::{Arc, Mutex};

use lokutor_types::Status;

/// Receives the decoded events of a voice agent session.
///
/// Every method defaults to a no-op. Calls come from the connection's reader task, one at a time
/// and in wire order, so a slow method delays the next event.
pub trait SessionObserver: Send + Sync + 'static {
    /// The server transcribed the user's speech.
    fn on_transcription(&self, _text: &str) {}

    /// Text of the agent's reply.
    fn on_response(&self, _text: &str) {}

    /// Raw PCM16 chunk, whether it arrived as a binary frame or as base64 JSON.
    fn on_audio(&self, _chunk: &[u8]) {}

    fn on_status(&self, _status: &Status) {}

    /// Server-reported or transport errors. Server errors do not end the session.
    fn on_error(&self, _message: &str) {}

    fn on_close(&self, _reason: Option<&str>) {}
}

impl SessionObserver for () {}

type TextCallback = Box<dyn Fn(&str) + Send + Sync>;
type StatusCallback = Box<dyn Fn(&Status) + Send + Sync>;
type CloseCallback = Box<dyn Fn(Option<&str>) + Send + Sync>;
pub type AudioListener = Box<dyn Fn(&[u8]) + Send + Sync>;

/// Closure-based [`SessionObserver`].
#[derive(Default)]
pub struct Callbacks {
    on_transcription: Option<TextCallback>,
    on_response: Option<TextCallback>,
    on_audio: Option<AudioListener>,
    on_status: Option<StatusCallback>,
    on_error: Option<TextCallback>,
    on_close: Option<CloseCallback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_transcription(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_transcription = Some(Box::new(f));
        self
    }

    pub fn on_response(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_response = Some(Box::new(f));
        self
    }

    pub fn on_audio(mut self, f: impl Fn(&[u8]) + Send + Sync + 'static) -> Self {
        self.on_audio = Some(Box::new(f));
        self
    }

    pub fn on_status(mut self, f: impl Fn(&Status) + Send + Sync + 'static) -> Self {
        self.on_status = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn on_close(mut self, f: impl Fn(Option<&str>) + Send + Sync + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }
}

impl SessionObserver for Callbacks {
    fn on_transcription(&self, text: &str) {
        if let Some(f) = &self.on_transcription {
            f(text);
        }
    }

    fn on_response(&self, text: &str) {
        if let Some(f) = &self.on_response {
            f(text);
        }
    }

    fn on_audio(&self, chunk: &[u8]) {
        if let Some(f) = &self.on_audio {
            f(chunk);
        }
    }

    fn on_status(&self, status: &Status) {
        if let Some(f) = &self.on_status {
            f(status);
        }
    }

    fn on_error(&self, message: &str) {
        if let Some(f) = &self.on_error {
            f(message);
        }
    }

    fn on_close(&self, reason: Option<&str>) {
        if let Some(f) = &self.on_close {
            f(reason);
        }
    }
}

/// Ordered multicast of audio chunks. Listeners must not register listeners from inside a call.
#[derive(Clone, Default)]
pub(crate) struct AudioListeners(Arc<Mutex<Vec<AudioListener>>>);

impl AudioListeners {
    pub(crate) fn register(&self, listener: AudioListener) {
        if let Ok(mut listeners) = self.0.lock() {
            listeners.push(listener);
        } else {
            tracing::error!("failed to register audio listener");
        }
    }

    pub(crate) fn broadcast(&self, chunk: &[u8]) {
        if let Ok(listeners) = self.0.lock() {
            for listener in listeners.iter() {
                listener(chunk);
            }
        }
    }
}

/// Decoded session event, as published on [`crate::VoiceAgentClient::events`].
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    Transcription(String),
    Response(String),
    Status(Status),
    Error(String),
    Audio(Vec<u8>),
    Closed(Option<String>),
}
