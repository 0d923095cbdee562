use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use base64::Engine;
use lokutor_types::{ClientEvent, Language, Role, ServerEvent, VoiceStyle};
use tokio::sync::broadcast;

use crate::client::config::{Config, SessionSettings};
use crate::client::observer::{AgentEvent, AudioListeners, SessionObserver};
use crate::client::stats::Stats;
use crate::client::transport::{self, Frame, FrameHandler, Transport};
use crate::error::{Error, Result};

pub type AgentEventRx = broadcast::Receiver<AgentEvent>;

/// Lifecycle of a voice agent session. A closed session is never reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    /// Open and configured; audio flows both ways.
    Active,
    Closed,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Bidirectional voice conversation over one WebSocket.
pub struct VoiceAgentClient {
    config: Config,
    settings: SessionSettings,
    observer: Arc<dyn SessionObserver>,
    listeners: AudioListeners,
    state: Arc<Mutex<SessionState>>,
    stats: Arc<Mutex<Stats>>,
    s_tx: broadcast::Sender<AgentEvent>,
    transport: Option<Transport>,
}

impl VoiceAgentClient {
    pub fn new(config: Config, settings: SessionSettings, observer: impl SessionObserver) -> Self {
        let (s_tx, _) = broadcast::channel(config.capacity());
        Self {
            config,
            settings,
            observer: Arc::new(observer),
            listeners: AudioListeners::default(),
            state: Arc::new(Mutex::new(SessionState::Idle)),
            stats: Arc::new(Mutex::new(Stats::new())),
            s_tx,
            transport: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn state(&self) -> SessionState {
        *lock(&self.state)
    }

    fn set_state(&self, state: SessionState) {
        *lock(&self.state) = state;
    }

    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Active
    }

    pub fn stats(&self) -> Stats {
        lock(&self.stats).clone()
    }

    /// Subscribes to decoded session events. Only events after the call are received.
    pub fn events(&self) -> AgentEventRx {
        self.s_tx.subscribe()
    }

    /// Adds an audio listener. Listeners get every chunk after the observer, in registration order.
    pub fn on_audio(&self, listener: impl Fn(&[u8]) + Send + Sync + 'static) {
        self.listeners.register(Box::new(listener));
    }

    /// Opens the session and pushes prompt, voice and language.
    ///
    /// A transport failure is reported to the observer, returned, and closes the client.
    pub async fn connect(&mut self) -> Result<()> {
        {
            let mut state = lock(&self.state);
            match *state {
                SessionState::Idle => *state = SessionState::Connecting,
                SessionState::Closed => return Err(Error::Closed),
                SessionState::Connecting | SessionState::Active => return Err(Error::AlreadyConnected),
            }
        }

        tracing::info!("connecting to {}", self.config.agent_url());
        let (transport, read) = match Transport::open(&self.config, self.config.agent_url()).await {
            Ok(opened) => opened,
            Err(e) => {
                tracing::error!("connection failed: {}", e);
                self.set_state(SessionState::Closed);
                self.observer.on_error(&format!("connection failed: {}", e));
                return Err(e);
            }
        };

        for event in self.settings.control_events() {
            if let Err(e) = transport.send_json(&event).await {
                self.set_state(SessionState::Closed);
                return Err(e);
            }
        }
        tracing::info!(
            "configured: voice={}, language={}",
            self.settings.voice(),
            self.settings.language()
        );
        self.set_state(SessionState::Active);

        let dispatcher = Dispatcher {
            observer: self.observer.clone(),
            listeners: self.listeners.clone(),
            state: self.state.clone(),
            stats: self.stats.clone(),
            s_tx: self.s_tx.clone(),
        };
        tokio::spawn(transport::pump(read, dispatcher));
        self.transport = Some(transport);
        Ok(())
    }

    /// Queues one PCM16 chunk as a binary frame. Dropped silently unless the session is active.
    pub fn send_audio(&self, pcm16: &[u8]) {
        if !self.is_connected() {
            tracing::trace!("not connected, dropping audio chunk");
            return;
        }
        let Some(transport) = &self.transport else {
            return;
        };
        if transport.try_send_binary(pcm16.to_vec()) {
            lock(&self.stats).record_sent();
        } else {
            lock(&self.stats).record_send_dropped();
        }
    }

    pub async fn set_prompt(&mut self, prompt: &str) -> Result<()> {
        self.settings.set_prompt(prompt);
        self.push(ClientEvent::Prompt(prompt.to_string())).await
    }

    pub async fn set_voice(&mut self, voice: VoiceStyle) -> Result<()> {
        self.settings.set_voice(voice);
        self.push(ClientEvent::Voice(voice)).await
    }

    pub async fn set_language(&mut self, language: Language) -> Result<()> {
        self.settings.set_language(language.clone());
        self.push(ClientEvent::Language(language)).await
    }

    // Stored settings are sent on connect; only an active session needs the update now.
    async fn push(&self, event: ClientEvent) -> Result<()> {
        match &self.transport {
            Some(transport) if self.is_connected() => transport.send_json(&event).await,
            _ => Ok(()),
        }
    }

    /// Closes the session. Safe to call repeatedly or before connecting.
    pub fn disconnect(&mut self) {
        self.set_state(SessionState::Closed);
        if let Some(transport) = self.transport.take() {
            transport.close();
            tracing::info!("disconnected");
        }
    }
}

impl Drop for VoiceAgentClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Routes inbound frames of one session to the observer, listeners and event channel.
struct Dispatcher {
    observer: Arc<dyn SessionObserver>,
    listeners: AudioListeners,
    state: Arc<Mutex<SessionState>>,
    stats: Arc<Mutex<Stats>>,
    s_tx: broadcast::Sender<AgentEvent>,
}

impl Dispatcher {
    fn publish(&self, event: impl FnOnce() -> AgentEvent) {
        if self.s_tx.receiver_count() > 0 && self.s_tx.send(event()).is_err() {
            tracing::debug!("no event subscribers left");
        }
    }

    fn deliver_audio(&self, chunk: Vec<u8>) {
        tracing::trace!("audio chunk: {} bytes", chunk.len());
        lock(&self.stats).record_received(chunk.len());
        self.observer.on_audio(&chunk);
        self.listeners.broadcast(&chunk);
        self.publish(|| AgentEvent::Audio(chunk));
    }

    fn dispatch_text(&self, text: &str) {
        let event = match serde_json::from_str::<ServerEvent>(text) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!("dropping unrecognized message: {}", e);
                lock(&self.stats).record_message_dropped();
                return;
            }
        };

        match event {
            ServerEvent::Transcript { role: Role::User, data } => {
                tracing::info!("user: {}", data);
                self.observer.on_transcription(&data);
                self.publish(|| AgentEvent::Transcription(data));
            }
            ServerEvent::Transcript { role: Role::Agent, data } => {
                tracing::info!("agent: {}", data);
                self.observer.on_response(&data);
                self.publish(|| AgentEvent::Response(data));
            }
            ServerEvent::Status { data } => {
                tracing::debug!("status: {}", data);
                self.observer.on_status(&data);
                self.publish(|| AgentEvent::Status(data));
            }
            ServerEvent::Error { data } => {
                tracing::error!("server error: {}", data);
                self.observer.on_error(&data);
                self.publish(|| AgentEvent::Error(data));
            }
            ServerEvent::Audio { data } => {
                match base64::engine::general_purpose::STANDARD.decode(&data) {
                    Ok(chunk) => self.deliver_audio(chunk),
                    Err(e) => {
                        tracing::debug!("dropping undecodable audio message: {}", e);
                        lock(&self.stats).record_message_dropped();
                    }
                }
            }
        }
    }
}

impl FrameHandler for Dispatcher {
    fn on_frame(&mut self, frame: Frame) -> ControlFlow<()> {
        match frame {
            Frame::Text(text) => self.dispatch_text(&text),
            Frame::Binary(chunk) => self.deliver_audio(chunk),
        }
        ControlFlow::Continue(())
    }

    fn on_error(&mut self, error: Error) {
        // the caller already hung up
        if *lock(&self.state) == SessionState::Closed {
            return;
        }
        let message = error.to_string();
        self.observer.on_error(&message);
        self.publish(|| AgentEvent::Error(message));
    }

    fn on_close(&mut self, reason: Option<String>) {
        *lock(&self.state) = SessionState::Closed;
        self.observer.on_close(reason.as_deref());
        self.publish(|| AgentEvent::Closed(reason));
    }
}
