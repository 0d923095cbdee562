mod agent;
mod config;
mod consts;
mod observer;
mod stats;
mod transport;
mod tts;
mod utils;

use lokutor_types::SynthesisRequest;

use crate::error::Result;

pub use agent::{AgentEventRx, SessionState, VoiceAgentClient};
pub use config::{AuthMode, Config, ConfigBuilder, ConfigError, SessionSettings};
pub use consts::{DEFAULT_TTS_URL, DEFAULT_VOICE_AGENT_URL, LEGACY_TTS_URL};
pub use observer::{AgentEvent, AudioListener, Callbacks, SessionObserver};
pub use stats::Stats;
pub use tts::{SynthesisObserver, SynthesisStream, SynthesisSummary, TtsClient, TtsEvent};

/// Creates a voice agent client and connects it.
pub async fn connect(config: Config, settings: SessionSettings, observer: impl SessionObserver) -> Result<VoiceAgentClient> {
    let mut client = VoiceAgentClient::new(config, settings, observer);
    client.connect().await?;
    Ok(client)
}

/// Synthesizes `text` with default voice settings and returns the whole PCM16 output.
pub async fn simple_tts(config: Config, text: &str) -> Result<Vec<u8>> {
    let client = TtsClient::new(config);
    let mut pcm = Vec::new();
    client.synthesize(&SynthesisRequest::new(text), &mut pcm).await?;
    Ok(pcm)
}
