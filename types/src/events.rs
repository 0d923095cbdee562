mod server;

pub use server::{Role, Status};

use crate::audio::{Base64EncodedAudioBytes, Language, VoiceStyle};

/// Session parameter pushed to the voice agent, `{"type": ..., "data": ...}` on the wire.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "prompt")]
    Prompt(String),
    #[serde(rename = "voice")]
    Voice(VoiceStyle),
    #[serde(rename = "language")]
    Language(Language),
}

/// JSON text frame sent by the voice agent.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "transcript")]
    Transcript {
        #[serde(default)]
        role: Role,
        data: String,
    },
    #[serde(rename = "status")]
    Status { data: Status },
    #[serde(rename = "error")]
    Error { data: String },
    /// Audio for transports without binary frames.
    #[serde(rename = "audio")]
    Audio { data: Base64EncodedAudioBytes },
}
