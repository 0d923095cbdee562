//! Client for the Lokutor voice agent and text-to-speech WebSocket services.
//!
//! ```no_run
//! use lokutor::{Callbacks, Config, SessionSettings, VoiceAgentClient};
//!
//! # async fn run() -> lokutor::Result<()> {
//! let observer = Callbacks::new()
//!     .on_transcription(|text| println!("you: {}", text))
//!     .on_response(|text| println!("agent: {}", text));
//! let mut client = VoiceAgentClient::new(Config::new(), SessionSettings::new("You are a helpful assistant"), observer);
//! client.connect().await?;
//! client.send_audio(&[0u8; 1764]);
//! client.disconnect();
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use lokutor_types as types;
pub use client::*;
pub use error::{Error, Result};
pub use types::{AudioFormat, Language, Status, SynthesisRequest, VoiceStyle};

#[cfg(feature = "utils")]
pub use lokutor_utils as utils;
