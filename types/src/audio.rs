mod consts;
mod format;

pub use consts::*;
pub use format::*;

/// Audio data encoded as base64
pub type Base64EncodedAudioBytes = String;
