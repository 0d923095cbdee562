pub mod audio;
pub mod events;
pub mod synthesis;

pub use audio::{AudioFormat, Language, VoiceStyle};
pub use events::{ClientEvent, Role, ServerEvent, Status};
pub use synthesis::{SynthesisRequest, Visemes};
