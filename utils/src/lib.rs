pub mod audio;
pub mod playback;

pub use playback::PlaybackBuffer;
