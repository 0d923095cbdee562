use crate::audio::{Language, VoiceStyle};

pub const DEFAULT_SPEED: f64 = 1.05;
pub const DEFAULT_STEPS: u32 = 24;
pub const MIN_STEPS: u32 = 1;
pub const MAX_STEPS: u32 = 50;

/// Viseme payload forwarded verbatim from the TTS server.
pub type Visemes = Vec<serde_json::Value>;

/// One-shot request sent to the TTS endpoint right after the socket opens.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SynthesisRequest {
    /// Text to synthesize
    text: String,
    voice: VoiceStyle,
    lang: Language,
    /// Speech rate multiplier
    speed: f64,
    /// Inference steps, higher is slower and cleaner
    steps: u32,
    /// Ask the server for lip-sync data alongside the audio
    visemes: bool,
}

impl SynthesisRequest {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            voice: VoiceStyle::default(),
            lang: Language::default(),
            speed: DEFAULT_SPEED,
            steps: DEFAULT_STEPS,
            visemes: false,
        }
    }

    pub fn with_voice(mut self, voice: VoiceStyle) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_language(mut self, lang: Language) -> Self {
        self.lang = lang;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Clamped to `MIN_STEPS..=MAX_STEPS`.
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps.clamp(MIN_STEPS, MAX_STEPS);
        self
    }

    pub fn with_visemes(mut self, visemes: bool) -> Self {
        self.visemes = visemes;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn voice(&self) -> VoiceStyle {
        self.voice
    }

    pub fn language(&self) -> &Language {
        &self.lang
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn visemes(&self) -> bool {
        self.visemes
    }
}
