use std::time::Duration;

pub const LOKUTOR_API_KEY: &str = "LOKUTOR_API_KEY";
pub const LOKUTOR_AGENT_URL: &str = "LOKUTOR_AGENT_URL";
pub const LOKUTOR_TTS_URL: &str = "LOKUTOR_TTS_URL";
pub const LOKUTOR_AUTH: &str = "LOKUTOR_AUTH";
pub const LOKUTOR_SAMPLE_RATE: &str = "LOKUTOR_SAMPLE_RATE";
pub const LOKUTOR_CONNECT_TIMEOUT: &str = "LOKUTOR_CONNECT_TIMEOUT";

pub const DEFAULT_VOICE_AGENT_URL: &str = "wss://api.lokutor.com/ws/agent";
pub const DEFAULT_TTS_URL: &str = "wss://api.lokutor.com/ws/tts";
/// TTS path documented by the older Python SDK.
pub const LEGACY_TTS_URL: &str = "wss://api.lokutor.com/ws/handler";

pub const API_KEY_HEADER: &str = "X-API-Key";
pub const API_KEY_QUERY_PARAM: &str = "api_key";

pub const DEFAULT_CAPACITY: usize = 1024;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
