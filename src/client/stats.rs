#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    audio_chunks_sent: u64,
    audio_chunks_dropped: u64,
    audio_chunks_received: u64,
    audio_bytes_received: u64,
    messages_dropped: u64,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_sent(&mut self) {
        self.audio_chunks_sent += 1;
    }

    pub(crate) fn record_send_dropped(&mut self) {
        self.audio_chunks_dropped += 1;
    }

    pub(crate) fn record_received(&mut self, bytes: usize) {
        self.audio_chunks_received += 1;
        self.audio_bytes_received += bytes as u64;
    }

    pub(crate) fn record_message_dropped(&mut self) {
        self.messages_dropped += 1;
    }

    pub fn audio_chunks_sent(&self) -> u64 {
        self.audio_chunks_sent
    }

    /// Outbound chunks lost to a full send buffer.
    pub fn audio_chunks_dropped(&self) -> u64 {
        self.audio_chunks_dropped
    }

    pub fn audio_chunks_received(&self) -> u64 {
        self.audio_chunks_received
    }

    pub fn audio_bytes_received(&self) -> u64 {
        self.audio_bytes_received
    }

    /// Inbound text frames that were not valid protocol messages.
    pub fn messages_dropped(&self) -> u64 {
        self.messages_dropped
    }
}
