/// Sample rate used by the current voice agent and TTS servers.
pub const SAMPLE_RATE: u32 = 44_100;
/// Sample rate documented by the older SDK variant.
pub const LEGACY_SAMPLE_RATE: u32 = 16_000;
pub const CHANNELS: u16 = 1;
pub const CHUNK_DURATION_MS: u32 = 20;
/// Bytes per PCM16 sample.
pub const SAMPLE_WIDTH: usize = 2;

/// Raw little-endian PCM16 stream layout exchanged with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    sample_rate: u32,
    channels: u16,
    chunk_duration_ms: u32,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            channels: CHANNELS,
            chunk_duration_ms: CHUNK_DURATION_MS,
        }
    }
}

impl AudioFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn legacy() -> Self {
        Self::default().with_sample_rate(LEGACY_SAMPLE_RATE)
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_chunk_duration_ms(mut self, chunk_duration_ms: u32) -> Self {
        self.chunk_duration_ms = chunk_duration_ms;
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn chunk_duration_ms(&self) -> u32 {
        self.chunk_duration_ms
    }

    /// Samples per chunk, e.g. 882 for 20 ms at 44.1 kHz.
    pub fn chunk_size(&self) -> usize {
        (self.sample_rate as u64 * self.chunk_duration_ms as u64 / 1000) as usize
    }

    pub fn chunk_bytes(&self) -> usize {
        self.chunk_size() * self.channels as usize * SAMPLE_WIDTH
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_chunk_size() {
        let format = AudioFormat::new();
        assert_eq!(format.sample_rate(), 44_100);
        assert_eq!(format.chunk_size(), 882);
        assert_eq!(format.chunk_bytes(), 1764);

        let legacy = AudioFormat::legacy();
        assert_eq!(legacy.chunk_size(), 320);
        assert_eq!(legacy.with_chunk_duration_ms(10).chunk_size(), 160);
    }
}
