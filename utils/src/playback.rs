use std::sync::{Mutex, MutexGuard};

use ringbuf::traits::{Consumer, Observer, Producer};
use ringbuf::HeapRb;

use crate::audio::pcm16_to_f32;

/// Queue between session audio callbacks and an output device.
///
/// Chunks are pushed from the session side and drained by the device callback. When the agent
/// reports `interrupted` the queued speech is stale and `clear` drops it.
pub struct PlaybackBuffer {
    samples: Mutex<HeapRb<f32>>,
}

impl PlaybackBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Mutex::new(HeapRb::new(capacity.max(1))),
        }
    }

    /// Sized to hold `latency_ms` of mono audio.
    pub fn with_latency(sample_rate: u32, latency_ms: u32) -> Self {
        Self::new(sample_rate as usize * latency_ms as usize / 1000)
    }

    fn lock(&self) -> MutexGuard<'_, HeapRb<f32>> {
        self.samples.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queues a PCM16 chunk. Returns how many samples fit; the rest are dropped.
    pub fn push_pcm16(&self, pcm16: &[u8]) -> usize {
        let samples = pcm16_to_f32(pcm16);
        let pushed = self.lock().push_slice(&samples);
        if pushed < samples.len() {
            tracing::warn!("playback buffer full, dropped {} samples", samples.len() - pushed);
        }
        pushed
    }

    /// Fills `out` from the queue and pads with silence. Returns the number of queued samples used.
    pub fn fill(&self, out: &mut [f32]) -> usize {
        let popped = self.lock().pop_slice(out);
        out[popped..].fill(0.0);
        popped
    }

    /// Drops everything queued. Returns the number of discarded samples.
    pub fn clear(&self) -> usize {
        self.lock().clear()
    }

    pub fn len(&self) -> usize {
        self.lock().occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
