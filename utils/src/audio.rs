use base64::Engine;
use rubato::{FastFixedIn, PolynomialDegree, Resampler};

pub fn create_resampler(in_sampling_rate: f64, out_sampling_rate: f64, chunk_size: usize) -> anyhow::Result<FastFixedIn<f32>> {
    let resampler = FastFixedIn::<f32>::new(
        out_sampling_rate / in_sampling_rate,
        1.0,
        PolynomialDegree::Cubic,
        chunk_size,
        1,
    )?;
    Ok(resampler)
}

/// Converts mono samples between rates, e.g. a 16 kHz microphone to the 44.1 kHz session format.
pub fn resample(samples: &[f32], in_sampling_rate: u32, out_sampling_rate: u32, chunk_size: usize) -> anyhow::Result<Vec<f32>> {
    if in_sampling_rate == out_sampling_rate {
        return Ok(samples.to_vec());
    }
    let mut resampler = create_resampler(in_sampling_rate as f64, out_sampling_rate as f64, chunk_size)?;
    let mut out = Vec::new();
    for chunk in split_for_chunks(samples, chunk_size) {
        let mut processed = resampler.process(&[chunk.as_slice()], None)?;
        out.append(&mut processed[0]);
    }
    Ok(out)
}

/// Splits into fixed-size chunks, zero-padding the last one.
pub fn split_for_chunks<T: Copy + Default>(samples: &[T], chunk_size: usize) -> Vec<Vec<T>> {
    samples.chunks(chunk_size).map(|chunk| {
        let mut chunk = chunk.to_vec();
        chunk.resize(chunk_size, T::default());
        chunk
    }).collect()
}

pub fn decode(fragment: &str) -> anyhow::Result<Vec<u8>> {
    Ok(base64::engine::general_purpose::STANDARD.decode(fragment)?)
}

pub fn encode(pcm16: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(pcm16)
}

/// Little-endian PCM16 bytes to normalized samples. A trailing odd byte is ignored.
pub fn pcm16_to_f32(pcm16: &[u8]) -> Vec<f32> {
    if pcm16.len() % 2 != 0 {
        tracing::warn!("odd PCM16 payload length: {}", pcm16.len());
    }
    pcm16.chunks_exact(2).map(|chunk| {
        let v = i16::from_le_bytes([chunk[0], chunk[1]]);
        (v as f32 / i16::MAX as f32).clamp(-1.0, 1.0)
    }).collect()
}

pub fn f32_to_pcm16(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|&sample| {
        ((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16).to_le_bytes()
    }).collect()
}

pub fn i16_to_pcm16(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|sample| sample.to_le_bytes()).collect()
}
