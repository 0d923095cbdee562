//! Streams a WAV file into a voice agent session and records the agent's reply.
//!
//! `cargo run --example agent -- --input question.wav --output reply.wav`

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lokutor::{AgentEvent, Callbacks, Config, Language, SessionSettings, Status, VoiceAgentClient, VoiceStyle};
use lokutor_utils::{audio, PlaybackBuffer};
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;

const OUTPUT_LATENCY_MS: u32 = 30_000;

#[derive(Parser, Debug)]
#[command(version, about = "Talk to a Lokutor voice agent with a recorded question")]
struct Args {
    /// WAV file with the user's speech
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the agent's audio
    #[arg(short, long, default_value = "reply.wav")]
    output: PathBuf,

    #[arg(long, default_value = "You are a friendly assistant. Keep answers short.")]
    prompt: String,

    #[arg(long, default_value = "F1")]
    voice: VoiceStyle,

    #[arg(long, default_value = "en")]
    language: Language,

    /// Seconds to wait for the reply after the input is sent
    #[arg(long, default_value_t = 10)]
    wait: u64,
}

/// Reads the first channel of a WAV file as normalized samples.
fn read_wav(path: &PathBuf) -> anyhow::Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };
    let mono = samples.into_iter().step_by(channels.max(1)).collect();
    Ok((mono, spec.sample_rate))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();

    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let format = config.audio();

    let (samples, rate) = read_wav(&args.input)?;
    let samples = audio::resample(&samples, rate, format.sample_rate(), format.chunk_size())?;
    println!("input: {} samples at {} Hz", samples.len(), format.sample_rate());

    let playback = Arc::new(PlaybackBuffer::with_latency(format.sample_rate(), OUTPUT_LATENCY_MS));
    let interrupted = playback.clone();
    let observer = Callbacks::new()
        .on_transcription(|text| println!("you: {}", text))
        .on_response(|text| println!("agent: {}", text))
        .on_status(move |status| {
            if *status == Status::Interrupted {
                let dropped = interrupted.clear();
                println!("interrupted, dropped {} queued samples", dropped);
            }
        })
        .on_error(|message| eprintln!("error: {}", message));

    let settings = SessionSettings::new(&args.prompt)
        .with_voice(args.voice)
        .with_language(args.language);
    let mut client = VoiceAgentClient::new(config, settings, observer);
    let queued = playback.clone();
    client.on_audio(move |chunk| {
        queued.push_pcm16(chunk);
    });
    let mut events = client.events();
    client.connect().await?;

    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let AgentEvent::Closed(reason) = event {
                println!("session closed: {:?}", reason);
                break;
            }
        }
    });

    // pace the upload like a live microphone
    let mut ticker = tokio::time::interval(Duration::from_millis(format.chunk_duration_ms() as u64));
    for chunk in audio::split_for_chunks(&samples, format.chunk_size()) {
        ticker.tick().await;
        client.send_audio(&audio::f32_to_pcm16(&chunk));
    }
    // trailing silence lets the server detect the end of the turn
    let silence = vec![0u8; format.chunk_bytes()];
    for _ in 0..50 {
        ticker.tick().await;
        client.send_audio(&silence);
    }

    tokio::time::sleep(Duration::from_secs(args.wait)).await;
    client.disconnect();
    println!("stats: {:?}", client.stats());

    let spec = hound::WavSpec {
        channels: format.channels(),
        sample_rate: format.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&args.output, spec)?;
    let mut frame = vec![0f32; format.chunk_size()];
    while !playback.is_empty() {
        let used = playback.fill(&mut frame);
        for &sample in &frame[..used] {
            writer.write_sample((sample * i16::MAX as f32) as i16)?;
        }
    }
    writer.finalize()?;
    println!("wrote {}", args.output.display());
    Ok(())
}
