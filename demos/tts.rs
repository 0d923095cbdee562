//! Synthesizes text to a WAV file.
//!
//! `cargo run --example tts -- "Hello from Lokutor" --voice M1 --output hello.wav`

use std::path::PathBuf;

use clap::Parser;
use futures::StreamExt;
use lokutor::{Config, Language, SynthesisRequest, TtsClient, TtsEvent, VoiceStyle};
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;

#[derive(Parser, Debug)]
#[command(version, about = "Synthesize speech with Lokutor")]
struct Args {
    text: String,

    #[arg(short, long, default_value = "speech.wav")]
    output: PathBuf,

    #[arg(long, default_value = "F1")]
    voice: VoiceStyle,

    #[arg(long, default_value = "en")]
    language: Language,

    #[arg(long, default_value_t = lokutor::types::synthesis::DEFAULT_SPEED)]
    speed: f64,

    #[arg(long, default_value_t = lokutor::types::synthesis::DEFAULT_STEPS)]
    steps: u32,

    /// Print lip-sync frames as they arrive
    #[arg(long)]
    visemes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let format = config.audio();

    let request = SynthesisRequest::new(&args.text)
        .with_voice(args.voice)
        .with_language(args.language)
        .with_speed(args.speed)
        .with_steps(args.steps)
        .with_visemes(args.visemes);

    let spec = hound::WavSpec {
        channels: format.channels(),
        sample_rate: format.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&args.output, spec)?;

    let mut stream = TtsClient::new(config).stream(&request).await?;
    let mut bytes = 0;
    while let Some(event) = stream.next().await {
        match event? {
            TtsEvent::Audio(chunk) => {
                bytes += chunk.len();
                for sample in chunk.chunks_exact(2) {
                    writer.write_sample(i16::from_le_bytes([sample[0], sample[1]]))?;
                }
            }
            TtsEvent::Visemes(visemes) => println!("visemes: {}", serde_json::Value::Array(visemes)),
        }
    }
    writer.finalize()?;

    let seconds = bytes as f64 / (format.sample_rate() as f64 * 2.0);
    println!("wrote {:.2}s of audio to {}", seconds, args.output.display());
    Ok(())
}
