use std::ops::ControlFlow;
use std::pin::Pin;
use std::task::{Context, Poll};

use base64::Engine;
use lokutor_types::{ServerEvent, SynthesisRequest, Visemes};
use tokio::sync::mpsc;

use crate::client::config::Config;
use crate::client::transport::{self, Frame, FrameHandler, Transport};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TtsEvent {
    /// Raw PCM16 chunk.
    Audio(Vec<u8>),
    Visemes(Visemes),
}

/// Per-call sink for a synthesis.
pub trait SynthesisObserver: Send {
    fn on_audio(&mut self, chunk: &[u8]);

    fn on_visemes(&mut self, _visemes: &Visemes) {}
}

/// Collects the whole synthesized PCM.
impl SynthesisObserver for Vec<u8> {
    fn on_audio(&mut self, chunk: &[u8]) {
        self.extend_from_slice(chunk);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynthesisSummary {
    chunks: usize,
    bytes: usize,
    viseme_frames: usize,
}

impl SynthesisSummary {
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn bytes(&self) -> usize {
        self.bytes
    }

    pub fn viseme_frames(&self) -> usize {
        self.viseme_frames
    }
}

/// One-shot text-to-speech. Every call opens its own connection.
#[derive(Debug, Clone)]
pub struct TtsClient {
    config: Config,
}

impl TtsClient {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Opens a session, sends `request` and returns the server's output as a stream.
    ///
    /// The stream ends when the server closes the socket; there is no separate end marker, so a
    /// truncated synthesis looks like a complete one. It yields one `Err` if the connection fails
    /// before any audio or visemes arrived.
    pub async fn stream(&self, request: &SynthesisRequest) -> Result<SynthesisStream> {
        tracing::info!(
            "synthesizing {} chars with voice {} at {}",
            request.text().chars().count(),
            request.voice(),
            self.config.tts_url()
        );
        let (transport, read) = Transport::open(&self.config, self.config.tts_url()).await?;
        transport.send_json(request).await?;

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(transport::pump(read, Forwarder { tx, delivered: false }));

        Ok(SynthesisStream {
            rx,
            _transport: transport,
        })
    }

    /// Runs a synthesis to completion, feeding `observer` in arrival order.
    pub async fn synthesize<O: SynthesisObserver>(&self, request: &SynthesisRequest, observer: &mut O) -> Result<SynthesisSummary> {
        let mut stream = self.stream(request).await?;
        let mut summary = SynthesisSummary::default();
        while let Some(event) = stream.next_event().await {
            match event? {
                TtsEvent::Audio(chunk) => {
                    summary.chunks += 1;
                    summary.bytes += chunk.len();
                    observer.on_audio(&chunk);
                }
                TtsEvent::Visemes(visemes) => {
                    summary.viseme_frames += 1;
                    observer.on_visemes(&visemes);
                }
            }
        }
        tracing::info!("synthesis done: {} chunks, {} bytes", summary.chunks, summary.bytes);
        Ok(summary)
    }
}

/// Forward-only output of one synthesis.
pub struct SynthesisStream {
    rx: mpsc::UnboundedReceiver<Result<TtsEvent>>,
    // dropping the stream closes the connection
    _transport: Transport,
}

impl SynthesisStream {
    pub async fn next_event(&mut self) -> Option<Result<TtsEvent>> {
        self.rx.recv().await
    }
}

impl futures::Stream for SynthesisStream {
    type Item = Result<TtsEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

fn decode_frame(frame: Frame) -> Option<TtsEvent> {
    let text = match frame {
        Frame::Binary(chunk) => return Some(TtsEvent::Audio(chunk)),
        Frame::Text(text) => text,
    };
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(serde_json::Value::Array(visemes)) => Some(TtsEvent::Visemes(visemes)),
        Ok(value) => match serde_json::from_value::<ServerEvent>(value) {
            Ok(ServerEvent::Audio { data }) => match base64::engine::general_purpose::STANDARD.decode(&data) {
                Ok(chunk) => Some(TtsEvent::Audio(chunk)),
                Err(e) => {
                    tracing::debug!("dropping undecodable audio message: {}", e);
                    None
                }
            },
            _ => {
                tracing::debug!("tts server message: {}", text);
                None
            }
        },
        Err(_) => {
            tracing::debug!("tts server message: {}", text);
            None
        }
    }
}

struct Forwarder {
    tx: mpsc::UnboundedSender<Result<TtsEvent>>,
    delivered: bool,
}

impl FrameHandler for Forwarder {
    fn on_frame(&mut self, frame: Frame) -> ControlFlow<()> {
        let Some(event) = decode_frame(frame) else {
            return ControlFlow::Continue(());
        };
        self.delivered = true;
        if self.tx.send(Ok(event)).is_err() {
            tracing::debug!("synthesis stream dropped, stop reading");
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    fn on_error(&mut self, error: Error) {
        // once data flowed, a failure just ends the stream
        if self.delivered {
            tracing::warn!("tts connection failed after data: {}", error);
            return;
        }
        if self.tx.send(Err(error)).is_err() {
            tracing::debug!("synthesis stream dropped before error");
        }
    }

    fn on_close(&mut self, reason: Option<String>) {
        tracing::debug!("tts session closed: {:?}", reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_binary_and_json_audio() {
        assert_eq!(
            decode_frame(Frame::Binary(vec![1, 2, 3])),
            Some(TtsEvent::Audio(vec![1, 2, 3]))
        );
        assert_eq!(
            decode_frame(Frame::Text(r#"{"type":"audio","data":"AQID"}"#.to_string())),
            Some(TtsEvent::Audio(vec![1, 2, 3]))
        );
    }

    #[test]
    fn test_decode_visemes() {
        let text = r#"[{"t":0.0,"v":"A"},{"t":0.1,"v":"O"}]"#.to_string();
        let Some(TtsEvent::Visemes(visemes)) = decode_frame(Frame::Text(text)) else {
            panic!("expected visemes");
        };
        assert_eq!(visemes.len(), 2);
        assert_eq!(visemes[1]["v"], "O");
    }

    #[test]
    fn test_ignore_other_text() {
        assert_eq!(decode_frame(Frame::Text("done".to_string())), None);
        assert_eq!(decode_frame(Frame::Text(r#"{"status":"ok"}"#.to_string())), None);
        assert_eq!(decode_frame(Frame::Text(r#"{"type":"error","data":"x"}"#.to_string())), None);
    }

    #[test]
    fn test_vec_collects_audio() {
        let mut pcm: Vec<u8> = Vec::new();
        pcm.on_audio(&[1, 2]);
        pcm.on_audio(&[3]);
        assert_eq!(pcm, vec![1, 2, 3]);
    }
}
