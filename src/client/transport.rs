use std::ops::ControlFlow;

use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::client::config::Config;
use crate::client::utils;
use crate::error::{Error, Result};

pub(crate) type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Data frame received from the server.
pub(crate) enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

/// Receives the inbound events of one connection, in arrival order, from a single task.
pub(crate) trait FrameHandler: Send + 'static {
    fn on_frame(&mut self, frame: Frame) -> ControlFlow<()>;

    fn on_error(&mut self, error: Error);

    /// Called exactly once, after the last frame.
    fn on_close(&mut self, reason: Option<String>);
}

/// Write side of a single WebSocket connection.
///
/// Outbound frames are queued and written by one task, so they leave in call order. The queue
/// has a single sender: once the transport is closed or dropped the writer flushes what is
/// queued and ends with a close frame, so closing never waits for queue room.
pub(crate) struct Transport {
    tx: mpsc::Sender<Message>,
}

impl Transport {
    /// Performs the handshake within the configured timeout. Returning `Ok` is the "open" signal.
    pub(crate) async fn open(config: &Config, url: &str) -> Result<(Self, WsReader)> {
        let request = utils::build_request(url, config.api_key(), config.auth())?;
        let (ws_stream, _) = tokio::time::timeout(config.connect_timeout(), tokio_tungstenite::connect_async(request))
            .await
            .map_err(|_| Error::Timeout(config.connect_timeout()))??;

        let (mut write, read) = ws_stream.split();
        let (tx, mut rx) = mpsc::channel::<Message>(config.capacity());

        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if let Err(e) = write.send(message).await {
                    tracing::warn!("failed to send message: {}", e);
                    return;
                }
            }
            if let Err(e) = write.send(Message::Close(None)).await {
                tracing::debug!("close frame not sent: {}", e);
            }
        });

        Ok((Self { tx }, read))
    }

    pub(crate) async fn send_json<T: serde::Serialize>(&self, message: &T) -> Result<()> {
        let text = serde_json::to_string(message)?;
        self.tx
            .send(Message::Text(text))
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    /// Queues a binary frame without waiting. Returns `false` when the frame was dropped.
    pub(crate) fn try_send_binary(&self, bytes: Vec<u8>) -> bool {
        match self.tx.try_send(Message::Binary(bytes)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("send buffer full, dropping audio chunk");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!("connection writer gone, dropping audio chunk");
                false
            }
        }
    }

    /// Starts the close handshake after the queued frames. Dropping the transport does the same.
    pub(crate) fn close(self) {
        tracing::debug!("closing connection, {} frames queued", self.tx.max_capacity() - self.tx.capacity());
    }
}

/// Reads until the connection ends, handing every frame to `handler`.
pub(crate) async fn pump<H: FrameHandler>(mut read: WsReader, mut handler: H) -> H {
    let mut close_reason = None;
    let mut closing = false;

    while let Some(message) = read.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                // errors while finishing the close handshake are not failures
                if !closing {
                    tracing::error!("failed to read message: {}", e);
                    handler.on_error(e.into());
                }
                break;
            }
        };
        let flow = match message {
            Message::Text(text) => handler.on_frame(Frame::Text(text)),
            Message::Binary(bin) => handler.on_frame(Frame::Binary(bin)),
            Message::Close(frame) => {
                tracing::info!("connection closed: {:?}", frame);
                close_reason = frame.map(|f| f.reason.to_string()).filter(|r| !r.is_empty());
                closing = true;
                ControlFlow::Continue(())
            }
            _ => ControlFlow::Continue(()),
        };
        if flow.is_break() {
            break;
        }
    }

    handler.on_close(close_reason);
    handler
}
