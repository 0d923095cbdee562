use std::time::Duration;

use tokio_tungstenite::tungstenite;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("handshake did not complete within {0:?}")]
    Timeout(Duration),
    #[error("already connected")]
    AlreadyConnected,
    /// The session ended; build a new client to reconnect.
    #[error("session closed")]
    Closed,
    #[error("send buffer closed")]
    ChannelClosed,
}
