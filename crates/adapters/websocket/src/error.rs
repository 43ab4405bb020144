//! WebSocket adapter error types.

use avebridge_domain::error::BridgeError;
use tokio_tungstenite::tungstenite;

/// Errors specific to the WebSocket adapter.
#[derive(Debug, thiserror::Error)]
pub enum WsError {
    /// The hub URL could not be turned into a handshake request.
    #[error("invalid hub request")]
    Request(#[source] tungstenite::Error),

    /// The TCP connection or the WebSocket handshake failed.
    #[error("failed to connect to hub")]
    Connect(#[source] tungstenite::Error),

    /// Writing a message failed.
    #[error("failed to send message to hub")]
    Send(#[source] tungstenite::Error),

    /// Reading a message failed.
    #[error("failed to receive message from hub")]
    Receive(#[source] tungstenite::Error),
}

impl WsError {
    /// Convert into a [`BridgeError`] for propagation across port boundaries.
    ///
    /// Failures to open a link become [`BridgeError::CannotConnect`], failures
    /// on an open link become [`BridgeError::Transport`].
    pub fn into_domain(self) -> BridgeError {
        match self {
            Self::Request(_) | Self::Connect(_) => BridgeError::CannotConnect(Box::new(self)),
            Self::Send(_) | Self::Receive(_) => BridgeError::Transport(Box::new(self)),
        }
    }
}

impl From<WsError> for BridgeError {
    fn from(err: WsError) -> Self {
        err.into_domain()
    }
}
