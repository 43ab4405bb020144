//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BridgeError`]
//! when crossing a port boundary.

use std::str::Utf8Error;

/// Boxed error used for transport failures coming from adapters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for the bridge core.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// An outbound frame was requested while no hub link is established.
    #[error("hub is not connected")]
    NotConnected,

    /// The transport failed to connect, read or write.
    #[error("transport error")]
    Transport(#[source] BoxError),

    /// The hub could not be reached while validating the configuration.
    #[error("cannot connect to the hub")]
    CannotConnect(#[source] BoxError),

    /// A wire unit could not be decoded.
    #[error("frame error")]
    Frame(#[from] FrameError),

    /// A unique identifier string could not be parsed.
    #[error("invalid unique id")]
    InvalidUniqueId(#[from] UniqueIdError),
}

/// Reasons a single wire unit could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The unit is not valid UTF-8.
    #[error("frame is not valid UTF-8")]
    InvalidUtf8(#[source] Utf8Error),
}

/// Reasons a unique identifier string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniqueIdError {
    /// The identifier does not have the `<kind>_<family>_<device_id>` shape.
    #[error("expected `<kind>_<family>_<device_id>`, got {0:?}")]
    Malformed(String),

    /// The kind segment is neither `motion` nor `switch`.
    #[error("unknown device kind {0:?}")]
    UnknownKind(String),

    /// The family or device id segment is not a number.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}
