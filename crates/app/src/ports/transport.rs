//! Transport port: a message-oriented link to the hub.
//!
//! A connection is split into a writer and a reader so that commands issued
//! by subscribers can be sent while the session is blocked on a read.

use std::future::Future;

use avebridge_domain::error::BridgeError;

/// Opens links to the hub.
///
/// Implementations live in adapter crates (e.g. `adapter-websocket`).
/// The session calls [`connect`](Self::connect) once per attempt. The reader
/// stays with the run loop; the writer moves to a task of its own that lives
/// until the link is dropped.
pub trait Transport: Send + Sync + 'static {
    /// Outbound half of a link.
    type Writer: FrameWriter;
    /// Inbound half of a link.
    type Reader: FrameReader;

    /// Establish a new link.
    fn connect(
        &self,
    ) -> impl Future<Output = Result<(Self::Writer, Self::Reader), BridgeError>> + Send;
}

/// Outbound half of a hub link.
pub trait FrameWriter: Send + 'static {
    /// Send one encoded frame.
    fn send(&mut self, frame: Vec<u8>) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Close the link. The reader observes the end of stream once the hub
    /// acknowledges.
    fn close(&mut self) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

/// Inbound half of a hub link.
pub trait FrameReader: Send + 'static {
    /// Wait for the next message.
    ///
    /// Returns `Ok(None)` when the hub closed the link cleanly. A single
    /// message may contain several frames.
    fn recv(&mut self) -> impl Future<Output = Result<Option<Vec<u8>>, BridgeError>> + Send;
}
