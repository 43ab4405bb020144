//! # avebridge-adapter-websocket
//!
//! WebSocket adapter: implements the `Transport` port from `avebridge-app`.
//!
//! ## Responsibilities
//! - Open `ws://<host>:14001` with the `binary` subprotocol
//! - Split the stream into a writer (outbound frames as text messages) and a
//!   reader (inbound binary or text messages as raw bytes)
//! - Map tungstenite errors onto `BridgeError`
//!
//! ## Dependency rule
//! Depends on `avebridge-app` (for the port traits) and `avebridge-domain`.

pub mod config;
pub mod error;
mod transport;

pub use config::WebSocketConfig;
pub use error::WsError;
pub use transport::{WsReader, WsTransport, WsWriter};
