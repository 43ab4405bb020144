//! # avebridge-adapter-bridge-http
//!
//! HTTP bridge adapter: the hub's `bridge.php` endpoint.
//!
//! Used once, before a session starts, to check that the configured host is
//! a reachable hub. The WebSocket link does all the real work.
//!
//! ## Dependency rule
//! Depends on `avebridge-domain` only.

pub mod client;
pub mod error;

pub use client::{BridgeClient, validate};
pub use error::BridgeHttpError;
