//! # avebridge-app
//!
//! Application layer: the hub protocol client core and its **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `Transport`: open a message-oriented link to the hub
//!   - `NameRegistry`: tell whether a device name was customised by the host
//! - Route decoded frames to cache updates ([`dispatcher`])
//! - Hold the last known state of every device ([`cache`])
//! - Drive the connect → receive → reconnect loop ([`session`])
//!
//! ## Dependency rule
//! Depends on `avebridge-domain` only (plus `tokio` for tasks and timers, `chrono` for clocks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod cache;
pub mod dispatcher;
pub mod ports;
pub mod session;
pub mod subscriber;
