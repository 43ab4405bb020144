//! # avebridge-domain
//!
//! Pure domain model for the AVE dominaplus hub bridge.
//!
//! ## Responsibilities
//! - Wire protocol: frame encoding/decoding and the hub checksum ([`protocol`])
//! - Closed vocabularies for hub commands, async updates and device families
//! - Cache entries ([`device::Device`]) and their unique identifiers
//! - Bridge settings and the change notifications emitted to subscribers
//! - Error conventions shared by every layer
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod device;
pub mod event;
pub mod family;
pub mod protocol;
pub mod settings;
