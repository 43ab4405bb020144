//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the protocol core and the outside world.
//! They are defined here (in `app`) so that both the session and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod name_registry;
pub mod transport;

pub use name_registry::{NameRegistry, NoCustomNames};
pub use transport::{FrameReader, FrameWriter, Transport};
