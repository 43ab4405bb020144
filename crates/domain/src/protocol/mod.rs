//! Hub wire protocol.
//!
//! Pure functions over byte slices: no socket, no state.
//!
//! | Byte | Name | Role |
//! |------|------|------|
//! | `0x02` | STX | start of a frame |
//! | `0x03` | ETX | end of payload, followed by the 2-char checksum |
//! | `0x04` | EOT | frame terminator |
//! | `0x1D` | GS | field separator |
//! | `0x1E` | RS | record separator (inbound only) |

pub mod command;
pub mod frame;
pub mod request;

pub use command::{Command, UpdateKind};
pub use frame::{Frame, checksum, decode, encode};
pub use request::{Request, SwitchOp};
