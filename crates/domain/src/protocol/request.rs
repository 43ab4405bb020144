//! Outbound requests.

use crate::family::Family;

use super::frame;

/// Operation carried by an `EBI` switch command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOp {
    Toggle,
    On,
    Off,
}

impl SwitchOp {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Toggle => "10",
            Self::On => "11",
            Self::Off => "12",
        }
    }
}

/// A command sent to the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// `LDI`: list devices.
    ListDevices,
    /// `GSF <family>`: status of every device of a family.
    StatusByFamily(Family),
    /// `WSF <family>`: subscribe to a family's asynchronous stream.
    WatchFamily(Family),
    /// `SU3`: start the primary update stream.
    StartUpdates,
    /// `EBI <device_id> <op>`: drive a switch.
    Switch { device_id: u32, op: SwitchOp },
    /// `PONG`: keep-alive answer.
    Pong,
}

impl Request {
    /// Wire command name.
    #[must_use]
    pub fn command(&self) -> &'static str {
        match self {
            Self::ListDevices => "LDI",
            Self::StatusByFamily(_) => "GSF",
            Self::WatchFamily(_) => "WSF",
            Self::StartUpdates => "SU3",
            Self::Switch { .. } => "EBI",
            Self::Pong => "PONG",
        }
    }

    #[must_use]
    pub fn parameters(&self) -> Vec<String> {
        match self {
            Self::StatusByFamily(family) | Self::WatchFamily(family) => vec![family.to_string()],
            Self::Switch { device_id, op } => vec![device_id.to_string(), op.code().to_string()],
            Self::ListDevices | Self::StartUpdates | Self::Pong => Vec::new(),
        }
    }

    /// Bytes to put on the wire.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        frame::encode(self.command(), &self.parameters())
    }
}
