//! Change notifications emitted by the device cache.

use crate::device::{Device, UniqueId};

/// A change to a cached device, carrying a snapshot taken after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceChange {
    /// The device was seen for the first time.
    Created(Device),
    /// The status or name of a known device changed.
    Updated(Device),
}

impl DeviceChange {
    /// Snapshot of the device after the change.
    #[must_use]
    pub fn device(&self) -> &Device {
        match self {
            Self::Created(device) | Self::Updated(device) => device,
        }
    }

    #[must_use]
    pub fn unique_id(&self) -> UniqueId {
        self.device().unique_id
    }

    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
