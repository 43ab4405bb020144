//! Device: a cache entry for one hub device.
//!
//! Devices are keyed by a [`UniqueId`] built from their kind, family and hub
//! device id. The same string is used by the host platform to recognise
//! entities it created in a previous run.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::UniqueIdError;
use crate::family::Family;

/// UTC timestamp used for state transitions.
pub type Timestamp = DateTime<Utc>;

/// Brand prefix used in generated device names.
pub const BRAND_PREFIX: &str = "AVE";

/// Which cache table a device lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Motion-style binary sensors (antitheft areas and sensors).
    Motion,
    /// Controllable on/off switches (lights).
    Switch,
}

impl DeviceKind {
    /// Prefix used in unique identifiers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Motion => "motion",
            Self::Switch => "switch",
        }
    }
}

impl FromStr for DeviceKind {
    type Err = UniqueIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "motion" => Ok(Self::Motion),
            "switch" => Ok(Self::Switch),
            other => Err(UniqueIdError::UnknownKind(other.to_string())),
        }
    }
}

/// `<kind>_<family>_<device_id>` identifier, e.g. `switch_1_7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueId {
    pub kind: DeviceKind,
    pub family: Family,
    pub device_id: u32,
}

impl UniqueId {
    #[must_use]
    pub fn new(kind: DeviceKind, family: Family, device_id: u32) -> Self {
        Self {
            kind,
            family,
            device_id,
        }
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.kind.as_str(),
            self.family.code(),
            self.device_id
        )
    }
}

impl FromStr for UniqueId {
    type Err = UniqueIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('_');
        let (Some(kind), Some(family), Some(device_id), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(UniqueIdError::Malformed(s.to_string()));
        };

        let number = |segment: &str| {
            segment
                .parse::<u32>()
                .map_err(|_| UniqueIdError::InvalidNumber(segment.to_string()))
        };

        Ok(Self {
            kind: kind.parse()?,
            family: Family::from(number(family)?),
            device_id: number(device_id)?,
        })
    }
}

/// Last known state of a hub device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub unique_id: UniqueId,
    /// Known status, `None` until the hub reports a non-negative value.
    pub status: Option<i32>,
    /// Name shown to consumers.
    pub name: String,
    /// Name reported by the hub, if any.
    pub display_name: Option<String>,
    /// When the device last became active (or, for switches, last changed).
    pub last_set: Option<Timestamp>,
    /// When a motion device last went from active to inactive.
    pub last_cleared: Option<Timestamp>,
}

impl Device {
    /// Create an entry with unknown status and a generated name.
    #[must_use]
    pub fn new(unique_id: UniqueId) -> Self {
        Self {
            unique_id,
            status: None,
            name: default_name(unique_id.family, unique_id.device_id),
            display_name: None,
            last_set: None,
            last_cleared: None,
        }
    }

    #[must_use]
    pub fn family(&self) -> Family {
        self.unique_id.family
    }

    #[must_use]
    pub fn device_id(&self) -> u32 {
        self.unique_id.device_id
    }

    /// `Some(true)` when the last known status is positive, `None` when unknown.
    #[must_use]
    pub fn is_active(&self) -> Option<bool> {
        self.status.map(|status| status > 0)
    }

    /// Apply a status reported by the hub.
    ///
    /// Negative values mean "unknown" and never override a known state.
    /// Re-applying the current status is a no-op. Returns whether anything
    /// changed.
    pub fn apply_status(&mut self, status: i32, at: Timestamp) -> bool {
        if status < 0 || self.status == Some(status) {
            return false;
        }

        let was_active = self.is_active() == Some(true);
        if status > 0 {
            self.last_set = Some(at);
        } else if self.unique_id.kind == DeviceKind::Switch {
            self.last_set = Some(at);
        } else if was_active {
            self.last_cleared = Some(at);
        }
        self.status = Some(status);
        true
    }

    /// Record the hub-provided name, and show it when `rename` is set.
    ///
    /// Returns whether anything changed.
    pub fn apply_hub_name(&mut self, name: &str, rename: bool) -> bool {
        let mut changed = false;
        if self.display_name.as_deref() != Some(name) {
            self.display_name = Some(name.to_string());
            changed = true;
        }
        if rename && self.name != name {
            self.name = name.to_string();
            changed = true;
        }
        changed
    }
}

/// Generated name such as `"AVE light 7"`.
#[must_use]
pub fn default_name(family: Family, device_id: u32) -> String {
    format!("{BRAND_PREFIX} {} {device_id}", family.label())
}
