//! Device families: the hub's device category codes.

use std::fmt;

/// A hub-defined device category.
///
/// Codes the bridge knows about get their own variant. Anything else is kept
/// verbatim in [`Family::Other`] so it can still be logged and keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// `1`: lights, exposed as switches.
    Light,
    /// `4`: thermostats.
    Thermostat,
    /// `6`: scenarios.
    Scenario,
    /// `7`: motion detection area.
    MotionArea,
    /// `8`: cameras.
    Camera,
    /// `11`: antitheft keypads.
    Keypad,
    /// `12`: antitheft area.
    AntitheftArea,
    /// `1007`: antitheft sensor.
    AntitheftSensor,
    /// Any code not listed above.
    Other(u32),
}

impl Family {
    /// The numeric code used on the wire.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::Light => 1,
            Self::Thermostat => 4,
            Self::Scenario => 6,
            Self::MotionArea => 7,
            Self::Camera => 8,
            Self::Keypad => 11,
            Self::AntitheftArea => 12,
            Self::AntitheftSensor => 1007,
            Self::Other(code) => code,
        }
    }

    /// Suffix used when generating a default device name.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Light => "light".to_string(),
            Self::Scenario => "scenario".to_string(),
            Self::AntitheftArea => "antitheft area".to_string(),
            Self::AntitheftSensor => "antitheft sensor".to_string(),
            other => format!("sensor type {}", other.code()),
        }
    }
}

impl From<u32> for Family {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::Light,
            4 => Self::Thermostat,
            6 => Self::Scenario,
            7 => Self::MotionArea,
            8 => Self::Camera,
            11 => Self::Keypad,
            12 => Self::AntitheftArea,
            1007 => Self::AntitheftSensor,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
