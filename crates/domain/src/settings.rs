//! Bridge settings: which device families are tracked.

use serde::Deserialize;

use crate::device::DeviceKind;
use crate::family::Family;

/// Settings fixed at session construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hub hostname or IP address.
    pub host: String,
    /// Track lights (family `1`) as switches.
    pub fetch_lights: bool,
    /// Track antitheft sensors (family `1007`).
    pub fetch_sensors: bool,
    /// Track antitheft areas (family `12`).
    pub fetch_sensor_areas: bool,
    /// Use the names reported by the hub for new and existing devices.
    pub include_hub_names: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "192.168.1.10".to_string(),
            fetch_lights: false,
            fetch_sensors: false,
            fetch_sensor_areas: false,
            include_hub_names: false,
        }
    }
}

impl Settings {
    /// Whether devices of `family` are tracked in the `kind` table.
    ///
    /// Motion entries exist only for antitheft areas and sensors; switch
    /// entries only for lights. Each is further gated by its fetch flag.
    #[must_use]
    pub fn tracks(&self, kind: DeviceKind, family: Family) -> bool {
        match (kind, family) {
            (DeviceKind::Motion, Family::AntitheftArea) => self.fetch_sensor_areas,
            (DeviceKind::Motion, Family::AntitheftSensor) => self.fetch_sensors,
            (DeviceKind::Switch, Family::Light) => self.fetch_lights,
            _ => false,
        }
    }
}
