//! Device state cache: last known status and name of every tracked device.
//!
//! Two tables, one per [`DeviceKind`]. Entries are created on first
//! reference, whichever frame references them first, and are never removed.
//! Every mutating call returns the [`DeviceChange`] it produced, or `None`
//! when it was a no-op, so the session decides who gets notified.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use avebridge_domain::device::{Device, DeviceKind, Timestamp, UniqueId};
use avebridge_domain::event::DeviceChange;
use avebridge_domain::family::Family;
use avebridge_domain::settings::Settings;

use crate::ports::NameRegistry;

/// Status and optional name reported by the hub for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceUpdate {
    pub family: Family,
    pub device_id: u32,
    /// Negative when the hub only listed the device.
    pub status: i32,
    pub name: Option<String>,
}

impl DeviceUpdate {
    /// A status report without a name.
    #[must_use]
    pub fn status(family: Family, device_id: u32, status: i32) -> Self {
        Self {
            family,
            device_id,
            status,
            name: None,
        }
    }

    /// A device-list entry: name known, status unknown.
    #[must_use]
    pub fn listing(family: Family, device_id: u32, name: impl Into<String>) -> Self {
        Self {
            family,
            device_id,
            status: -1,
            name: Some(name.into()),
        }
    }
}

/// In-memory device tables owned by one session.
#[derive(Debug)]
pub struct DeviceCache {
    settings: Settings,
    binary_sensors: HashMap<UniqueId, Device>,
    switches: HashMap<UniqueId, Device>,
}

impl DeviceCache {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            binary_sensors: HashMap::new(),
            switches: HashMap::new(),
        }
    }

    /// Apply an update to a motion binary sensor.
    ///
    /// Only antitheft areas and sensors are accepted, each behind its own
    /// setting. Anything else is rejected silently.
    pub fn update_binary_sensor(
        &mut self,
        update: DeviceUpdate,
        names: &dyn NameRegistry,
        at: Timestamp,
    ) -> Option<DeviceChange> {
        self.apply(DeviceKind::Motion, update, names, at)
    }

    /// Apply an update to a light switch.
    pub fn update_switch(
        &mut self,
        update: DeviceUpdate,
        names: &dyn NameRegistry,
        at: Timestamp,
    ) -> Option<DeviceChange> {
        self.apply(DeviceKind::Switch, update, names, at)
    }

    fn apply(
        &mut self,
        kind: DeviceKind,
        update: DeviceUpdate,
        names: &dyn NameRegistry,
        at: Timestamp,
    ) -> Option<DeviceChange> {
        if !self.settings.tracks(kind, update.family) {
            tracing::debug!(
                kind = kind.as_str(),
                family = %update.family,
                device_id = update.device_id,
                "family not tracked, ignoring update"
            );
            return None;
        }

        let unique_id = UniqueId::new(kind, update.family, update.device_id);
        let hub_name = update
            .name
            .as_deref()
            .filter(|_| self.settings.include_hub_names);

        match self.table_mut(kind).entry(unique_id) {
            Entry::Occupied(mut entry) => {
                let device = entry.get_mut();
                let mut changed = device.apply_status(update.status, at);
                if let Some(name) = hub_name {
                    changed |= device.apply_hub_name(name, !names.is_customized(&unique_id));
                }
                changed.then(|| DeviceChange::Updated(device.clone()))
            }
            Entry::Vacant(entry) => {
                let mut device = Device::new(unique_id);
                device.apply_status(update.status, at);
                if let Some(name) = hub_name {
                    device.apply_hub_name(name, !names.is_customized(&unique_id));
                }
                tracing::info!(%unique_id, name = %device.name, "tracking new device");
                Some(DeviceChange::Created(entry.insert(device).clone()))
            }
        }
    }

    /// Seed an entry the host platform already knows from a previous run.
    ///
    /// Existing entries and untracked families are left alone.
    pub fn adopt(&mut self, unique_id: UniqueId, name: Option<String>) -> Option<DeviceChange> {
        if !self.settings.tracks(unique_id.kind, unique_id.family) {
            return None;
        }
        let Entry::Vacant(entry) = self.table_mut(unique_id.kind).entry(unique_id) else {
            return None;
        };

        let mut device = Device::new(unique_id);
        if let Some(name) = name {
            device.name = name;
        }
        tracing::debug!(%unique_id, name = %device.name, "adopted existing device");
        Some(DeviceChange::Created(entry.insert(device).clone()))
    }

    #[must_use]
    pub fn get(&self, unique_id: &UniqueId) -> Option<&Device> {
        self.table(unique_id.kind).get(unique_id)
    }

    pub fn binary_sensors(&self) -> impl Iterator<Item = &Device> {
        self.binary_sensors.values()
    }

    pub fn switches(&self) -> impl Iterator<Item = &Device> {
        self.switches.values()
    }

    fn table(&self, kind: DeviceKind) -> &HashMap<UniqueId, Device> {
        match kind {
            DeviceKind::Motion => &self.binary_sensors,
            DeviceKind::Switch => &self.switches,
        }
    }

    fn table_mut(&mut self, kind: DeviceKind) -> &mut HashMap<UniqueId, Device> {
        match kind {
            DeviceKind::Motion => &mut self.binary_sensors,
            DeviceKind::Switch => &mut self.switches,
        }
    }
}
