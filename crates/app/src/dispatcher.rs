//! Command dispatcher: turns decoded frames into actions.
//!
//! Dispatch is pure and total: every frame maps to a (possibly empty) list of
//! [`Action`]s, unknown commands included. The session applies the actions in
//! order.

use std::str::FromStr;

use avebridge_domain::family::Family;
use avebridge_domain::protocol::{Command, Frame, Request, UpdateKind};
use avebridge_domain::settings::Settings;

use crate::cache::DeviceUpdate;

/// Device ids above this value belong to scenarios and similar virtual objects.
const VIRTUAL_DEVICE_ID_FLOOR: u32 = 200_000;

/// Something the session must do in response to a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send a request back to the hub.
    Reply(Request),
    /// Apply an update to the switch table.
    UpdateSwitch(DeviceUpdate),
    /// Apply an update to the binary-sensor table.
    UpdateBinarySensor(DeviceUpdate),
}

/// Route one frame.
#[must_use]
pub fn dispatch(frame: &Frame, settings: &Settings) -> Vec<Action> {
    match Command::from(frame.command.as_str()) {
        Command::Ping => vec![Action::Reply(Request::Pong)],
        Command::Pong | Command::Cloud | Command::Network => Vec::new(),
        Command::Ack => {
            tracing::debug!(command = ?frame.parameter(0), "hub acknowledged command");
            Vec::new()
        }
        Command::Nack => {
            tracing::warn!(
                command = frame.parameter(0).unwrap_or("unknown"),
                "hub rejected command"
            );
            Vec::new()
        }
        Command::StatusByFamily => status_by_family(frame),
        Command::DeviceList => device_list(frame),
        Command::Update => update(frame, settings),
        Command::Unknown(name) => {
            tracing::warn!(
                command = %name,
                parameters = ?frame.parameters,
                records = frame.records.len(),
                "received unknown command"
            );
            Vec::new()
        }
    }
}

fn number<T: FromStr>(fields: &[String], index: usize) -> Option<T> {
    fields.get(index)?.trim().parse().ok()
}

fn status_by_family(frame: &Frame) -> Vec<Action> {
    let Some(family) = number::<u32>(&frame.parameters, 0).map(Family::from) else {
        tracing::warn!(parameters = ?frame.parameters, "gsf reply without a family");
        return Vec::new();
    };
    tracing::info!(%family, records = frame.records.len(), "received status by family");

    let route: fn(DeviceUpdate) -> Action = match family {
        Family::Light => Action::UpdateSwitch,
        Family::MotionArea | Family::AntitheftArea => Action::UpdateBinarySensor,
        _ => return Vec::new(),
    };

    frame
        .records
        .iter()
        .filter_map(|record| {
            let (Some(device_id), Some(status)) = (number(record, 0), number(record, 1)) else {
                tracing::warn!(%family, ?record, "skipping malformed gsf record");
                return None;
            };
            Some(route(DeviceUpdate::status(family, device_id, status)))
        })
        .collect()
}

fn device_list(frame: &Frame) -> Vec<Action> {
    tracing::info!(records = frame.records.len(), "received device list");

    let mut actions = Vec::new();
    for record in &frame.records {
        let (Some(device_id), Some(name), Some(device_type)) = (
            number::<u32>(record, 0),
            record.get(1),
            number::<u32>(record, 2),
        ) else {
            tracing::warn!(?record, "skipping malformed ldi record");
            continue;
        };

        match Family::from(device_type) {
            Family::AntitheftArea => actions.push(Action::UpdateBinarySensor(
                DeviceUpdate::listing(Family::AntitheftArea, device_id, name),
            )),
            Family::Light => actions.push(Action::UpdateSwitch(DeviceUpdate::listing(
                Family::Light,
                device_id,
                name,
            ))),
            Family::Keypad | Family::Thermostat | Family::Scenario | Family::Camera => {}
            other => {
                tracing::debug!(family = %other, %name, "unknown device type, skipping");
            }
        }
    }
    actions
}

fn update(frame: &Frame, settings: &Settings) -> Vec<Action> {
    let params = &frame.parameters;
    match UpdateKind::from_parameters(params) {
        UpdateKind::DeviceStatus => {
            let (Some(device_type), Some(device_id), Some(status)) = (
                number::<u32>(params, 1),
                number::<u32>(params, 2),
                number::<i32>(params, 3),
            ) else {
                tracing::warn!(?params, "malformed WS update");
                return Vec::new();
            };
            if device_id > VIRTUAL_DEVICE_ID_FLOOR {
                return Vec::new();
            }
            if Family::from(device_type) == Family::Light && settings.fetch_lights {
                vec![Action::UpdateSwitch(DeviceUpdate::status(
                    Family::Light,
                    device_id,
                    status,
                ))]
            } else {
                Vec::new()
            }
        }
        UpdateKind::AntitheftArea => {
            if !settings.fetch_sensor_areas {
                return Vec::new();
            }
            let (Some(area_id), Some(clear)) = (number::<u32>(params, 2), number::<i32>(params, 6))
            else {
                tracing::warn!(?params, "malformed antitheft area update");
                return Vec::new();
            };
            let status = i32::from(clear <= 0);
            vec![Action::UpdateBinarySensor(DeviceUpdate::status(
                Family::AntitheftArea,
                area_id,
                status,
            ))]
        }
        UpdateKind::AntitheftSensor => {
            if !settings.fetch_sensors {
                return Vec::new();
            }
            let (Some(sensor_id), Some(status)) =
                (number::<u32>(params, 2), number::<i32>(params, 4))
            else {
                tracing::warn!(?params, "malformed antitheft sensor update");
                return Vec::new();
            };
            vec![Action::UpdateBinarySensor(DeviceUpdate::status(
                Family::AntitheftSensor,
                sensor_id,
                status,
            ))]
        }
        UpdateKind::AntitheftUnit => {
            tracing::debug!(id = ?frame.parameter(2), "antitheft unit engaged");
            Vec::new()
        }
        UpdateKind::Thermostat
        | UpdateKind::Temperature
        | UpdateKind::LocalOff
        | UpdateKind::GuiReload => Vec::new(),
        UpdateKind::Unknown(kind) => {
            tracing::warn!(%kind, ?params, "unhandled update");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(command: &str, parameters: &[&str], records: &[&[&str]]) -> Frame {
        Frame {
            command: command.to_string(),
            parameters: parameters.iter().map(ToString::to_string).collect(),
            records: records
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        }
    }

    fn everything() -> Settings {
        Settings {
            fetch_lights: true,
            fetch_sensors: true,
            fetch_sensor_areas: true,
            include_hub_names: true,
            ..Settings::default()
        }
    }

    // ── top level ───────────────────────────────────────────────────────

    #[test]
    fn should_answer_ping_with_pong() {
        let actions = dispatch(&frame("ping", &[], &[]), &everything());
        assert_eq!(actions, vec![Action::Reply(Request::Pong)]);
    }

    #[test]
    fn should_treat_acknowledgements_as_inert() {
        assert!(dispatch(&frame("ack", &["LDI"], &[]), &everything()).is_empty());
        assert!(dispatch(&frame("nack", &[], &[]), &everything()).is_empty());
        assert!(dispatch(&frame("pong", &[], &[]), &everything()).is_empty());
    }

    #[test]
    fn should_treat_secondary_stream_commands_as_inert() {
        assert!(dispatch(&frame("cld", &["1"], &[]), &everything()).is_empty());
        assert!(dispatch(&frame("net", &["1"], &[]), &everything()).is_empty());
    }

    #[test]
    fn should_ignore_unknown_commands() {
        assert!(dispatch(&frame("zzz", &["1"], &[&["2"]]), &everything()).is_empty());
        assert!(dispatch(&Frame::default(), &everything()).is_empty());
    }

    // ── gsf ─────────────────────────────────────────────────────────────

    #[test]
    fn should_route_light_statuses_to_switches() {
        let actions = dispatch(&frame("gsf", &["1"], &[&["7", "1"], &["8", "0"]]), &everything());
        assert_eq!(
            actions,
            vec![
                Action::UpdateSwitch(DeviceUpdate::status(Family::Light, 7, 1)),
                Action::UpdateSwitch(DeviceUpdate::status(Family::Light, 8, 0)),
            ]
        );
    }

    #[test]
    fn should_route_motion_statuses_to_binary_sensors() {
        let actions = dispatch(&frame("gsf", &["12"], &[&["3", "1"]]), &everything());
        assert_eq!(
            actions,
            vec![Action::UpdateBinarySensor(DeviceUpdate::status(
                Family::AntitheftArea,
                3,
                1
            ))]
        );

        let actions = dispatch(&frame("gsf", &["7"], &[&["4", "0"]]), &everything());
        assert_eq!(
            actions,
            vec![Action::UpdateBinarySensor(DeviceUpdate::status(
                Family::MotionArea,
                4,
                0
            ))]
        );
    }

    #[test]
    fn should_ignore_other_families_in_gsf() {
        assert!(dispatch(&frame("gsf", &["4"], &[&["1", "20"]]), &everything()).is_empty());
        assert!(dispatch(&frame("gsf", &[], &[&["1", "1"]]), &everything()).is_empty());
    }

    #[test]
    fn should_skip_malformed_gsf_records_only() {
        let actions = dispatch(
            &frame("gsf", &["1"], &[&["x", "1"], &["9"], &["10", "1"]]),
            &everything(),
        );
        assert_eq!(
            actions,
            vec![Action::UpdateSwitch(DeviceUpdate::status(Family::Light, 10, 1))]
        );
    }

    // ── ldi ─────────────────────────────────────────────────────────────

    #[test]
    fn should_seed_devices_from_listing() {
        let actions = dispatch(
            &frame(
                "ldi",
                &[],
                &[
                    &["7", "Kitchen Light", "1"],
                    &["3", "Garage", "12"],
                    &["5", "Keypad", "11"],
                    &["6", "Evening", "6"],
                    &["9", "Mystery", "99"],
                ],
            ),
            &everything(),
        );
        assert_eq!(
            actions,
            vec![
                Action::UpdateSwitch(DeviceUpdate::listing(Family::Light, 7, "Kitchen Light")),
                Action::UpdateBinarySensor(DeviceUpdate::listing(
                    Family::AntitheftArea,
                    3,
                    "Garage"
                )),
            ]
        );
    }

    #[test]
    fn should_seed_with_unknown_status() {
        let actions = dispatch(&frame("ldi", &[], &[&["7", "Porch", "1"]]), &everything());
        let Action::UpdateSwitch(update) = &actions[0] else {
            panic!("expected a switch update, got {actions:?}");
        };
        assert_eq!(update.status, -1);
        assert_eq!(update.name.as_deref(), Some("Porch"));
    }

    #[test]
    fn should_skip_malformed_ldi_records() {
        let actions = dispatch(
            &frame("ldi", &[], &[&["7", "Porch"], &["8", "Hall", "1"]]),
            &everything(),
        );
        assert_eq!(
            actions,
            vec![Action::UpdateSwitch(DeviceUpdate::listing(Family::Light, 8, "Hall"))]
        );
    }

    // ── upd ─────────────────────────────────────────────────────────────

    #[test]
    fn should_route_light_status_update_when_lights_enabled() {
        let actions = dispatch(&frame("upd", &["WS", "1", "7", "1"], &[]), &everything());
        assert_eq!(
            actions,
            vec![Action::UpdateSwitch(DeviceUpdate::status(Family::Light, 7, 1))]
        );
    }

    #[test]
    fn should_ignore_light_status_update_when_lights_disabled() {
        let settings = Settings {
            fetch_lights: false,
            ..everything()
        };
        assert!(dispatch(&frame("upd", &["WS", "1", "7", "1"], &[]), &settings).is_empty());
    }

    #[test]
    fn should_ignore_virtual_device_ids() {
        let actions = dispatch(
            &frame("upd", &["WS", "1", "200001", "1"], &[]),
            &everything(),
        );
        assert!(actions.is_empty());

        let actions = dispatch(
            &frame("upd", &["WS", "1", "200000", "1"], &[]),
            &everything(),
        );
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn should_ignore_status_updates_of_other_types() {
        assert!(dispatch(&frame("upd", &["WS", "2", "7", "1"], &[]), &everything()).is_empty());
    }

    #[test]
    fn should_map_area_clear_flag_to_status() {
        let triggered = dispatch(
            &frame("upd", &["X", "A", "3", "0", "0", "0", "0"], &[]),
            &everything(),
        );
        assert_eq!(
            triggered,
            vec![Action::UpdateBinarySensor(DeviceUpdate::status(
                Family::AntitheftArea,
                3,
                1
            ))]
        );

        let cleared = dispatch(
            &frame("upd", &["X", "A", "3", "0", "0", "0", "1"], &[]),
            &everything(),
        );
        assert_eq!(
            cleared,
            vec![Action::UpdateBinarySensor(DeviceUpdate::status(
                Family::AntitheftArea,
                3,
                0
            ))]
        );
    }

    #[test]
    fn should_ignore_area_updates_when_areas_disabled() {
        let settings = Settings {
            fetch_sensor_areas: false,
            ..everything()
        };
        let actions = dispatch(
            &frame("upd", &["X", "A", "3", "0", "0", "0", "0"], &[]),
            &settings,
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn should_route_sensor_updates() {
        let actions = dispatch(
            &frame("upd", &["X", "S", "21", "0", "1"], &[]),
            &everything(),
        );
        assert_eq!(
            actions,
            vec![Action::UpdateBinarySensor(DeviceUpdate::status(
                Family::AntitheftSensor,
                21,
                1
            ))]
        );
    }

    #[test]
    fn should_ignore_sensor_updates_when_sensors_disabled() {
        let settings = Settings {
            fetch_sensors: false,
            ..everything()
        };
        let actions = dispatch(&frame("upd", &["X", "S", "21", "0", "1"], &[]), &settings);
        assert!(actions.is_empty());
    }

    #[test]
    fn should_treat_reserved_updates_as_inert() {
        for params in [
            &["X", "U", "1"][..],
            &["WT", "T", "3", "215"][..],
            &["TT", "3", "215"][..],
            &["TLO", "3"][..],
            &["D", "3"][..],
            &["GUI"][..],
        ] {
            assert!(dispatch(&frame("upd", params, &[]), &everything()).is_empty());
        }
    }

    #[test]
    fn should_ignore_unknown_and_malformed_updates() {
        assert!(dispatch(&frame("upd", &["QQ"], &[]), &everything()).is_empty());
        assert!(dispatch(&frame("upd", &[], &[]), &everything()).is_empty());
        assert!(dispatch(&frame("upd", &["WS", "1"], &[]), &everything()).is_empty());
        assert!(dispatch(&frame("upd", &["X", "A", "3"], &[]), &everything()).is_empty());
    }
}
