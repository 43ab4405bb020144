//! Inbound command vocabulary.
//!
//! Command names are matched case-sensitively against the lower-case names
//! the hub sends. Unrecognised names are kept in an `Unknown` variant so
//! dispatch stays total.

/// Top-level command of an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Keep-alive request; answered with `PONG`.
    Ping,
    /// Keep-alive answer.
    Pong,
    /// The hub accepted a command.
    Ack,
    /// The hub rejected a command.
    Nack,
    /// Status-by-family reply.
    StatusByFamily,
    /// Asynchronous status update.
    Update,
    /// Device list reply.
    DeviceList,
    /// Cloud notifications (secondary stream).
    Cloud,
    /// IoT notifications (secondary stream).
    Network,
    /// Anything else.
    Unknown(String),
}

impl From<&str> for Command {
    fn from(name: &str) -> Self {
        match name {
            "ping" => Self::Ping,
            "pong" => Self::Pong,
            "ack" => Self::Ack,
            "nack" => Self::Nack,
            "gsf" => Self::StatusByFamily,
            "upd" => Self::Update,
            "ldi" => Self::DeviceList,
            "cld" => Self::Cloud,
            "net" => Self::Network,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Sub-command of an `upd` frame, taken from its first parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateKind {
    /// `WS`: device status change.
    DeviceStatus,
    /// `X A`: antitheft area.
    AntitheftArea,
    /// `X S`: antitheft sensor.
    AntitheftSensor,
    /// `X U`: antitheft unit engaged.
    AntitheftUnit,
    /// `WT *`: thermostat offset, season, temperature, fan level, local off.
    Thermostat,
    /// `TT`, `TP`, `TR`: thermostat temperature.
    Temperature,
    /// `TLO`, `D`: thermostat local off.
    LocalOff,
    /// `GUI`: the hub asks clients to reload.
    GuiReload,
    /// Anything else, with the parameters that identified it.
    Unknown(String),
}

impl UpdateKind {
    /// Classify an `upd` frame from its parameters.
    #[must_use]
    pub fn from_parameters(parameters: &[String]) -> Self {
        let first = parameters.first().map_or("", String::as_str);
        let second = parameters.get(1).map_or("", String::as_str);
        match (first, second) {
            ("WS", _) => Self::DeviceStatus,
            ("X", "A") => Self::AntitheftArea,
            ("X", "S") => Self::AntitheftSensor,
            ("X", "U") => Self::AntitheftUnit,
            ("WT", _) => Self::Thermostat,
            ("TT" | "TP" | "TR", _) => Self::Temperature,
            ("TLO" | "D", _) => Self::LocalOff,
            ("GUI", _) => Self::GuiReload,
            ("X", sub) => Self::Unknown(format!("X {sub}")),
            (other, _) => Self::Unknown(other.to_string()),
        }
    }
}
