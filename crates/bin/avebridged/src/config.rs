//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `avebridge.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use avebridge_adapter_websocket::WebSocketConfig;
use avebridge_adapter_websocket::config::DEFAULT_PORT;
use avebridge_domain::settings::Settings;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hub address and tracked families.
    pub hub: HubConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Checks run before the session starts.
    pub startup: StartupConfig,
}

/// Hub connection and session settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Hub WebSocket port.
    pub port: u16,
    /// Host and fetch flags handed to the session.
    #[serde(flatten)]
    pub settings: Settings,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Startup checks.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Query `bridge.php` once and refuse to start when the hub does not answer.
    pub validate_bridge: bool,
}

impl Config {
    /// Load configuration from `avebridge.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("avebridge.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("AVEBRIDGE_HOST") {
            self.hub.settings.host = val;
        }
        if let Ok(val) = std::env::var("AVEBRIDGE_PORT")
            && let Ok(port) = val.parse()
        {
            self.hub.port = port;
        }
        if let Ok(val) = std::env::var("AVEBRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.hub.settings.host.trim().is_empty() {
            return Err(ConfigError::Validation("host must not be empty".to_string()));
        }
        if self.hub.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Where the websocket transport connects.
    #[must_use]
    pub fn websocket(&self) -> WebSocketConfig {
        WebSocketConfig::new(self.hub.settings.host.clone(), self.hub.port)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            settings: Settings::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "avebridged=info,avebridge=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.hub.settings.host, "192.168.1.10");
        assert_eq!(config.hub.port, 14001);
        assert!(!config.hub.settings.fetch_lights);
        assert!(!config.startup.validate_bridge);
        assert_eq!(config.logging.filter, "avebridged=info,avebridge=info");
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.hub.port, 14001);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [hub]
            host = 'hub.local'
            port = 15000
            fetch_lights = true
            fetch_sensors = true
            fetch_sensor_areas = true
            include_hub_names = true

            [logging]
            filter = 'debug'

            [startup]
            validate_bridge = true
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.hub.settings.host, "hub.local");
        assert_eq!(config.hub.port, 15000);
        assert!(config.hub.settings.fetch_lights);
        assert!(config.hub.settings.fetch_sensors);
        assert!(config.hub.settings.fetch_sensor_areas);
        assert!(config.hub.settings.include_hub_names);
        assert_eq!(config.logging.filter, "debug");
        assert!(config.startup.validate_bridge);
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [hub]
            fetch_lights = true
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.hub.settings.fetch_lights);
        assert!(!config.hub.settings.fetch_sensors);
        assert_eq!(config.hub.settings.host, "192.168.1.10");
        assert_eq!(config.hub.port, 14001);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.hub.port, 14001);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.hub.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_empty_host() {
        let mut config = Config::default();
        config.hub.settings.host = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_build_websocket_config() {
        let mut config = Config::default();
        config.hub.settings.host = "10.0.0.2".to_string();
        assert_eq!(config.websocket().url(), "ws://10.0.0.2:14001");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
