//! WebSocket link configuration.

/// Port the hub listens on for WebSocket clients.
pub const DEFAULT_PORT: u16 = 14001;

/// Where to reach the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebSocketConfig {
    /// Hub hostname or IP address.
    pub host: String,
    /// Hub WebSocket port.
    pub port: u16,
}

impl WebSocketConfig {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `ws://<host>:<port>`
    #[must_use]
    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.10".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = WebSocketConfig::default();
        assert_eq!(config.host, "192.168.1.10");
        assert_eq!(config.port, 14001);
        assert_eq!(config.url(), "ws://192.168.1.10:14001");
    }

    #[test]
    fn should_build_url_from_host_and_port() {
        let config = WebSocketConfig::new("hub.local", 15000);
        assert_eq!(config.url(), "ws://hub.local:15000");
    }
}
