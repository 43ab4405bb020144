//! `bridge.php` client.

use avebridge_domain::error::BridgeError;
use reqwest::{Client, StatusCode};

use crate::error::BridgeHttpError;

/// Thin client over `GET http://<host>/bridge.php?command=<command>`.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    client: Client,
    url: String,
}

impl BridgeClient {
    /// Create a client for `host`, which may carry an explicit port.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeHttpError::Request`] when the HTTP client cannot be
    /// built.
    pub fn new(host: &str) -> Result<Self, BridgeHttpError> {
        let client = Client::builder()
            .build()
            .map_err(BridgeHttpError::Request)?;
        Ok(Self {
            client,
            url: format!("http://{host}/bridge.php"),
        })
    }

    /// Run one bridge command and return the response body.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeHttpError::Request`] on transport failure and
    /// [`BridgeHttpError::UnexpectedStatus`] for any status but `200`.
    pub async fn call(&self, command: &str) -> Result<String, BridgeHttpError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("command", command)])
            .send()
            .await
            .map_err(BridgeHttpError::Request)?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(url = %self.url, command, %status, "bridge call failed");
            return Err(BridgeHttpError::UnexpectedStatus(status));
        }

        let body = response.text().await.map_err(BridgeHttpError::Request)?;
        tracing::debug!(command, bytes = body.len(), "bridge response received");
        Ok(body)
    }

    /// `LDI` through the bridge: the raw device list.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn device_list(&self) -> Result<String, BridgeHttpError> {
        self.call("LDI").await
    }
}

/// Check that `host` answers a device-list request.
///
/// # Errors
///
/// Returns [`BridgeError::CannotConnect`] when the bridge is unreachable or
/// answers with anything but `200`.
pub async fn validate(host: &str) -> Result<String, BridgeError> {
    let client = BridgeClient::new(host)?;
    let body = client.device_list().await?;
    tracing::info!(%host, "hub validated through http bridge");
    Ok(body)
}
