//! HTTP bridge error types.

use avebridge_domain::error::BridgeError;

/// Errors specific to the HTTP bridge adapter.
#[derive(Debug, thiserror::Error)]
pub enum BridgeHttpError {
    /// Building the client or performing the request failed.
    #[error("bridge request failed")]
    Request(#[source] reqwest::Error),

    /// The bridge answered with something other than `200 OK`.
    #[error("bridge answered with status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

impl BridgeHttpError {
    /// Convert into a [`BridgeError::CannotConnect`]: any bridge failure means
    /// the hub cannot be validated.
    pub fn into_domain(self) -> BridgeError {
        BridgeError::CannotConnect(Box::new(self))
    }
}

impl From<BridgeHttpError> for BridgeError {
    fn from(err: BridgeHttpError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_unexpected_status() {
        let err = BridgeHttpError::UnexpectedStatus(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "bridge answered with status 404 Not Found");
    }

    #[test]
    fn should_convert_to_cannot_connect() {
        let err: BridgeError =
            BridgeHttpError::UnexpectedStatus(reqwest::StatusCode::BAD_GATEWAY).into();
        assert!(matches!(err, BridgeError::CannotConnect(_)));
    }
}
