//! Error types for the AWX client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to AWX
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection refused, DNS, timeout, ...)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// AWX answered with a non-success status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body, if it could be read
        message: String,
    },

    /// Response body was not the expected JSON document
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The client could not be built from the given settings
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if the request ran into the client-side timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestFailed(e) if e.is_timeout())
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(ClientError::api_error(401, "unauthorized").is_client_error());
        assert!(!ClientError::api_error(401, "unauthorized").is_server_error());
        assert!(ClientError::api_error(503, "unavailable").is_server_error());
        assert!(!ClientError::ParseError("bad".into()).is_client_error());
        assert!(!ClientError::ParseError("bad".into()).is_timeout());
    }

    #[test]
    fn test_display_includes_status() {
        let err = ClientError::api_error(404, "not found");
        assert_eq!(err.to_string(), "API error (status 404): not found");
    }
}
