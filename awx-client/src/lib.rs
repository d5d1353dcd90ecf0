//! AWX HTTP Client
//!
//! A small, type-safe client for the AWX jobs endpoint. It performs a single
//! authenticated GET per call and never retries on its own; callers decide
//! when to try again.
//!
//! # Example
//!
//! ```no_run
//! use awx_client::{AwxClient, Credentials};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), awx_client::ClientError> {
//!     let client = AwxClient::new(
//!         "http://awx.example.com/api/v2/jobs/",
//!         Credentials::new("admin", "secret"),
//!         Duration::from_secs(10),
//!     )?;
//!
//!     let jobs = client.fetch_jobs().await?;
//!     println!("Fetched {} jobs", jobs.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

/// Timeout applied to every request unless told otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP basic authentication credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP client for the AWX jobs API
#[derive(Debug, Clone)]
pub struct AwxClient {
    /// Full URL of the jobs listing (e.g., "http://awx/api/v2/jobs/")
    api_url: String,
    credentials: Credentials,
    /// HTTP client instance
    client: Client,
}

impl AwxClient {
    /// Create a new AWX client with a bounded request timeout
    ///
    /// # Arguments
    /// * `api_url` - URL of the jobs endpoint, used as-is
    /// * `credentials` - Basic auth credentials sent with every request
    /// * `timeout` - Upper bound for a whole request, connect to last byte
    pub fn new(
        api_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(api_url, credentials, client))
    }

    /// Create a new AWX client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc. The caller is
    /// responsible for setting a timeout on `client`.
    pub fn with_client(api_url: impl Into<String>, credentials: Credentials, client: Client) -> Self {
        Self {
            api_url: api_url.into(),
            credentials,
            client,
        }
    }

    /// Get the URL this client polls
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success status codes become [`ClientError::ApiError`]; a body that
    /// does not decode becomes [`ClientError::ParseError`].
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body = response.bytes().await?;

        serde_json::from_slice(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AwxClient::new(
            "http://localhost:8052/api/v2/jobs/",
            Credentials::new("admin", "secret"),
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        assert_eq!(client.api_url(), "http://localhost:8052/api/v2/jobs/");
    }

    #[test]
    fn test_client_with_custom_client() {
        let client = AwxClient::with_client(
            "http://localhost:8052/api/v2/jobs/?page_size=200",
            Credentials::new("admin", "secret"),
            Client::new(),
        );
        assert_eq!(
            client.api_url(),
            "http://localhost:8052/api/v2/jobs/?page_size=200"
        );
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "hunter2"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
