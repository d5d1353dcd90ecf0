//! Exporter configuration
//!
//! Loaded once at startup from a YAML file, then optionally overridden by
//! environment variables. The resulting value is passed explicitly to the
//! poller and the HTTP server; nothing reads it from global state.

use awx_client::Credentials;
use awx_core::domain::aggregate::LabelOrder;
use awx_core::domain::whitelist::WhitelistPolicy;
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration document
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub awx: AwxSettings,

    #[serde(default)]
    pub whitelist: WhitelistPolicy,

    #[serde(default)]
    pub exporter: ExporterSettings,
}

/// Connection settings for the AWX API
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AwxSettings {
    /// Jobs endpoint, e.g. "http://awx.example.com/api/v2/jobs/"
    pub api_url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AwxSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwxSettings")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings of the exporter process itself
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExporterSettings {
    /// Address the metrics endpoint listens on
    pub listen_addr: String,

    /// Pause between two poll cycles
    pub poll_interval_secs: u64,

    /// Upper bound for a single request to AWX
    pub request_timeout_secs: u64,

    /// Sort label names before joining them into the `job_labels` value
    pub sort_labels: bool,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            poll_interval_secs: 10,
            request_timeout_secs: 10,
            sort_labels: false,
        }
    }
}

impl Config {
    /// Loads, overrides from the process environment, and validates
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML file without validating it
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    /// Parses a YAML document without validating it
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Applies environment overrides
    ///
    /// Recognized variables:
    /// - AWX_API_URL
    /// - AWX_USERNAME
    /// - AWX_PASSWORD
    /// - AWX_EXPORTER_LISTEN_ADDR
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("AWX_API_URL") {
            self.awx.api_url = url;
        }
        if let Some(username) = lookup("AWX_USERNAME") {
            self.awx.username = username;
        }
        if let Some(password) = lookup("AWX_PASSWORD") {
            self.awx.password = password;
        }
        if let Some(addr) = lookup("AWX_EXPORTER_LISTEN_ADDR") {
            self.exporter.listen_addr = addr;
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.awx.api_url.is_empty() {
            return Err(invalid("awx.api_url cannot be empty"));
        }

        if !self.awx.api_url.starts_with("http://") && !self.awx.api_url.starts_with("https://")
        {
            return Err(invalid("awx.api_url must start with http:// or https://"));
        }

        if self.awx.username.is_empty() {
            return Err(invalid("awx.username cannot be empty"));
        }

        if self.exporter.poll_interval_secs == 0 {
            return Err(invalid("exporter.poll_interval_secs must be greater than 0"));
        }

        if self.exporter.request_timeout_secs == 0 {
            return Err(invalid(
                "exporter.request_timeout_secs must be greater than 0",
            ));
        }

        self.listen_addr()?;

        Ok(())
    }

    /// Parsed listen address of the metrics endpoint
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.exporter.listen_addr.parse().map_err(|_| {
            invalid(format!(
                "exporter.listen_addr '{}' is not a socket address",
                self.exporter.listen_addr
            ))
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.exporter.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.exporter.request_timeout_secs)
    }

    pub fn label_order(&self) -> LabelOrder {
        if self.exporter.sort_labels {
            LabelOrder::Sorted
        } else {
            LabelOrder::Upstream
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.awx.username.clone(), self.awx.password.clone())
    }

    /// True when the whitelist is on but can never match anything
    pub fn whitelist_rejects_everything(&self) -> bool {
        self.whitelist.enabled
            && (self.whitelist.organizations.is_empty() || self.whitelist.labels.is_empty())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const FULL: &str = r#"
awx:
  api_url: http://awx.example.com/api/v2/jobs/
  username: admin
  password: secret
whitelist:
  enabled: true
  organizations:
    - Default
    - Ops
  labels:
    - prod
exporter:
  listen_addr: 127.0.0.1:9100
  poll_interval_secs: 30
  sort_labels: true
"#;

    const MINIMAL: &str = r#"
awx:
  api_url: https://awx.example.com/api/v2/jobs/
  username: admin
  password: secret
"#;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_yaml(FULL).unwrap();

        assert_eq!(config.awx.api_url, "http://awx.example.com/api/v2/jobs/");
        assert!(config.whitelist.enabled);
        assert!(config.whitelist.organizations.contains("Ops"));
        assert!(config.whitelist.labels.contains("prod"));
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.label_order(), LabelOrder::Sorted);
        assert_eq!(
            config.listen_addr().unwrap(),
            "127.0.0.1:9100".parse::<SocketAddr>().unwrap()
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let config = Config::from_yaml(MINIMAL).unwrap();

        assert!(!config.whitelist.enabled);
        assert!(config.whitelist.organizations.is_empty());
        assert_eq!(config.exporter.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.label_order(), LabelOrder::Upstream);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::from_yaml(MINIMAL).unwrap();

        config.awx.api_url = "awx.example.com".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.awx.api_url = "http://awx".to_string();
        config.awx.username = String::new();
        assert!(config.validate().is_err());

        config.awx.username = "admin".to_string();
        config.exporter.poll_interval_secs = 0;
        assert!(config.validate().is_err());

        config.exporter.poll_interval_secs = 10;
        config.exporter.listen_addr = "not-an-addr".to_string();
        assert!(config.validate().is_err());

        config.exporter.listen_addr = "0.0.0.0:8080".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::from_yaml(MINIMAL).unwrap();
        let env: HashMap<&str, &str> = [
            ("AWX_API_URL", "http://other/api/v2/jobs/"),
            ("AWX_PASSWORD", "from-env"),
        ]
        .into();

        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.awx.api_url, "http://other/api/v2/jobs/");
        assert_eq!(config.awx.username, "admin");
        assert_eq!(config.awx.password, "from-env");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.awx.username, "admin");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let err = Config::from_yaml("awx: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_whitelist_rejects_everything() {
        let mut config = Config::from_yaml(FULL).unwrap();
        assert!(!config.whitelist_rejects_everything());

        config.whitelist.labels.clear();
        assert!(config.whitelist_rejects_everything());

        config.whitelist.enabled = false;
        assert!(!config.whitelist_rejects_everything());
    }

    #[test]
    fn test_debug_hides_password() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
