//! Configuration for the Claviz client.
//!
//! Configuration is always supplied programmatically, either built in code or
//! parsed from a YAML/JSON document the caller points at.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tokio::fs;

use crate::error::{Error, Result};
use crate::VERSION;

/// Default interval between function instance status polls (10 seconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// User agent string sent with every request.
pub fn default_user_agent() -> String {
    format!("claviz-client/{} (rust)", VERSION)
}

/// Client configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server base URL
    pub base_url: String,
    /// Authorization header value, e.g. `Bearer eyJ...`
    pub token: String,
    /// Delay between status polls of a background function
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// User agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration with default poll interval and user agent.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            user_agent: default_user_agent(),
        }
    }

    /// Override the poll interval used by `execute_function`. The interval
    /// is stored in whole milliseconds, rounded up.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_nanos().div_ceil(1_000_000) as u64;
        self
    }

    /// Override the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Check that the configuration can produce a working client.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("base_url is empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://: {}",
                self.base_url
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.yaml`/`.yml` files are parsed as YAML, anything
    /// else as JSON.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default_values() {
        let config = ClientConfig::new("https://claviz.example.com", "Bearer abc");

        assert_eq!(config.base_url, "https://claviz.example.com");
        assert_eq!(config.token, "Bearer abc");
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert!(config.user_agent.starts_with("claviz-client/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builders() {
        let config = ClientConfig::new("http://localhost:5000", "Bearer abc")
            .with_poll_interval(Duration::from_millis(250))
            .with_user_agent("importer/1.0");

        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.user_agent, "importer/1.0");
    }

    #[test]
    fn test_poll_interval_rounds_up_to_millis() {
        let config = ClientConfig::new("https://claviz.example.com", "Bearer abc")
            .with_poll_interval(Duration::from_micros(500));
        assert_eq!(config.poll_interval_ms, 1);
        assert!(config.validate().is_ok());

        let config = config.with_poll_interval(Duration::from_micros(2_100));
        assert_eq!(config.poll_interval_ms, 3);
    }

    #[test]
    fn test_config_validation() {
        let empty = ClientConfig::new("", "Bearer abc");
        assert!(matches!(empty.validate(), Err(Error::Config(_))));

        let no_scheme = ClientConfig::new("claviz.example.com", "Bearer abc");
        assert!(matches!(no_scheme.validate(), Err(Error::Config(_))));

        let zero_interval = ClientConfig::new("https://claviz.example.com", "Bearer abc")
            .with_poll_interval(Duration::ZERO);
        assert!(matches!(zero_interval.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("https://claviz.example.com", "Bearer secret-token");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
base_url: https://claviz.example.com
token: Bearer abc
poll_interval_ms: 2000
"#;
        let config = ClientConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.user_agent, default_user_agent());
    }

    #[test]
    fn test_config_from_json_defaults() {
        let json = r#"{"base_url": "https://claviz.example.com", "token": "Bearer abc"}"#;
        let config = ClientConfig::from_json_str(json).unwrap();
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn test_config_from_json_rejects_invalid_url() {
        let json = r#"{"base_url": "ftp://claviz.example.com", "token": "Bearer abc"}"#;
        assert!(matches!(
            ClientConfig::from_json_str(json),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_config_load_by_extension() {
        let mut yaml_file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(yaml_file, "base_url: http://localhost:5000\ntoken: Bearer abc").unwrap();
        let config = ClientConfig::load(yaml_file.path()).await.unwrap();
        assert_eq!(config.base_url, "http://localhost:5000");

        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            json_file,
            r#"{{"base_url": "http://localhost:5000", "token": "Bearer xyz", "poll_interval_ms": 50}}"#
        )
        .unwrap();
        let config = ClientConfig::load(json_file.path()).await.unwrap();
        assert_eq!(config.token, "Bearer xyz");
        assert_eq!(config.poll_interval_ms, 50);
    }

    #[tokio::test]
    async fn test_config_load_missing_file() {
        let result = ClientConfig::load("/nonexistent/claviz.yaml").await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
