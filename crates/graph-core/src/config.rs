//! Configuration structures for Graph clients.
//!
//! This module provides the serializable, validated configuration used to
//! point a client at a Graph endpoint and bound its request timings.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Public Microsoft Graph v1.0 endpoint.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0/";

/// Configuration for a Graph client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GraphConfig {
    /// Graph base URL, including the API version segment
    #[validate(url)]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds
    #[validate(range(min = 1, max = 60))]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Optional override for the User-Agent header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_GRAPH_BASE_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

impl GraphConfig {
    /// Create a new configuration pointing at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: base_url.into(),
            ..Self::default()
        };

        config.validate()?;

        Ok(config)
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set connect timeout in seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout_secs = seconds;
        self
    }

    /// Set the User-Agent header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Parse the base URL, guaranteeing a trailing slash so relative paths
    /// join underneath the version segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or cannot carry paths.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::ConfigError(format!("Invalid Graph URL: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(Error::ConfigError(format!(
                "Graph URL `{}` cannot be used as a base",
                self.base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_valid() {
        let config = GraphConfig::new("https://graph.microsoft.com/beta").unwrap();
        assert_eq!(config.base_url, "https://graph.microsoft.com/beta");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn test_config_new_invalid_url() {
        let result = GraphConfig::new("not a url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.base_url, DEFAULT_GRAPH_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_config_validation_rejects_out_of_range_timeout() {
        let config = GraphConfig::default().with_timeout(0);
        assert!(config.validate().is_err());

        let config = GraphConfig::default().with_connect_timeout(61);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_base_url_appends_trailing_slash() {
        let config = GraphConfig::new("https://graph.microsoft.com/v1.0").unwrap();
        let url = config.parse_base_url().unwrap();
        assert_eq!(url.as_str(), "https://graph.microsoft.com/v1.0/");
        assert_eq!(
            url.join("me").unwrap().as_str(),
            "https://graph.microsoft.com/v1.0/me"
        );
    }

    #[test]
    fn test_config_deserialize_fills_defaults() {
        let config: GraphConfig =
            serde_json::from_str(r#"{"user_agent": "directory-tool/1.0"}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_GRAPH_BASE_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.user_agent.as_deref(), Some("directory-tool/1.0"));
    }

    #[test]
    fn test_config_serialize_skips_missing_user_agent() {
        let json = serde_json::to_string(&GraphConfig::default()).unwrap();
        assert!(!json.contains("user_agent"));
    }
}
