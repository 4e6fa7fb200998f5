//! HTTP client settings and the authenticated Graph transport.
//!
//! [`ServiceClient`] issues exactly one GET per call with a bearer token,
//! maps non-success statuses to [`Error`] and hands back either parsed JSON
//! or raw bytes. It never retries.

use crate::config::GraphConfig;
use crate::error::map_status_to_error;
use crate::query::QueryParams;
use crate::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use validator::Validate;

/// Default request timeout for Graph calls (seconds)
pub const GRAPH_DEFAULT_TIMEOUT: u64 = 30;

/// Default connect timeout for Graph calls (seconds)
pub const GRAPH_CONNECT_TIMEOUT: u64 = 10;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

const DEFAULT_USER_AGENT: &str = concat!("graph-core/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration.
///
/// Configures timeouts, connection pooling and compression for the
/// underlying reqwest client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connect timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(GRAPH_DEFAULT_TIMEOUT),
            connect_timeout: Duration::from_secs(GRAPH_CONNECT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw response body together with its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryBody {
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Response bytes.
    pub bytes: Vec<u8>,
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    base_url: Url,
    http_config: ClientConfig,
    user_agent: String,
}

impl ServiceClientBuilder {
    /// Create a builder for the specified base URL with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::from_config(&GraphConfig::new(base_url.as_ref())?)
    }

    /// Create a builder from a validated [`GraphConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn from_config(config: &GraphConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.parse_base_url()?;
        let http_config = ClientConfig::new()
            .with_timeout(config.timeout())
            .with_connect_timeout(config.connect_timeout());

        Ok(Self {
            base_url,
            http_config,
            user_agent: config
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }

    /// Override the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let mut builder = Client::builder()
            .user_agent(self.user_agent)
            .timeout(self.http_config.timeout)
            .connect_timeout(self.http_config.connect_timeout)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host);

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build Graph HTTP client: {err}"))
        })?;

        Ok(ServiceClient {
            http,
            base_url: self.base_url,
        })
    }
}

/// Authenticated single-shot transport for Graph endpoints.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: Url,
}

impl ServiceClient {
    /// Return the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL by appending `segments` to the base URL.
    ///
    /// Each segment is percent-encoded on its own, so a `/` inside a segment
    /// cannot change the path structure. Empty, `.` and `..` segments are
    /// rejected because URL normalization would drop or collapse them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if a segment is empty, `.` or `..`,
    /// or if the base URL cannot carry path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if let Some(segment) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(Error::InvalidEndpoint(format!(
                "path segment `{segment}` is not allowed in `/{}`",
                segments.join("/")
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::InvalidEndpoint(format!("`{}` cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a GET and return the successful response.
    ///
    /// # Errors
    ///
    /// Returns a transport error on network failure or a non-success status.
    pub async fn get(
        &self,
        mut url: Url,
        query: &QueryParams,
        token: &SecretString,
        accept: &str,
    ) -> Result<Response> {
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&query.to_query_string()));
        }

        debug!(path = url.path(), "Graph request");

        let result = self
            .http
            .get(url.clone())
            .bearer_auth(token.expose_secret())
            .header(ACCEPT, accept)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(err) => return Err(log_failure(url.path(), Error::from(err))),
        };

        let status = response.status();
        debug!(path = url.path(), %status, "Graph response");

        if status.is_success() {
            return Ok(response);
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                debug!(path = url.path(), %status, "Failed to read Graph error body: {err}");
                String::new()
            }
        };
        Err(log_failure(url.path(), map_status_to_error(status, &text)))
    }

    /// Issue a GET and parse the JSON body.
    ///
    /// Returns `Ok(None)` for `204 No Content` or an empty body.
    ///
    /// # Errors
    ///
    /// Returns a transport error for failed requests and
    /// [`Error::Decoding`] if the body is not valid JSON for `T`.
    pub async fn get_json<T>(
        &self,
        url: Url,
        query: &QueryParams,
        token: &SecretString,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let path = url.path().to_string();
        let response = self.get(url, query, token, "application/json").await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.bytes().await.map_err(|err| {
            log_failure(
                &path,
                Error::Decoding(format!("Failed to read Graph response for `{path}`: {err}")),
            )
        })?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&body).map(Some).map_err(|err| {
            log_failure(
                &path,
                Error::Decoding(format!("Failed to parse Graph response for `{path}`: {err}")),
            )
        })
    }

    /// Issue a GET and return the raw body with its content type.
    ///
    /// # Errors
    ///
    /// Returns a transport error for failed requests and
    /// [`Error::Decoding`] if the body cannot be read.
    pub async fn get_bytes(
        &self,
        url: Url,
        query: &QueryParams,
        token: &SecretString,
    ) -> Result<BinaryBody> {
        let path = url.path().to_string();
        let response = self.get(url, query, token, "*/*").await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        let bytes = response.bytes().await.map_err(|err| {
            log_failure(
                &path,
                Error::Decoding(format!("Failed to read Graph payload for `{path}`: {err}")),
            )
        })?;

        Ok(BinaryBody {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

fn log_failure(path: &str, error: Error) -> Error {
    if error.should_log() {
        warn!(path, code = error.error_code(), "Graph request failed: {error}");
    } else {
        debug!(path, code = error.error_code(), "Graph request failed: {error}");
    }
    error
}
