//! Asynchronous Graph directory client implementation.

use crate::models::{Event, Person, User, ValueList};
use crate::photo::PhotoEncoding;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use graph_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use graph_core::config::GraphConfig;
use graph_core::query::QueryParams;
use graph_core::{Error, TokenProvider};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("graph-directory/", env!("CARGO_PKG_VERSION"));

/// Scope for reading the signed-in user's profile and photo.
pub const SCOPE_USER_READ: &str = "user.read";

/// Scope for reading basic profiles and photos of other users.
pub const SCOPE_USER_READ_BASIC_ALL: &str = "user.readbasic.all";

/// Scope for searching people relevant to the signed-in user.
pub const SCOPE_PEOPLE_READ: &str = "people.read";

/// Directory operations exposed by [`DirectoryClient`].
///
/// Callers that want to substitute a fake directory in their own tests can
/// depend on this trait instead of the concrete client.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Fetch the signed-in user.
    async fn current_user(&self) -> Result<User>;

    /// Fetch a user by object id or user principal name.
    async fn user_by_id(&self, id: &str) -> Result<User>;

    /// Search people relevant to the signed-in user.
    ///
    /// Returns `None` when the service sends no `value`.
    async fn find_person(&self, query: &str) -> Result<Option<Vec<Person>>>;

    /// Fetch the signed-in user's photo as a data URI.
    async fn my_photo(&self) -> Result<PhotoEncoding>;

    /// Fetch another user's photo as a data URI.
    async fn user_photo(&self, id: &str) -> Result<PhotoEncoding>;

    /// List calendar events overlapping `[start, end)`.
    ///
    /// Returns `None` when the service sends no `value`.
    async fn calendar_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<Vec<Event>>>;
}

/// Builder for [`DirectoryClient`].
pub struct DirectoryClientBuilder {
    tokens: Arc<dyn TokenProvider>,
    config: GraphConfig,
    http_config: Option<ClientConfig>,
}

impl DirectoryClientBuilder {
    /// Create a builder targeting the public Graph endpoint.
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            tokens,
            config: GraphConfig::default(),
            http_config: None,
        }
    }

    /// Point the client at a different Graph base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Replace the whole Graph configuration.
    #[must_use]
    pub fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = Some(config);
        self
    }

    /// Override the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<DirectoryClient> {
        let user_agent = self
            .config
            .user_agent
            .clone()
            .unwrap_or_else(|| USER_AGENT.to_string());

        let mut builder = ServiceClientBuilder::from_config(&self.config)?.with_user_agent(user_agent);
        if let Some(http_config) = self.http_config {
            builder = builder.with_http_config(http_config);
        }

        Ok(DirectoryClient {
            inner: builder.build()?,
            tokens: self.tokens,
        })
    }
}

/// Asynchronous Graph directory client.
///
/// Each call registers its scope, obtains a token and sends one request.
/// Clones share the connection pool and the token provider.
#[derive(Clone)]
pub struct DirectoryClient {
    inner: ServiceClient,
    tokens: Arc<dyn TokenProvider>,
}

impl fmt::Debug for DirectoryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryClient")
            .field("base_url", &self.inner.base_url().as_str())
            .finish_non_exhaustive()
    }
}

impl DirectoryClient {
    /// Construct a client for the public Graph endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        DirectoryClientBuilder::new(tokens).build()
    }

    /// Start building a client.
    #[must_use]
    pub fn builder(tokens: Arc<dyn TokenProvider>) -> DirectoryClientBuilder {
        DirectoryClientBuilder::new(tokens)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    async fn authorize(&self, scope: Option<&'static str>) -> Result<SecretString> {
        if let Some(scope) = scope {
            self.tokens.add_scope(scope);
        }
        self.tokens.access_token().await.map_err(|err| {
            warn!(?scope, code = err.error_code(), "Token acquisition failed: {err}");
            err
        })
    }

    async fn get_json<T>(
        &self,
        scope: Option<&'static str>,
        segments: &[&str],
        query: &QueryParams,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        debug!(?segments, ?scope, "Graph directory call");
        let url = self.inner.endpoint(segments)?;
        let token = self.authorize(scope).await?;
        self.inner.get_json(url, query, &token).await
    }

    async fn get_record<T>(&self, scope: &'static str, segments: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.get_json(Some(scope), segments, &QueryParams::new())
            .await?
            .ok_or_else(|| {
                Error::Decoding(format!(
                    "Graph returned an empty body for `/{}`",
                    segments.join("/")
                ))
            })
    }

    async fn get_photo(&self, scope: &'static str, segments: &[&str]) -> Result<PhotoEncoding> {
        debug!(?segments, scope, "Graph photo call");
        let url = self.inner.endpoint(segments)?;
        let token = self.authorize(Some(scope)).await?;
        let body = self.inner.get_bytes(url, &QueryParams::new(), &token).await?;
        Ok(PhotoEncoding::from_body(&body))
    }
}

/// Graph expects the search term wrapped in double quotes. Embedded quotes
/// are passed through untouched.
fn search_term(query: &str) -> String {
    format!("\"{query}\"")
}

fn iso8601(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl Directory for DirectoryClient {
    async fn current_user(&self) -> Result<User> {
        self.get_record(SCOPE_USER_READ, &["me"]).await
    }

    async fn user_by_id(&self, id: &str) -> Result<User> {
        self.get_record(SCOPE_USER_READ_BASIC_ALL, &["users", id])
            .await
    }

    async fn find_person(&self, query: &str) -> Result<Option<Vec<Person>>> {
        let mut params = QueryParams::new();
        params.push("$search", search_term(query));
        let list: Option<ValueList<Person>> = self
            .get_json(Some(SCOPE_PEOPLE_READ), &["me", "people"], &params)
            .await?;
        Ok(list.and_then(|list| list.value))
    }

    async fn my_photo(&self) -> Result<PhotoEncoding> {
        self.get_photo(SCOPE_USER_READ, &["me", "photo", "$value"])
            .await
    }

    async fn user_photo(&self, id: &str) -> Result<PhotoEncoding> {
        self.get_photo(SCOPE_USER_READ_BASIC_ALL, &["users", id, "photo", "$value"])
            .await
    }

    async fn calendar_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<Vec<Event>>> {
        let mut params = QueryParams::new();
        params.push_raw("startdatetime", iso8601(start));
        params.push_raw("enddatetime", iso8601(end));
        let list: Option<ValueList<Event>> = self
            .get_json(None, &["me", "calendarview"], &params)
            .await?;
        Ok(list.and_then(|list| list.value))
    }
}
