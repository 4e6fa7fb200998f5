//! Access token capability consumed by Graph clients.
//!
//! Clients never mint or cache tokens themselves. They register the scopes
//! an operation needs through [`TokenProvider::add_scope`] and then ask the
//! provider for a bearer token.

use crate::Result;
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Source of OAuth bearer tokens for Graph requests.
///
/// Implementations own token lifetime, refresh and scope deduplication.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Acquire an access token covering every scope registered so far.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Authentication`] if no token can be obtained.
    async fn access_token(&self) -> Result<SecretString>;

    /// Register a permission scope that future tokens must include.
    ///
    /// Must not block, and registering the same scope twice is a no-op.
    fn add_scope(&self, scope: &str);
}

/// Provider that hands out a fixed, pre-acquired token.
///
/// Useful for tooling that obtains a token out of band, and for tests.
/// Registered scopes are recorded so callers can inspect what was requested.
pub struct StaticTokenProvider {
    token: SecretString,
    scopes: RwLock<BTreeSet<String>>,
}

impl StaticTokenProvider {
    /// Create a provider that always returns `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            scopes: RwLock::new(BTreeSet::new()),
        }
    }

    /// Scopes registered so far, in sorted order.
    #[must_use]
    pub fn scopes(&self) -> Vec<String> {
        self.scopes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .field("scopes", &self.scopes())
            .finish()
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<SecretString> {
        Ok(SecretString::from(self.token.expose_secret().to_owned()))
    }

    fn add_scope(&self, scope: &str) {
        self.scopes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(scope.to_owned());
    }
}
