//! API key authentication.
//!
//! # Responsibilities
//! - Decide whether a provided `X-API-Key` value is a loaded key
//! - Produce an [`ApiKeyPrincipal`] for authenticated requests
//!
//! # Design Decisions
//! - The key set is fixed at startup; every decision is a set lookup
//! - Keys never reach logs: both the principal and the key set redact `Debug`

use thiserror::Error;

use crate::config::schema::ApiKeys;
use crate::observability::metrics;

/// Header carrying the API key.
pub const X_API_KEY: &str = "x-api-key";

/// Authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("unauthorized")]
    Unauthorized,
}

/// A key that passed [`ApiKeyStore::authenticate`].
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeyPrincipal(String);

impl ApiKeyPrincipal {
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKeyPrincipal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKeyPrincipal(<redacted>)")
    }
}

/// Immutable set of accepted keys.
#[derive(Debug, Clone)]
pub struct ApiKeyStore {
    keys: ApiKeys,
}

impl ApiKeyStore {
    pub fn new(keys: ApiKeys) -> Self {
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Accept `provided` only if it is one of the loaded keys.
    pub fn authenticate(&self, provided: Option<&str>) -> Result<ApiKeyPrincipal, AuthError> {
        match provided {
            Some(key) if self.keys.contains(key) => Ok(ApiKeyPrincipal(key.to_string())),
            Some(_) => {
                metrics::record_auth_failure("invalid");
                tracing::warn!("Rejected request with unknown API key");
                Err(AuthError::Unauthorized)
            }
            None => {
                metrics::record_auth_failure("missing");
                tracing::warn!("Rejected request without API key");
                Err(AuthError::Unauthorized)
            }
        }
    }
}
