//! Route-specific replacements for validation responses.
//!
//! A rule says: on `route`, when validation reports `location` as missing,
//! answer with `status` and `body` instead of the generic 422. The default
//! table turns a missing `x-api-key` header on `/parse-address/` into
//! `401 {"401": "Unauthorized"}`.

use axum::http::StatusCode;
use serde_json::Value;

use crate::config::schema::ValidationOverride;
use crate::http::error::{ApiError, ValidationError};

#[derive(Debug, Clone, PartialEq)]
struct OverrideRule {
    route: String,
    location: Vec<String>,
    status: StatusCode,
    body: Value,
}

/// Ordered rule table; the first matching rule wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideTable {
    rules: Vec<OverrideRule>,
}

impl OverrideTable {
    pub fn from_config(rules: &[ValidationOverride]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| OverrideRule {
                route: rule.route.clone(),
                location: rule.location.clone(),
                status: rule.status,
                body: rule.body.clone(),
            })
            .collect();
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Turn a validation failure on `route` into the response to send.
    pub fn resolve(&self, route: &str, error: ValidationError) -> ApiError {
        let matched = self
            .rules
            .iter()
            .find(|rule| rule.route == route && error.is_missing_at(&rule.location));

        match matched {
            Some(rule) => {
                tracing::debug!(route, status = %rule.status, "Validation override applied");
                ApiError::Override {
                    status: rule.status,
                    body: rule.body.clone(),
                }
            }
            None => ApiError::Validation(error),
        }
    }
}
