//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.
//! Only `api_keys` and `model` are required; every section has defaults.

use std::collections::BTreeSet;

use axum::http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::types::AddressField;

/// Root configuration for the address normalization service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Keys accepted in the `X-API-Key` header.
    pub api_keys: ApiKeys,

    /// Parser backend variant to instantiate.
    pub model: String,

    /// Compute placement hint for the backend (`cpu`, `gpu`, `cuda:N`).
    #[serde(default = "default_device")]
    pub device: String,

    #[serde(default)]
    pub listener: ListenerConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub post_process: PostProcessConfig,

    /// Validation failures answered with a fixed response instead of 422.
    #[serde(default = "default_validation_overrides")]
    pub validation_overrides: Vec<ValidationOverride>,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Build a configuration with the given keys and model and defaults elsewhere.
    pub fn new<I, S>(api_keys: I, model: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            api_keys: api_keys.into_iter().map(Into::into).collect(),
            model: model.into(),
            device: default_device(),
            listener: ListenerConfig::default(),
            backend: BackendConfig::default(),
            post_process: PostProcessConfig::default(),
            validation_overrides: default_validation_overrides(),
            security: SecurityConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

fn default_device() -> String {
    "cpu".to_string()
}

/// Deduplicated set of accepted API keys.
///
/// `Debug` only reports how many keys are loaded.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ApiKeys(BTreeSet<String>);

impl ApiKeys {
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ApiKeys {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKeys(<{} redacted>)", self.0.len())
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Parser backend execution settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Maximum concurrent parse calls. 0 means unbounded.
    pub max_concurrency: usize,
}

/// Casing policy applied after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Fields rewritten to title case.
    pub title_case: Vec<AddressField>,

    /// Fields rewritten to upper case, after title casing.
    pub upper_case: Vec<AddressField>,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            title_case: vec![
                AddressField::StreetName,
                AddressField::Municipality,
                AddressField::Province,
            ],
            upper_case: vec![AddressField::Province],
        }
    }
}

/// Replace the 422 response when one field is missing on one route.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ValidationOverride {
    /// Route template the rule applies to (e.g., "/parse-address/").
    pub route: String,

    /// Location of the failing element, e.g. `["header", "x-api-key"]`.
    pub location: Vec<String>,

    /// HTTP status returned instead of 422. Written as a number.
    #[serde(with = "status_code")]
    pub status: StatusCode,

    /// JSON body returned with `status`.
    pub body: serde_json::Value,
}

fn default_validation_overrides() -> Vec<ValidationOverride> {
    vec![ValidationOverride {
        route: "/parse-address/".to_string(),
        location: vec!["header".to_string(), "x-api-key".to_string()],
        status: StatusCode::UNAUTHORIZED,
        body: serde_json::json!({ "401": "Unauthorized" }),
    }]
}

mod status_code {
    use super::*;

    pub fn serialize<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(status.as_u16())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<StatusCode, D::Error> {
        let code = u16::deserialize(deserializer)?;
        StatusCode::from_u16(code).map_err(serde::de::Error::custom)
    }
}

/// Request hardening.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
