//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and address formats
//! - Check the validation override table is well formed
//!
//! # Design Decisions
//! - Returns all violations, not just the first
//! - Validation is a pure function: ServiceConfig → Result<(), Vec<ConfigViolation>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::backend::Device;
use crate::config::schema::ServiceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ConfigViolation {
    pub field: String,
    pub message: String,
}

impl ConfigViolation {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ConfigViolation>> {
    let mut violations = Vec::new();

    if config.api_keys.is_empty() {
        violations.push(ConfigViolation::new("api_keys", "at least one key is required"));
    }
    if config.api_keys.iter().any(|key| key.trim().is_empty()) {
        violations.push(ConfigViolation::new("api_keys", "keys must not be blank"));
    }

    if config.model.trim().is_empty() {
        violations.push(ConfigViolation::new("model", "must not be blank"));
    }

    if let Err(e) = config.device.parse::<Device>() {
        violations.push(ConfigViolation::new("device", e.to_string()));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        violations.push(ConfigViolation::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.security.max_body_size == 0 {
        violations.push(ConfigViolation::new("security.max_body_size", "must be greater than 0"));
    }

    for (i, rule) in config.validation_overrides.iter().enumerate() {
        let field = |name: &str| format!("validation_overrides[{i}].{name}");
        if !rule.route.starts_with('/') {
            violations.push(ConfigViolation::new(field("route"), "must start with '/'"));
        }
        if rule.location.is_empty() {
            violations.push(ConfigViolation::new(field("location"), "must not be empty"));
        }
        if !(rule.status.is_client_error() || rule.status.is_server_error()) {
            violations.push(ConfigViolation::new(
                field("status"),
                format!("{} is not a 4xx or 5xx status", rule.status.as_u16()),
            ));
        }
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_lowercase().as_str()) {
        violations.push(ConfigViolation::new(
            "observability.log_level",
            format!("unknown level '{}'", observability.log_level),
        ));
    }
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        violations.push(ConfigViolation::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
