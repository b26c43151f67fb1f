//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → consumed once by lifecycle::startup
//! ```
//!
//! # Design Decisions
//! - Config is read exactly once; there is no reload path
//! - Only `api_keys` and `model` are mandatory
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ApiKeys, BackendConfig, ListenerConfig, LogFormat, ObservabilityConfig, PostProcessConfig,
    SecurityConfig, ServiceConfig, ValidationOverride,
};
pub use validation::ConfigViolation;
