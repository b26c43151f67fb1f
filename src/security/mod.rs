//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → http::extract (read X-API-Key)
//!     → auth.rs (membership check against the loaded key set)
//!     → ApiKeyPrincipal, or 401 before any parsing work
//! ```
//!
//! # Design Decisions
//! - Fail closed: anything but an exact key match is rejected
//! - Authentication runs before the request body is read

pub mod auth;

pub use auth::{ApiKeyPrincipal, ApiKeyStore, AuthError, X_API_KEY};
