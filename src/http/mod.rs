//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, body limit)
//!     → extract.rs (API key, then body validation via overrides.rs)
//!     → handlers.rs (normalize → parse → casing → encode)
//!     → error.rs (every failure rendered in one place)
//!     → Send to client
//! ```

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod overrides;
pub mod request;
pub mod server;

pub use error::{ApiError, FieldIssue, ValidationError};
pub use overrides::OverrideTable;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServiceContext, HEALTH_ROUTE, PARSE_ADDRESS_ROUTE};
