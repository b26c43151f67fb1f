//! Address normalization service library.

pub mod address;
pub mod backend;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use address::{normalize, ParsedAddress};
pub use backend::{AddressParser, ParseFailure};
pub use config::ServiceConfig;
pub use http::{HttpServer, ServiceContext};
pub use lifecycle::Shutdown;
