//! Address model and text processing.
//!
//! # Data Flow
//! ```text
//! RawAddressRequest.address
//!     → normalizer.rs (deterministic cleaning)
//!     → [parser backend]
//!     → casing.rs (field casing policy)
//!     → AddressResponse
//! ```

pub mod casing;
pub mod normalizer;
pub mod types;

pub use casing::{Casing, CasingPolicy};
pub use normalizer::normalize;
pub use types::{AddressField, AddressResponse, ParsedAddress, RawAddressRequest};
