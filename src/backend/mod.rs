//! Address parser backends.
//!
//! # Data Flow
//! ```text
//! startup:
//!     (model, device) → registry.rs → Arc<dyn AddressParser> → pool.rs
//!
//! per request:
//!     normalized address → ParserPool::parse → blocking pool → ParsedAddress
//! ```
//!
//! # Design Decisions
//! - Exactly one parser instance per process, chosen at startup
//! - `parse` is blocking; the pool moves it off the async workers
//! - Construction errors are fatal, parse errors are per request

pub mod heuristic;
pub mod pool;
pub mod registry;

use std::str::FromStr;

use thiserror::Error;

use crate::address::types::ParsedAddress;

pub use heuristic::HeuristicParser;
pub use pool::ParserPool;
pub use registry::{build_parser, ModelKind};

/// A parsing capability mapping a normalized address to tagged fields.
pub trait AddressParser: Send + Sync {
    /// Identifier of the model behind this parser.
    fn model(&self) -> &str;

    /// Tag the components of a normalized address. May be expensive.
    fn parse(&self, normalized: &str) -> Result<ParsedAddress, ParseFailure>;
}

/// Per-request failure to produce a [`ParsedAddress`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("address is empty after normalization")]
    EmptyInput,

    #[error("address could not be parsed: {0}")]
    Unrecognized(String),

    #[error("parse task aborted: {0}")]
    Aborted(String),
}

/// Startup failure to construct a parser backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    #[error("model '{0}' needs an inference runtime that is not available in this build")]
    RuntimeUnavailable(String),

    #[error("model '{model}' cannot run on device '{device}'")]
    UnsupportedDevice { model: String, device: Device },
}

/// Compute placement for a parser backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Gpu(u32),
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Cpu => f.write_str("cpu"),
            Device::Gpu(index) => write!(f, "cuda:{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized device '{0}', expected cpu, gpu, cuda or cuda:<index>")]
pub struct InvalidDevice(String);

impl FromStr for Device {
    type Err = InvalidDevice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "cpu" => Ok(Device::Cpu),
            "gpu" | "cuda" => Ok(Device::Gpu(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|index| index.parse().ok())
                .map(Device::Gpu)
                .ok_or_else(|| InvalidDevice(s.to_string())),
        }
    }
}
