//! Execution wrapper around the process-wide parser.
//!
//! # Responsibilities
//! - Run blocking `parse` calls on the Tokio blocking pool
//! - Optionally cap concurrent parses with a semaphore
//! - Record parse outcome and latency
//!
//! # Design Decisions
//! - The parser is shared read-only behind an `Arc`; no per-request state
//! - Callers wait for a permit instead of being rejected when the cap is hit
//! - No retries: a failure goes straight back to the request handler

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;

use crate::address::types::ParsedAddress;
use crate::backend::{AddressParser, ParseFailure};
use crate::observability::metrics;

/// Shared handle to the single parser instance.
#[derive(Clone)]
pub struct ParserPool {
    parser: Arc<dyn AddressParser>,
    permits: Option<Arc<Semaphore>>,
    max_concurrency: usize,
}

impl std::fmt::Debug for ParserPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserPool")
            .field("model", &self.parser.model())
            .field("max_concurrency", &self.max_concurrency())
            .finish()
    }
}

impl ParserPool {
    /// Wrap `parser`. A `max_concurrency` of 0 leaves parsing unbounded.
    pub fn new(parser: Arc<dyn AddressParser>, max_concurrency: usize) -> Self {
        let permits = (max_concurrency > 0).then(|| Arc::new(Semaphore::new(max_concurrency)));
        Self {
            parser,
            permits,
            max_concurrency,
        }
    }

    pub fn model(&self) -> &str {
        self.parser.model()
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.permits.as_ref().map(|_| self.max_concurrency)
    }

    /// Parse a normalized address off the async worker threads.
    pub async fn parse(&self, normalized: String) -> Result<ParsedAddress, ParseFailure> {
        let _permit = match &self.permits {
            Some(semaphore) => Some(
                semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|e| ParseFailure::Aborted(e.to_string()))?,
            ),
            None => None,
        };

        let start = Instant::now();
        let parser = Arc::clone(&self.parser);
        let result = tokio::task::spawn_blocking(move || parser.parse(&normalized))
            .await
            .unwrap_or_else(|e| Err(ParseFailure::Aborted(e.to_string())));

        let outcome = match &result {
            Ok(_) => "ok",
            Err(ParseFailure::EmptyInput) => "empty",
            Err(ParseFailure::Unrecognized(_)) => "unrecognized",
            Err(ParseFailure::Aborted(_)) => "aborted",
        };
        metrics::record_parse(outcome, start);
        tracing::debug!(outcome, elapsed_ms = start.elapsed().as_millis() as u64, "Parse finished");

        result
    }
}
