//! Metrics collection and exposition.
//!
//! # Metrics
//! - `address_requests_total` (counter): requests by route, status
//! - `address_request_duration_seconds` (histogram): latency by route
//! - `address_parse_total` (counter): backend calls by outcome
//! - `address_parse_duration_seconds` (histogram): backend latency
//! - `address_auth_failures_total` (counter): rejected keys by reason
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "address_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("address_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_parse(outcome: &'static str, start: Instant) {
    ::metrics::counter!("address_parse_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("address_parse_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_auth_failure(reason: &'static str) {
    ::metrics::counter!("address_auth_failures_total", "reason" => reason).increment(1);
}
