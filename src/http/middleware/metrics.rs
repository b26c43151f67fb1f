//! Request metrics middleware.
//! Records count and latency per route template and status.

use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::IntoResponse;

use crate::observability::metrics;

pub async fn track_metrics(req: Request<Body>, next: Next) -> impl IntoResponse {
    let start = Instant::now();
    // Template, not raw path, to keep label cardinality bounded.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;
    let status = response.status().as_u16();

    metrics::record_request(&route, status, start);
    tracing::debug!(route = %route, status, elapsed_ms = start.elapsed().as_millis() as u64, "Request completed");

    response
}
