//! Route handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::address::{normalize, AddressResponse};
use crate::http::error::ApiError;
use crate::http::extract::ValidatedAddress;
use crate::http::server::AppState;
use crate::security::ApiKeyPrincipal;

/// `POST /parse-address/`
///
/// Authenticates, normalizes, parses, applies casing and returns the
/// parsed fields as a JSON string inside `{"address": ...}`.
pub async fn parse_address(
    State(state): State<AppState>,
    _principal: ApiKeyPrincipal,
    ValidatedAddress(request): ValidatedAddress,
) -> Result<Json<AddressResponse>, ApiError> {
    let context = &state.context;
    let normalized = normalize(&request.address);
    tracing::debug!(input_len = request.address.len(), normalized_len = normalized.len(), "Address normalized");

    let parsed = context.parser.parse(normalized).await?;
    let parsed = context.casing.apply(parsed);

    let response = AddressResponse::encode(&parsed).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub version: &'static str,
}

/// `GET /health`, unauthenticated liveness probe.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.context.parser.model().to_string(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
