//! Per-request error taxonomy and its HTTP rendering.
//!
//! Every failure inside a request ends up as an [`ApiError`]; its
//! `IntoResponse` impl is the only place that picks status codes and bodies.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::backend::ParseFailure;
use crate::security::AuthError;

const MISSING: &str = "missing";

/// One problem found while validating a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Path to the offending element, e.g. `["body", "address"]`.
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldIssue {
    pub fn new<'a>(
        loc: impl IntoIterator<Item = &'a str>,
        msg: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            loc: loc.into_iter().map(str::to_string).collect(),
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    pub fn missing<'a>(loc: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(loc, "Field required", MISSING)
    }

    pub fn is_missing(&self) -> bool {
        self.kind == MISSING
    }
}

/// Rendered as `{"detail": [...], "body": <original body>}` with status 422.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("request validation failed with {} issue(s)", .detail.len())]
pub struct ValidationError {
    pub detail: Vec<FieldIssue>,
    pub body: Value,
}

impl ValidationError {
    pub fn new(detail: Vec<FieldIssue>, body: Value) -> Self {
        Self { detail, body }
    }

    /// Whether the element at exactly `loc` was reported missing.
    pub fn is_missing_at(&self, loc: &[String]) -> bool {
        self.detail.iter().any(|issue| issue.is_missing() && issue.loc == loc)
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown API key (401).
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// Malformed request (422).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Validation failure answered with a configured response.
    #[error("validation failure mapped to status {status}")]
    Override { status: StatusCode, body: Value },

    /// Backend could not produce a result (500).
    #[error(transparent)]
    Parse(#[from] ParseFailure),

    /// Body could not be read, e.g. over the size limit.
    #[error(transparent)]
    Body(#[from] BytesRejection),

    /// Unexpected server-side failure (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Invalid API key" })),
            )
                .into_response(),
            ApiError::Validation(err) => {
                tracing::info!(issues = err.detail.len(), "Request validation failed");
                (StatusCode::UNPROCESSABLE_ENTITY, Json(err)).into_response()
            }
            ApiError::Override { status, body } => (status, Json(body)).into_response(),
            ApiError::Parse(err) => {
                tracing::error!(error = %err, "Address parsing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Address parsing failed" })),
                )
                    .into_response()
            }
            ApiError::Body(rejection) => {
                tracing::info!(error = %rejection, "Request body rejected");
                rejection.into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
