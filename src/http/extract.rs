//! Request extractors for the address endpoint.
//!
//! # Responsibilities
//! - Authenticate the `X-API-Key` header before the body is touched
//! - Validate the JSON body into a [`RawAddressRequest`]
//! - Route validation failures through the override table
//!
//! # Design Decisions
//! - Axum runs parts extractors before the body extractor, so a bad key
//!   is rejected without reading or parsing the body
//! - Body validation reports the field path and reason, never a bare 400

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, MatchedPath, Request};
use axum::http::request::Parts;
use axum::http::{Extensions, Uri};
use serde_json::Value;

use crate::address::types::RawAddressRequest;
use crate::http::error::{ApiError, FieldIssue, ValidationError};
use crate::http::server::AppState;
use crate::security::{ApiKeyPrincipal, X_API_KEY};

/// Route template of the request, falling back to the raw path.
fn route_of(extensions: &Extensions, uri: &Uri) -> String {
    extensions
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

impl FromRequestParts<AppState> for ApiKeyPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // A non UTF-8 value can never equal a configured key.
        let provided = parts
            .headers
            .get(X_API_KEY)
            .map(|value| value.to_str().unwrap_or_default());

        match state.context.keys.authenticate(provided) {
            Ok(principal) => Ok(principal),
            Err(_) if provided.is_none() => {
                let error = ValidationError::new(
                    vec![FieldIssue::missing(["header", X_API_KEY])],
                    Value::Null,
                );
                Err(state
                    .context
                    .overrides
                    .resolve(&route_of(&parts.extensions, &parts.uri), error))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// JSON body validated into a [`RawAddressRequest`].
#[derive(Debug, Clone)]
pub struct ValidatedAddress(pub RawAddressRequest);

impl FromRequest<AppState> for ValidatedAddress {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let route = route_of(req.extensions(), req.uri());
        let bytes = Bytes::from_request(req, state).await?;
        validate_address_body(&bytes)
            .map(ValidatedAddress)
            .map_err(|error| state.context.overrides.resolve(&route, error))
    }
}

/// Check that `bytes` is a JSON object with a non-empty string `address`.
pub fn validate_address_body(bytes: &[u8]) -> Result<RawAddressRequest, ValidationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::new(vec![FieldIssue::missing(["body"])], Value::Null));
    }

    let value: Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            let issue = FieldIssue::new(["body"], format!("JSON decode error: {e}"), "json_invalid");
            let raw = Value::String(String::from_utf8_lossy(bytes).into_owned());
            return Err(ValidationError::new(vec![issue], raw));
        }
    };

    let issue = match &value {
        Value::Object(map) => match map.get("address") {
            Some(Value::String(address)) if !address.is_empty() => {
                return Ok(RawAddressRequest {
                    address: address.clone(),
                });
            }
            Some(Value::String(_)) => FieldIssue::new(
                ["body", "address"],
                "String should have at least 1 character",
                "string_too_short",
            ),
            Some(_) => FieldIssue::new(["body", "address"], "Input should be a valid string", "string_type"),
            None => FieldIssue::missing(["body", "address"]),
        },
        _ => FieldIssue::new(
            ["body"],
            "Input should be a valid dictionary or object",
            "model_attributes_type",
        ),
    };

    Err(ValidationError::new(vec![issue], value))
}
