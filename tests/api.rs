//! End-to-end tests for the HTTP surface.

use std::sync::Arc;

use address_normalizer::address::{AddressField, AddressResponse, ParsedAddress};
use address_normalizer::backend::{HeuristicParser, ParseFailure};
use address_normalizer::config::ValidationOverride;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

use common::{app, app_with, test_config, FakeParser, API_KEY};

fn parse_request(key: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/parse-address/")
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(body.into()).unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// -- Success path -------------------------------------------------------------

#[tokio::test]
async fn test_parse_address_end_to_end() {
    let parser = FakeParser::returning(common::main_st_quebec());
    let response = app(parser.clone())
        .oneshot(parse_request(Some(API_KEY), r#"{"address": "123  Main St,, Quebec"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parser.calls(), 1);
    assert_eq!(parser.last_input().as_deref(), Some("123 main st quebec"));

    let body: AddressResponse = serde_json::from_value(body_json(response).await).unwrap();
    let parsed = body.decode().unwrap();
    assert_eq!(parsed.street_name.as_deref(), Some("Main St"));
    assert_eq!(parsed.municipality.as_deref(), Some("Quebec"));
    assert_eq!(parsed.province.as_deref(), Some("QC"));
    assert_eq!(parsed.street_number, None);
}

#[tokio::test]
async fn test_response_address_is_json_string_with_nulls() {
    let parser = FakeParser::returning(ParsedAddress::default().with(AddressField::PostalCode, "h2x 1y4"));
    let response = app(parser)
        .oneshot(parse_request(Some(API_KEY), r#"{"address": "h2x 1y4"}"#))
        .await
        .unwrap();

    let body = body_json(response).await;
    let inner: Value = serde_json::from_str(body["address"].as_str().unwrap()).unwrap();
    assert_eq!(inner["PostalCode"], json!("h2x 1y4"));
    assert_eq!(inner["StreetNumber"], Value::Null);
    assert_eq!(inner.as_object().unwrap().len(), 8);
}

#[tokio::test]
async fn test_heuristic_backend_through_http() {
    let response = app(Arc::new(HeuristicParser::new()))
        .oneshot(parse_request(
            Some(API_KEY),
            r#"{"address": "350 rue des Érables, Montréal, QC H2X 1Y4"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: AddressResponse = serde_json::from_value(body_json(response).await).unwrap();
    let parsed = body.decode().unwrap();
    assert_eq!(parsed.street_number.as_deref(), Some("350"));
    assert_eq!(parsed.province.as_deref(), Some("QC"));
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn test_wrong_key_is_rejected_before_parsing() {
    let parser = FakeParser::returning(common::main_st_quebec());
    let response = app(parser.clone())
        .oneshot(parse_request(Some("wrong"), r#"{"address": "123 Main St"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "detail": "Invalid API key" }));
    assert_eq!(parser.calls(), 0);
}

#[tokio::test]
async fn test_wrong_key_wins_over_invalid_body() {
    let parser = FakeParser::returning(common::main_st_quebec());
    let response = app(parser.clone())
        .oneshot(parse_request(Some("wrong"), "{not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(parser.calls(), 0);
}

#[tokio::test]
async fn test_missing_key_uses_override() {
    let parser = FakeParser::returning(common::main_st_quebec());
    let response = app(parser.clone())
        .oneshot(parse_request(None, r#"{"address": "123 Main St"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "401": "Unauthorized" }));
    assert_eq!(parser.calls(), 0);
}

#[tokio::test]
async fn test_missing_key_without_override_is_422() {
    let mut config = test_config();
    config.validation_overrides.clear();
    let response = app_with(&config, FakeParser::returning(ParsedAddress::default()))
        .oneshot(parse_request(None, r#"{"address": "123 Main St"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["detail"][0]["loc"], json!(["header", "x-api-key"]));
    assert_eq!(body["detail"][0]["type"], json!("missing"));
}

// -- Validation ---------------------------------------------------------------

#[tokio::test]
async fn test_missing_address_field() {
    let parser = FakeParser::returning(ParsedAddress::default());
    let response = app(parser.clone())
        .oneshot(parse_request(Some(API_KEY), r#"{"street": "Main"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["detail"][0]["loc"], json!(["body", "address"]));
    assert_eq!(body["body"], json!({ "street": "Main" }));
    assert_eq!(parser.calls(), 0);
}

#[tokio::test]
async fn test_non_string_address() {
    let response = app(FakeParser::returning(ParsedAddress::default()))
        .oneshot(parse_request(Some(API_KEY), r#"{"address": 42}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["detail"][0]["type"], json!("string_type"));
}

#[tokio::test]
async fn test_address_override_applies_only_when_missing() {
    let mut config = test_config();
    config.validation_overrides.push(ValidationOverride {
        route: "/parse-address/".into(),
        location: vec!["body".into(), "address".into()],
        status: StatusCode::BAD_REQUEST,
        body: json!({ "error": "address required" }),
    });

    let wrong_type = app_with(&config, FakeParser::returning(ParsedAddress::default()))
        .oneshot(parse_request(Some(API_KEY), r#"{"address": 42}"#))
        .await
        .unwrap();
    assert_eq!(wrong_type.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(wrong_type).await;
    assert_eq!(body["detail"][0]["type"], json!("string_type"));

    let absent = app_with(&config, FakeParser::returning(ParsedAddress::default()))
        .oneshot(parse_request(Some(API_KEY), r#"{"street": "Main"}"#))
        .await
        .unwrap();
    assert_eq!(absent.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(absent).await, json!({ "error": "address required" }));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = test_config();
    config.security.max_body_size = 32;
    let parser = FakeParser::returning(ParsedAddress::default());
    let payload = json!({ "address": "x".repeat(256) }).to_string();
    let response = app_with(&config, parser.clone())
        .oneshot(parse_request(Some(API_KEY), payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(parser.calls(), 0);
}

// -- Backend failures ---------------------------------------------------------

#[tokio::test]
async fn test_parse_failure_is_500() {
    let parser = FakeParser::failing(ParseFailure::Unrecognized("no tokens".into()));
    let response = app(parser.clone())
        .oneshot(parse_request(Some(API_KEY), r#"{"address": "???"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({ "detail": "Address parsing failed" }));
    assert_eq!(parser.calls(), 1);
}

// -- Health and request IDs ---------------------------------------------------

#[tokio::test]
async fn test_health_needs_no_key() {
    let response = app(FakeParser::returning(ParsedAddress::default()))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["model"], json!("fake"));
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let generated = app(FakeParser::returning(ParsedAddress::default()))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(generated.headers().contains_key("x-request-id"));

    let echoed = app(FakeParser::returning(ParsedAddress::default()))
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(echoed.headers()["x-request-id"], "abc-123");
}

// -- Real listener ------------------------------------------------------------

#[tokio::test]
async fn test_served_over_tcp() {
    let parser = FakeParser::returning(common::main_st_quebec());
    let (addr, shutdown) = common::spawn_server(parser.clone()).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{addr}/parse-address/"))
        .header("x-api-key", API_KEY)
        .json(&json!({ "address": "123 Main St, Quebec" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: AddressResponse = res.json().await.unwrap();
    assert_eq!(body.decode().unwrap().province.as_deref(), Some("QC"));
    assert_eq!(parser.calls(), 1);

    shutdown.trigger();
}
