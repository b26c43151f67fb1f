//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the address and health handlers
//! - Wire up middleware (request ID, tracing, body limit, metrics)
//! - Serve on a bound listener until the shutdown signal fires
//!
//! # Design Decisions
//! - All request-independent state lives in one immutable [`ServiceContext`]
//!   built at startup and shared behind an `Arc`
//! - The listener is bound by the caller so tests can use port 0

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::address::CasingPolicy;
use crate::backend::{AddressParser, ParserPool};
use crate::config::{SecurityConfig, ServiceConfig};
use crate::http::handlers;
use crate::http::middleware::track_metrics;
use crate::http::overrides::OverrideTable;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::security::ApiKeyStore;

pub const PARSE_ADDRESS_ROUTE: &str = "/parse-address/";
pub const HEALTH_ROUTE: &str = "/health";

/// Everything a request needs, built once from validated config.
#[derive(Debug)]
pub struct ServiceContext {
    pub keys: ApiKeyStore,
    pub parser: ParserPool,
    pub casing: CasingPolicy,
    pub overrides: OverrideTable,
}

impl ServiceContext {
    pub fn new(config: &ServiceConfig, parser: Arc<dyn AddressParser>) -> Self {
        Self {
            keys: ApiKeyStore::new(config.api_keys.clone()),
            parser: ParserPool::new(parser, config.backend.max_concurrency),
            casing: CasingPolicy::from_config(&config.post_process),
            overrides: OverrideTable::from_config(&config.validation_overrides),
        }
    }
}

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub context: Arc<ServiceContext>,
}

/// HTTP server for the address service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(context: Arc<ServiceContext>, security: &SecurityConfig) -> Self {
        let state = AppState { context };
        let router = Self::build_router(security, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(security: &SecurityConfig, state: AppState) -> Router {
        Router::new()
            .route(PARSE_ADDRESS_ROUTE, post(handlers::parse_address))
            .route(HEALTH_ROUTE, get(handlers::health))
            .layer(DefaultBodyLimit::max(security.max_body_size))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |request: &axum::http::Request<axum::body::Body>| {
                            let request_id = request
                                .headers()
                                .get(X_REQUEST_ID)
                                .and_then(|v| v.to_str().ok())
                                .unwrap_or("unknown");
                            tracing::info_span!(
                                "request",
                                method = %request.method(),
                                path = %request.uri().path(),
                                request_id = %request_id,
                            )
                        },
                    ))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
