//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging, then metrics, then the parser backend
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and reported once by `main`
//! - Subsystems initialize in order, not concurrently
//! - The listener binds last, so traffic only arrives once the model is ready

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::backend::{build_parser, BackendError, Device, InvalidDevice};
use crate::config::{load_config, ConfigError, ServiceConfig};
use crate::http::{HttpServer, ServiceContext};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::observability::{logging, metrics};

/// Fatal errors that prevent the service from starting or keep it from running.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialize logging: {0}")]
    Logging(#[from] logging::TryInitError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(String),

    #[error(transparent)]
    Device(#[from] InvalidDevice),

    #[error("failed to load parser backend: {0}")]
    Backend(#[from] BackendError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl StartupError {
    /// Raised before the subscriber was installed, so only stderr can report it.
    pub fn precedes_logging(&self) -> bool {
        matches!(self, StartupError::Config(_) | StartupError::Logging(_))
    }
}

/// Build the request context: device, backend, key store, policies.
pub fn build_context(config: &ServiceConfig) -> Result<Arc<ServiceContext>, StartupError> {
    let device: Device = config.device.parse()?;
    let parser = build_parser(&config.model, device)?;
    tracing::info!(model = %config.model, device = %device, "Parser backend loaded");

    let context = ServiceContext::new(config, parser);
    tracing::info!(
        api_keys = context.keys.len(),
        overrides = context.overrides.len(),
        max_concurrency = ?context.parser.max_concurrency(),
        "Service context ready"
    );
    Ok(Arc::new(context))
}

/// Bind the configured listener address.
pub async fn bind(address: &str) -> Result<TcpListener, StartupError> {
    TcpListener::bind(address).await.map_err(|source| StartupError::Bind {
        address: address.to_string(),
        source,
    })
}

fn start_metrics(config: &ServiceConfig) -> Result<(), StartupError> {
    if !config.observability.metrics_enabled {
        return Ok(());
    }
    let addr: SocketAddr = config
        .observability
        .metrics_address
        .parse()
        .map_err(|e| StartupError::Metrics(format!("invalid address: {e}")))?;
    metrics::init_metrics(addr).map_err(|e| StartupError::Metrics(e.to_string()))
}

/// Load config from `path`, bring up every subsystem and serve until a
/// termination signal arrives.
pub async fn run(path: &Path) -> Result<(), StartupError> {
    let config = load_config(path)?;
    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %path.display(),
        bind_address = %config.listener.bind_address,
        "address-normalizer starting"
    );

    start_metrics(&config)?;
    let context = build_context(&config)?;

    let shutdown = Arc::new(Shutdown::new());
    let server = HttpServer::new(context, &config.security);
    let listener = bind(&config.listener.bind_address).await?;
    let stopped = shutdown.subscribe();
    spawn_signal_handler(Arc::clone(&shutdown));

    server.run(listener, stopped).await.map_err(StartupError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
