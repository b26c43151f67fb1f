//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use address_normalizer::address::{AddressField, ParsedAddress};
use address_normalizer::backend::{AddressParser, ParseFailure};
use address_normalizer::config::ServiceConfig;
use address_normalizer::http::{HttpServer, ServiceContext};
use address_normalizer::lifecycle::Shutdown;
use axum::Router;
use tokio::net::TcpListener;

pub const API_KEY: &str = "my_api_key";

/// Parser double that returns a fixed result and counts calls.
pub struct FakeParser {
    result: Result<ParsedAddress, ParseFailure>,
    calls: AtomicUsize,
    last_input: std::sync::Mutex<Option<String>>,
}

#[allow(dead_code)]
impl FakeParser {
    pub fn returning(parsed: ParsedAddress) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(parsed),
            calls: AtomicUsize::new(0),
            last_input: std::sync::Mutex::new(None),
        })
    }

    pub fn failing(failure: ParseFailure) -> Arc<Self> {
        Arc::new(Self {
            result: Err(failure),
            calls: AtomicUsize::new(0),
            last_input: std::sync::Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().unwrap().clone()
    }
}

impl AddressParser for FakeParser {
    fn model(&self) -> &str {
        "fake"
    }

    fn parse(&self, normalized: &str) -> Result<ParsedAddress, ParseFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some(normalized.to_string());
        self.result.clone()
    }
}

/// Backend output for "123 main st quebec".
#[allow(dead_code)]
pub fn main_st_quebec() -> ParsedAddress {
    ParsedAddress::default()
        .with(AddressField::StreetName, "Main St")
        .with(AddressField::Municipality, "Quebec")
        .with(AddressField::Province, "qc")
}

pub fn test_config() -> ServiceConfig {
    ServiceConfig::new([API_KEY], "fake")
}

/// Fully layered router backed by `parser`.
pub fn app_with(config: &ServiceConfig, parser: Arc<dyn AddressParser>) -> Router {
    let context = Arc::new(ServiceContext::new(config, parser));
    HttpServer::new(context, &config.security).router()
}

#[allow(dead_code)]
pub fn app(parser: Arc<dyn AddressParser>) -> Router {
    app_with(&test_config(), parser)
}

/// Serve `parser` on an ephemeral port; drop the returned [`Shutdown`] or
/// trigger it to stop the server.
#[allow(dead_code)]
pub async fn spawn_server(parser: Arc<dyn AddressParser>) -> (SocketAddr, Shutdown) {
    let config = test_config();
    let context = Arc::new(ServiceContext::new(&config, parser));
    let server = HttpServer::new(context, &config.security);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });
    (addr, shutdown)
}
