//! Address normalization service.
//!
//! Accepts a free-form postal address over HTTP, normalizes it, tags its
//! components with the configured parser backend and returns the result.
//!
//! ```text
//!     POST /parse-address/
//!         │
//!         ▼
//!   ┌───────────┐   ┌────────────┐   ┌──────────┐   ┌────────┐   ┌──────────┐
//!   │ api key   │──▶│ body check │──▶│normalize │──▶│ parser │──▶│  casing  │──▶ JSON
//!   └───────────┘   └────────────┘   └──────────┘   └────────┘   └──────────┘
//!      security      http::extract      address       backend      address
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser)]
#[command(name = "address-normalizer")]
#[command(about = "HTTP service that normalizes and parses postal addresses", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "ADDRESS_NORMALIZER_CONFIG", default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match address_normalizer::lifecycle::run(&args.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.precedes_logging() => {
            eprintln!("address-normalizer: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal startup error");
            ExitCode::FAILURE
        }
    }
}
