use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

use address_normalizer::address::{normalize, AddressResponse};

#[derive(Parser)]
#[command(name = "address-cli")]
#[command(about = "Client for the address normalization service", long_about = None)]
struct Cli {
    #[arg(short, long, env = "ADDRESS_NORMALIZER_URL", default_value = "http://localhost:8000")]
    url: String,

    #[arg(short, long, env = "ADDRESS_NORMALIZER_API_KEY")]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an address through the running service
    Parse { address: String },
    /// Show the normalized form of an address, locally
    Normalize { address: String },
    /// Check service liveness and loaded model
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Parse { address } => {
            let mut headers = HeaderMap::new();
            if let Some(key) = &cli.key {
                headers.insert("x-api-key", HeaderValue::from_str(key)?);
            }
            let res = client
                .post(format!("{}/parse-address/", cli.url))
                .headers(headers)
                .json(&json!({ "address": address }))
                .send()
                .await?;

            let status = res.status();
            if !status.is_success() {
                print_error(status, res).await;
                return Ok(());
            }
            // The service nests the fields as a JSON string; unwrap it for display.
            let body: AddressResponse = res.json().await?;
            let parsed = body.decode()?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Commands::Normalize { address } => {
            println!("{}", normalize(&address));
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            let status = res.status();
            if !status.is_success() {
                print_error(status, res).await;
                return Ok(());
            }
            let json: Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

async fn print_error(status: reqwest::StatusCode, res: reqwest::Response) {
    eprintln!("Error: service returned status {}", status);
    if let Ok(text) = res.text().await {
        eprintln!("Response: {}", text);
    }
}
