//! # salesdash
//!
//! HTTP query service over retail sales transactions.
//!
//! ```bash
//! # Serve an in-memory store seeded from a CSV export (see the config docs)
//! salesdash --config salesdash.yaml serve --port 5000
//!
//! # Load an export into MongoDB
//! MONGO_URI=mongodb://localhost:27017 salesdash import sales.csv
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // SALESDASH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SALESDASH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "salesdash=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
