//! # Command line interface
//!
//! - `serve` - Start the HTTP server (the default when no command is given)
//! - `import` - Load a CSV export into the configured store

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use salesdash::config::AppConfig;
use salesdash::import::Importer;
use salesdash::server::ServerBuilder;
use salesdash::storage;
use std::path::{Path, PathBuf};

/// Sales dashboard query service
#[derive(Parser, Debug)]
#[command(name = "salesdash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, env = "SALESDASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Import transactions from a CSV export
    Import {
        /// Path to the CSV file
        file: PathBuf,

        /// Records per insert
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Append to the store instead of clearing it first
        #[arg(long)]
        keep_existing: bool,
    },
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Some(Commands::Serve { host, port }) => cmd_serve(config, host, port).await,
        None => cmd_serve(config, None, None).await,
        Some(Commands::Import {
            file,
            batch_size,
            keep_existing,
        }) => cmd_import(config, &file, batch_size, keep_existing).await,
    }
}

async fn cmd_serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let store = storage::connect(&config.store).await?;

    if let Some(seed) = config.store.seed_csv.clone() {
        tracing::info!(file = %seed.display(), "Seeding store");
        Importer::new(store.clone(), config.import)
            .import_path(&seed)
            .await?;
    }

    let addr = config.server.bind_address();
    ServerBuilder::new()
        .with_shared_store(store)
        .with_config(config)
        .serve(&addr)
        .await
}

async fn cmd_import(
    mut config: AppConfig,
    file: &Path,
    batch_size: Option<usize>,
    keep_existing: bool,
) -> Result<()> {
    if let Some(batch_size) = batch_size {
        config.import.batch_size = batch_size;
    }
    if keep_existing {
        config.import.clear_existing = false;
    }
    config.validate()?;

    let store = storage::connect(&config.store).await?;
    let total = Importer::new(store, config.import)
        .import_path(file)
        .await
        .with_context(|| format!("Import of '{}' failed", file.display()))?;

    println!("Imported {} records from {}", total, file.display());
    Ok(())
}
