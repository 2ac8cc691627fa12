//! Main entry point for the kline-downloader CLI

use clap::Parser;
use kline_downloader::cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber with optional JSON formatting
fn init_tracing() {
    // Check if JSON output is requested via environment variable
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kline_downloader=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: anyhow::Result<()> = match cli.command {
        Commands::Download(ref args) => args.execute().await.map_err(Into::into),
        Commands::Symbols(ref args) => args.execute().await.map_err(Into::into),
    };

    if let Err(e) = result {
        error!("{e:#}");
        std::process::exit(1);
    }
}
