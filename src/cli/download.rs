//! Download command implementation

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use super::CliError;
use crate::downloader::{DownloadConfig, DownloadJob, Downloader};
use crate::output::Dimension;
use crate::Interval;

/// Kline Downloader CLI
#[derive(Parser, Debug)]
#[command(name = "kline-downloader", version, about = "Download historical Binance kline data to CSV")]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download kline history for one trading pair
    Download(DownloadArgs),
    /// List currently tradable pairs
    Symbols(super::SymbolsArgs),
}

/// Arguments for the download command
#[derive(Parser, Debug)]
pub struct DownloadArgs {
    /// Trading pair, BASE/QUOTE (e.g., BTC/USDT)
    pub symbol: String,

    /// Kline granularity (1m, 3m, 5m, 15m, 30m, 1h, 2h, 4h, 6h, 8h, 12h, 1d, 3d, 1w, 1M)
    #[arg(short, long)]
    pub interval: Interval,

    /// Start date, YYYY-MM-DD (inclusive)
    #[arg(short, long)]
    pub start: String,

    /// End date, YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Output CSV path (defaults to a generated filename in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pause between window requests, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub req_interval: Option<f64>,

    /// Columns to write: ohlcv or full
    #[arg(long, default_value = "ohlcv")]
    pub dimension: Dimension,

    /// Kline request attempts per window before giving up
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Proxy URL for outbound HTTP and HTTPS requests
    #[arg(long)]
    pub proxy: Option<String>,
}

impl DownloadArgs {
    /// Execute the download command.
    pub async fn execute(&self) -> Result<(), CliError> {
        let mut config = DownloadConfig {
            retry_attempts: self.retries,
            timeout: Duration::from_secs(self.timeout),
            ..DownloadConfig::default()
        };
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(proxy.clone());
        }

        let mut job = DownloadJob::new(self.symbol.clone(), self.interval, self.start.clone())
            .with_dimension(self.dimension);
        if let Some(end) = &self.end {
            job = job.with_end(end.clone());
        }
        if let Some(output) = &self.output {
            job = job.with_output(output.clone());
        }
        if let Some(delay) = &self.req_interval {
            if *delay < 0.0 {
                return Err(CliError::InvalidArgument(format!(
                    "req-interval must be non-negative, got {delay}"
                )));
            }
            job = job.with_req_interval(*delay);
        }

        let downloader = Downloader::new(config)?;
        let path = downloader.download(&job).await?;
        info!("wrote {}", path.display());
        println!("{}", path.display());
        Ok(())
    }
}
