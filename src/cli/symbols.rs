//! Symbols command implementation

use clap::Parser;
use std::time::Duration;

use super::CliError;
use crate::downloader::{DownloadConfig, Downloader};

/// Arguments for the symbols command
#[derive(Parser, Debug)]
pub struct SymbolsArgs {
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Proxy URL for outbound HTTP and HTTPS requests
    #[arg(long)]
    pub proxy: Option<String>,
}

impl SymbolsArgs {
    /// Execute the symbols command, printing one "BASE/QUOTE" pair per line.
    ///
    /// A network failure prints nothing; the listing is a soft operation and
    /// never exits with an error for transport problems.
    pub async fn execute(&self) -> Result<(), CliError> {
        let mut config = DownloadConfig {
            timeout: Duration::from_secs(self.timeout),
            ..DownloadConfig::default()
        };
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(proxy.clone());
        }

        let downloader = Downloader::new(config)?;
        for symbol in downloader.client().list_symbols().await {
            println!("{symbol}");
        }
        Ok(())
    }
}
