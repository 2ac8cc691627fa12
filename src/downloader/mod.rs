//! Download orchestration
//!
//! The downloader drives the whole pipeline: plan the request windows, fetch
//! each window in order through the [`BinanceClient`], concatenate the rows
//! (window order defines chronological order), reshape them into a
//! [`KlineTable`], and write the CSV.
//!
//! Failed windows are soft: a window whose retries are exhausted is logged
//! and skipped so the remaining windows still download. Only a download that
//! yields no rows at all is an error ([`DownloadError::NoData`]).

use indicatif::ProgressBar;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

pub mod config;
pub mod job;

pub use config::DownloadConfig;
pub use job::DownloadJob;

use crate::fetcher::{BinanceClient, FetcherError, HttpTransport, ReqwestTransport};
use crate::output::{self, KlineTable, OutputError};
use crate::window::{self, WindowError};

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Date parsing or window planning failed (pre-network)
    #[error("window error: {0}")]
    WindowError(#[from] WindowError),

    /// Fetcher construction failed (bad proxy, TLS setup)
    #[error("fetcher error: {0}")]
    FetcherError(#[from] FetcherError),

    /// Output reshaping or writing failed
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),

    /// Every window came back empty or failed
    #[error("no kline data returned for the requested range")]
    NoData,
}

/// Download orchestrator.
pub struct Downloader {
    client: BinanceClient,
    config: DownloadConfig,
}

impl Downloader {
    /// Create a downloader with a reqwest-backed transport built from the
    /// configuration (base URL, timeout, proxies).
    ///
    /// # Errors
    /// Returns [`DownloadError::FetcherError`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: DownloadConfig) -> Result<Self, DownloadError> {
        let transport = ReqwestTransport::new(
            config.base_url.clone(),
            config.timeout,
            config.http_proxy.as_deref(),
            config.https_proxy.as_deref(),
        )?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a downloader over an explicit transport (test injection seam).
    pub fn with_transport(config: DownloadConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let client = BinanceClient::new(transport, config.retry_attempts, config.retry_backoff);
        Self { client, config }
    }

    /// Access the underlying API client (symbol discovery).
    pub fn client(&self) -> &BinanceClient {
        &self.client
    }

    /// Download the job's full kline history and write it to disk.
    ///
    /// Windows are fetched strictly sequentially, one request in flight at a
    /// time; the optional inter-request delay is applied between windows.
    ///
    /// # Returns
    /// The path the CSV was written to.
    ///
    /// # Errors
    /// Fails before any network call on an unsupported range or bad date;
    /// fails after fetching if no window produced data or the output cannot
    /// be written.
    pub async fn download(&self, job: &DownloadJob) -> Result<PathBuf, DownloadError> {
        let windows = window::plan_windows(
            &job.start,
            job.end.as_deref(),
            job.interval,
            self.config.request_limit,
        )?;
        info!(
            "downloading {} at {} in {} window(s)",
            job.symbol,
            job.interval,
            windows.len()
        );

        let api_symbol = job.api_symbol();
        let progress = ProgressBar::new(windows.len() as u64);
        let mut klines = Vec::new();

        for (idx, w) in windows.iter().enumerate() {
            match self
                .client
                .fetch_klines(&api_symbol, job.interval, Some(w), self.config.request_limit)
                .await
            {
                Ok(rows) => {
                    if rows.is_empty() {
                        debug!("window {}..{} returned no candles", w.start, w.end);
                    } else {
                        klines.extend(rows);
                    }
                }
                Err(e) => {
                    warn!("window {}..{} skipped after retries: {e}", w.start, w.end);
                }
            }
            progress.inc(1);

            if let Some(delay) = job.req_interval {
                if delay > 0.0 && idx + 1 < windows.len() {
                    sleep(Duration::from_secs_f64(delay)).await;
                }
            }
        }
        progress.finish_and_clear();

        if klines.is_empty() {
            return Err(DownloadError::NoData);
        }

        let table = KlineTable::from_raw(&klines);
        let path = match &job.output {
            Some(explicit) => explicit.clone(),
            None => {
                let (real_start, real_end) = table.real_range()?;
                PathBuf::from(output::default_filename(
                    &job.symbol,
                    job.interval,
                    &real_start,
                    &real_end,
                ))
            }
        };

        table.write_csv(&path, job.dimension)?;
        info!("download complete: {} rows -> {}", table.len(), path.display());
        Ok(path)
    }
}
