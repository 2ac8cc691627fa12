//! Download configuration
//!
//! All knobs that used to be process-wide constants in ad-hoc downloaders
//! live in an explicit [`DownloadConfig`] passed to each component at
//! construction, so tests isolate behavior by injecting configuration
//! instead of patching globals.

use std::time::Duration;

/// Default API base URL (Binance spot)
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Maximum rows the klines endpoint returns per call
pub const REQUEST_LIMIT: usize = 1000;

/// Default number of kline request attempts before a window is given up
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Fixed pause between retry attempts
pub const RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`Downloader`](crate::downloader::Downloader).
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// API base URL
    pub base_url: String,
    /// Maximum rows per klines request
    pub request_limit: usize,
    /// Total kline request attempts per window
    pub retry_attempts: u32,
    /// Fixed pause between retry attempts
    pub retry_backoff: Duration,
    /// Per-request timeout
    pub timeout: Duration,
    /// Optional proxy URL for plain HTTP requests
    pub http_proxy: Option<String>,
    /// Optional proxy URL for HTTPS requests
    pub https_proxy: Option<String>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_limit: REQUEST_LIMIT,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_backoff: RETRY_BACKOFF,
            timeout: DEFAULT_TIMEOUT,
            http_proxy: None,
            https_proxy: None,
        }
    }
}

impl DownloadConfig {
    /// Set the same proxy URL for both HTTP and HTTPS traffic.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        let proxy = proxy.into();
        self.http_proxy = Some(proxy.clone());
        self.https_proxy = Some(proxy);
        self
    }
}
