//! Download job specification

use std::path::PathBuf;

use crate::output::Dimension;
use crate::Interval;

/// Everything needed to download one symbol's history.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    /// Trading pair, "BASE/QUOTE" (e.g., "BTC/USDT")
    pub symbol: String,
    /// Kline granularity
    pub interval: Interval,
    /// Start date, `YYYY-MM-DD`, inclusive
    pub start: String,
    /// Optional end date, `YYYY-MM-DD`; defaults to now
    pub end: Option<String>,
    /// Explicit output path; when absent a filename is generated from the
    /// covered date range and written to the current directory
    pub output: Option<PathBuf>,
    /// Optional pause in seconds between window requests (rate limiting,
    /// independent of retry backoff)
    pub req_interval: Option<f64>,
    /// Column selection for the written table
    pub dimension: Dimension,
}

impl DownloadJob {
    /// Create a job covering `start` to now with the default (OHLCV) columns.
    pub fn new(symbol: impl Into<String>, interval: Interval, start: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            start: start.into(),
            end: None,
            output: None,
            req_interval: None,
            dimension: Dimension::default(),
        }
    }

    /// Set the end date (`YYYY-MM-DD`).
    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Set an explicit output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Set the pause between window requests, in seconds.
    pub fn with_req_interval(mut self, seconds: f64) -> Self {
        self.req_interval = Some(seconds);
        self
    }

    /// Set the column selection.
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = dimension;
        self
    }

    /// Symbol normalized for API requests (separator removed).
    pub fn api_symbol(&self) -> String {
        self.symbol.replace('/', "")
    }
}
