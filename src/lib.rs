//! # Kline Downloader Library
//!
//! A library for downloading historical candlestick (OHLCV) data from the
//! Binance spot HTTP API and persisting it as flat CSV files. Designed for
//! data analysts who want a local copy of price history for a trading pair.
//!
//! ## Features
//!
//! - **Windowed Pagination**: Splits the requested date range into contiguous
//!   request windows bounded by the API's per-call row limit
//! - **Bounded Retry**: Fixed-backoff retry per request; a window that keeps
//!   failing is skipped rather than aborting the whole download
//! - **Symbol Discovery**: Lists currently tradable "BASE/QUOTE" pairs
//! - **Flexible Output**: Full field set or OHLCV-only, explicit output path
//!   or a generated filename derived from the covered date range
//!
//! ## Quick Start
//!
//! ```no_run
//! use kline_downloader::downloader::{DownloadConfig, Downloader, DownloadJob};
//! use kline_downloader::Interval;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let job = DownloadJob::new("BTC/USDT", Interval::FifteenMinutes, "2021-07-01")
//!     .with_end("2021-08-01");
//!
//! let downloader = Downloader::new(DownloadConfig::default())?;
//! let path = downloader.download(&job).await?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`window`] - Date parsing and time-window planning
//! - [`fetcher`] - HTTP transport, Binance client, and response parsing
//! - [`downloader`] - Download orchestration and configuration
//! - [`output`] - Table reshaping and CSV writing
//! - [`cli`] - CLI command implementations

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// CLI command implementations
pub mod cli;

/// Download orchestration
pub mod downloader;

/// Data fetching from the exchange
pub mod fetcher;

/// Table reshaping and CSV output
pub mod output;

/// Time-window planning
pub mod window;

// Re-export commonly used types
pub use window::TimeWindow;

/// Time interval for kline buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// 1 minute
    #[serde(rename = "1m")]
    OneMinute,
    /// 3 minutes
    #[serde(rename = "3m")]
    ThreeMinutes,
    /// 5 minutes
    #[serde(rename = "5m")]
    FiveMinutes,
    /// 15 minutes
    #[serde(rename = "15m")]
    FifteenMinutes,
    /// 30 minutes
    #[serde(rename = "30m")]
    ThirtyMinutes,
    /// 1 hour
    #[serde(rename = "1h")]
    OneHour,
    /// 2 hours
    #[serde(rename = "2h")]
    TwoHours,
    /// 4 hours
    #[serde(rename = "4h")]
    FourHours,
    /// 6 hours
    #[serde(rename = "6h")]
    SixHours,
    /// 8 hours
    #[serde(rename = "8h")]
    EightHours,
    /// 12 hours
    #[serde(rename = "12h")]
    TwelveHours,
    /// 1 day
    #[serde(rename = "1d")]
    OneDay,
    /// 3 days
    #[serde(rename = "3d")]
    ThreeDays,
    /// 1 week
    #[serde(rename = "1w")]
    OneWeek,
    /// 1 month
    #[serde(rename = "1M")]
    OneMonth,
}

impl Interval {
    /// Convert interval to seconds.
    ///
    /// The monthly interval uses a fixed 30-day duration since calendar
    /// months cannot be expressed as a constant number of seconds; window
    /// planning logs a warning whenever it relies on this approximation.
    pub fn as_secs(&self) -> i64 {
        match self {
            Interval::OneMinute => 60,
            Interval::ThreeMinutes => 180,
            Interval::FiveMinutes => 300,
            Interval::FifteenMinutes => 900,
            Interval::ThirtyMinutes => 1_800,
            Interval::OneHour => 3_600,
            Interval::TwoHours => 7_200,
            Interval::FourHours => 14_400,
            Interval::SixHours => 21_600,
            Interval::EightHours => 28_800,
            Interval::TwelveHours => 43_200,
            Interval::OneDay => 86_400,
            Interval::ThreeDays => 259_200,
            Interval::OneWeek => 604_800,
            Interval::OneMonth => 2_592_000, // Approximate: 30 days
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Interval::OneMinute => "1m",
            Interval::ThreeMinutes => "3m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::TwoHours => "2h",
            Interval::FourHours => "4h",
            Interval::SixHours => "6h",
            Interval::EightHours => "8h",
            Interval::TwelveHours => "12h",
            Interval::OneDay => "1d",
            Interval::ThreeDays => "3d",
            Interval::OneWeek => "1w",
            Interval::OneMonth => "1M",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Interval::OneMinute),
            "3m" => Ok(Interval::ThreeMinutes),
            "5m" => Ok(Interval::FiveMinutes),
            "15m" => Ok(Interval::FifteenMinutes),
            "30m" => Ok(Interval::ThirtyMinutes),
            "1h" => Ok(Interval::OneHour),
            "2h" => Ok(Interval::TwoHours),
            "4h" => Ok(Interval::FourHours),
            "6h" => Ok(Interval::SixHours),
            "8h" => Ok(Interval::EightHours),
            "12h" => Ok(Interval::TwelveHours),
            "1d" => Ok(Interval::OneDay),
            "3d" => Ok(Interval::ThreeDays),
            "1w" => Ok(Interval::OneWeek),
            "1M" => Ok(Interval::OneMonth),
            _ => Err(format!("unsupported interval: {s}")),
        }
    }
}

/// One raw kline row as returned by the exchange.
///
/// Prices and volumes are kept as floats throughout the pipeline; values the
/// API returned malformed are carried as NaN and substituted with zero during
/// tabulation. The 12th ("ignore") element of the wire format is dropped at
/// parse time and never reaches this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct RawKline {
    /// Open time (Unix timestamp in milliseconds)
    pub open_time: f64,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Volume (base asset)
    pub volume: f64,
    /// Close time (Unix timestamp in milliseconds)
    pub close_time: f64,
    /// Quote asset volume
    pub value: f64,
    /// Number of trades
    pub trade_cnt: f64,
    /// Taker buy base asset volume
    pub active_buy_volume: f64,
    /// Taker buy quote asset volume
    pub active_buy_value: f64,
}
