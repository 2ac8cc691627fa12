//! Kline table reshaping and CSV writing
//!
//! Converts accumulated [`RawKline`] rows into the cleaned tabular form:
//! NaN values become zero, the close_time column is dropped, open_time is
//! rendered as a calendar datetime, and trade_cnt is converted to an integer
//! on a best-effort basis (a value that is not integer-representable is left
//! as-is and logged at debug level rather than failing the download).

use chrono::DateTime;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use super::{OutputError, OutputResult};
use crate::RawKline;

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column selection for the written table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimension {
    /// open_time, open, high, low, close, volume
    #[default]
    Ohlcv,
    /// All columns except close_time
    Full,
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ohlcv" => Ok(Dimension::Ohlcv),
            "full" => Ok(Dimension::Full),
            _ => Err(format!("invalid dimension: {s} (expected ohlcv or full)")),
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Ohlcv => write!(f, "ohlcv"),
            Dimension::Full => write!(f, "full"),
        }
    }
}

/// One cleaned row; close_time is already dropped and NaN replaced by zero.
#[derive(Debug, Clone)]
struct Row {
    open_time_ms: f64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    value: f64,
    trade_cnt: f64,
    active_buy_volume: f64,
    active_buy_value: f64,
}

/// CSV record with the full column set
#[derive(Debug, Serialize)]
struct FullRecord {
    open_time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    value: f64,
    trade_cnt: String,
    active_buy_volume: f64,
    active_buy_value: f64,
}

/// CSV record narrowed to open_time + OHLCV
#[derive(Debug, Serialize)]
struct OhlcvRecord {
    open_time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Cleaned, chronologically ordered kline table.
pub struct KlineTable {
    rows: Vec<Row>,
}

impl KlineTable {
    /// Build the table from raw rows, preserving their order.
    pub fn from_raw(raw: &[RawKline]) -> Self {
        let rows = raw
            .iter()
            .map(|k| Row {
                open_time_ms: zero_if_nan(k.open_time),
                open: zero_if_nan(k.open),
                high: zero_if_nan(k.high),
                low: zero_if_nan(k.low),
                close: zero_if_nan(k.close),
                volume: zero_if_nan(k.volume),
                value: zero_if_nan(k.value),
                trade_cnt: zero_if_nan(k.trade_cnt),
                active_buy_volume: zero_if_nan(k.active_buy_volume),
                active_buy_value: zero_if_nan(k.active_buy_value),
            })
            .collect();
        Self { rows }
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Actual covered date range, `(YYYY-MM-DD, YYYY-MM-DD)`, derived from
    /// the first and last row's open_time.
    ///
    /// # Errors
    /// Returns [`OutputError::EmptyTable`] on an empty table and
    /// [`OutputError::InvalidTimestamp`] if a boundary open_time cannot be
    /// represented as a datetime.
    pub fn real_range(&self) -> OutputResult<(String, String)> {
        let first = self.rows.first().ok_or(OutputError::EmptyTable)?;
        let last = self.rows.last().ok_or(OutputError::EmptyTable)?;
        Ok((
            format_date(first.open_time_ms)?,
            format_date(last.open_time_ms)?,
        ))
    }

    /// Write the table as CSV to `path`, creating parent directories as
    /// needed. The header row matches the selected dimension.
    ///
    /// # Errors
    /// Filesystem and CSV errors are fatal and propagate to the caller.
    pub fn write_csv(&self, path: &Path, dimension: Dimension) -> OutputResult<()> {
        info!(
            "writing {} rows ({dimension}) to {}",
            self.rows.len(),
            path.display()
        );

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    OutputError::IoError(format!("failed to create directory: {e}"))
                })?;
            }
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("failed to create file: {e}")))?;
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut writer = Writer::from_writer(buf_writer);

        for row in &self.rows {
            let open_time = format_open_time(row.open_time_ms);
            match dimension {
                Dimension::Ohlcv => writer
                    .serialize(OhlcvRecord {
                        open_time,
                        open: row.open,
                        high: row.high,
                        low: row.low,
                        close: row.close,
                        volume: row.volume,
                    })
                    .map_err(|e| OutputError::CsvError(format!("failed to write row: {e}")))?,
                Dimension::Full => writer
                    .serialize(FullRecord {
                        open_time,
                        open: row.open,
                        high: row.high,
                        low: row.low,
                        close: row.close,
                        volume: row.volume,
                        value: row.value,
                        trade_cnt: format_count(row.trade_cnt),
                        active_buy_volume: row.active_buy_volume,
                        active_buy_value: row.active_buy_value,
                    })
                    .map_err(|e| OutputError::CsvError(format!("failed to write row: {e}")))?,
            }
        }

        writer
            .flush()
            .map_err(|e| OutputError::IoError(format!("failed to flush: {e}")))?;
        let buf_writer = writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("failed to get inner writer: {e}")))?;
        let file = buf_writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("failed to get file handle: {e}")))?;
        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("failed to sync file: {e}")))?;

        info!("CSV written: {} rows", self.rows.len());
        Ok(())
    }
}

fn zero_if_nan(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

fn as_exact_i64(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// Render an epoch-millisecond open_time as a calendar datetime.
///
/// Best-effort: a value that is not integer-representable or outside the
/// datetime range stays as the raw number.
fn format_open_time(ms: f64) -> String {
    if let Some(exact) = as_exact_i64(ms) {
        if let Some(dt) = DateTime::from_timestamp_millis(exact) {
            return dt.format(DATETIME_FORMAT).to_string();
        }
    }
    debug!("open_time {ms} left unconverted");
    format!("{ms}")
}

/// Render a trade count as an integer when exactly representable.
fn format_count(count: f64) -> String {
    match as_exact_i64(count) {
        Some(exact) => exact.to_string(),
        None => {
            debug!("trade_cnt {count} left unconverted");
            format!("{count}")
        }
    }
}

fn format_date(ms: f64) -> OutputResult<String> {
    let exact = as_exact_i64(ms).ok_or(OutputError::InvalidTimestamp(ms))?;
    let dt = DateTime::from_timestamp_millis(exact).ok_or(OutputError::InvalidTimestamp(ms))?;
    Ok(dt.format(DATE_FORMAT).to_string())
}
