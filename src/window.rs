//! Time-window planning for paginated kline requests
//!
//! The exchange caps each klines call at a fixed row count, so a download
//! covering an arbitrary date range is split into an ordered sequence of
//! contiguous, non-overlapping windows. Each window spans at most
//! `(max_rows - 1) * interval` seconds; the next window starts one interval
//! after the previous one ends, so no candle is fetched twice and none is
//! skipped at window joins.

use crate::Interval;
use chrono::{Local, NaiveDate, TimeZone};
use tracing::warn;

/// Window planning errors
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    /// Date string could not be parsed
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Requested range is empty or inverted
    #[error("invalid range: {0}")]
    InvalidRange(String),
}

/// One API request's time span, in Unix seconds (inclusive bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Window start (Unix timestamp in seconds)
    pub start: i64,
    /// Window end (Unix timestamp in seconds)
    pub end: i64,
}

/// Parse a `YYYY-MM-DD` date to a Unix timestamp at local midnight.
pub fn parse_date(input: &str) -> Result<i64, WindowError> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| WindowError::InvalidDate(format!("{input}: {e}")))?;
    let datetime = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| WindowError::InvalidDate(input.to_string()))?;
    let local = Local
        .from_local_datetime(&datetime)
        .earliest()
        .ok_or_else(|| WindowError::InvalidDate(format!("{input}: no local midnight")))?;
    Ok(local.timestamp())
}

/// Plan the request windows covering `[start, end]` for one interval.
///
/// # Arguments
/// * `start` - Start date, `YYYY-MM-DD`, inclusive
/// * `end` - Optional end date, `YYYY-MM-DD`; defaults to now
/// * `interval` - Kline granularity
/// * `max_rows` - Maximum rows the API returns per call
///
/// # Errors
/// Returns [`WindowError::InvalidRange`] if the start is not before the end
/// or the span is shorter than one interval, [`WindowError::InvalidDate`] on
/// malformed dates.
pub fn plan_windows(
    start: &str,
    end: Option<&str>,
    interval: Interval,
    max_rows: usize,
) -> Result<Vec<TimeWindow>, WindowError> {
    let start_ts = parse_date(start)?;
    let end_ts = match end {
        Some(e) => parse_date(e)?,
        None => Local::now().timestamp(),
    };

    if start_ts >= end_ts {
        return Err(WindowError::InvalidRange(format!(
            "start {start} is not before end ({end_ts})"
        )));
    }

    let interval_secs = interval.as_secs();
    if interval == Interval::OneMonth {
        warn!("monthly interval is approximated as 30 days for window arithmetic");
    }

    // Each window covers max_rows candles: the last candle opens at
    // start + (max_rows - 1) * interval.
    let window_span = (max_rows as i64 - 1) * interval_secs;

    let mut windows = Vec::new();
    let mut cur_start = start_ts;
    let mut cur_end = start_ts;
    while cur_end < end_ts - interval_secs {
        cur_end = (cur_start + window_span).min(end_ts);
        windows.push(TimeWindow {
            start: cur_start,
            end: cur_end,
        });
        cur_start = cur_end + interval_secs;
    }

    if windows.is_empty() {
        return Err(WindowError::InvalidRange(format!(
            "range from {start} is shorter than one {interval} interval"
        )));
    }

    Ok(windows)
}
