//! Binance kline response parsing
//!
//! Stateless conversion of the klines JSON payload into [`RawKline`] rows.
//! The wire format is an array of 12-element arrays:
//! `[open_time, open, high, low, close, volume, close_time, quote_volume,
//! trades, taker_buy_base, taker_buy_quote, ignore]` with prices encoded as
//! strings. The trailing "ignore" element is dropped here.

use crate::fetcher::{FetcherError, FetcherResult};
use crate::RawKline;
use serde_json::Value;
use tracing::debug;

/// Minimum elements per kline row (the trailing "ignore" field may be absent
/// in archived payloads).
const KLINE_FIELDS: usize = 11;

/// Parse a klines JSON array into raw rows.
///
/// Individual numeric fields that cannot be coerced are carried as NaN and
/// substituted with zero during tabulation; only a structurally invalid
/// payload (not an array, rows too short) is an error.
pub fn parse_klines(payload: Value) -> FetcherResult<Vec<RawKline>> {
    let rows = payload
        .as_array()
        .ok_or_else(|| FetcherError::ParseError("klines payload is not an array".to_string()))?;

    let mut klines = Vec::with_capacity(rows.len());
    for row in rows {
        let fields = row
            .as_array()
            .ok_or_else(|| FetcherError::ParseError("kline row is not an array".to_string()))?;

        if fields.len() < KLINE_FIELDS {
            return Err(FetcherError::ParseError(format!(
                "expected at least {KLINE_FIELDS} elements in kline row, got {}",
                fields.len()
            )));
        }

        klines.push(RawKline {
            open_time: coerce_f64(&fields[0], "open_time"),
            open: coerce_f64(&fields[1], "open"),
            high: coerce_f64(&fields[2], "high"),
            low: coerce_f64(&fields[3], "low"),
            close: coerce_f64(&fields[4], "close"),
            volume: coerce_f64(&fields[5], "volume"),
            close_time: coerce_f64(&fields[6], "close_time"),
            value: coerce_f64(&fields[7], "value"),
            trade_cnt: coerce_f64(&fields[8], "trade_cnt"),
            active_buy_volume: coerce_f64(&fields[9], "active_buy_volume"),
            active_buy_value: coerce_f64(&fields[10], "active_buy_value"),
        });
    }

    Ok(klines)
}

/// Coerce a JSON value (number or numeric string) to f64, NaN on failure.
fn coerce_f64(value: &Value, field: &str) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) => v,
        None => {
            debug!("field {field} is not numeric ({value}), carrying NaN");
            f64::NAN
        }
    }
}
