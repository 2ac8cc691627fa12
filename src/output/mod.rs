//! Table reshaping and CSV output

use crate::Interval;

pub mod table;

pub use table::{Dimension, KlineTable};

/// Output errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Timestamp outside the representable datetime range
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(f64),

    /// Table has no rows
    #[error("table has no rows")]
    EmptyTable,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Default output filename: `{BASE-QUOTE}_{interval}_{start}_{end}.csv`.
///
/// `real_start` and `real_end` are the actual covered dates (`YYYY-MM-DD`)
/// derived from the first and last row of the table, not the requested range.
pub fn default_filename(
    symbol: &str,
    interval: Interval,
    real_start: &str,
    real_end: &str,
) -> String {
    format!(
        "{}_{}_{}_{}.csv",
        symbol.replace('/', "-"),
        interval,
        real_start,
        real_end
    )
}
