//! Binance spot API client
//!
//! Wraps an [`HttpTransport`] with endpoint knowledge, bounded fixed-backoff
//! retry for kline requests, and soft-failing symbol discovery.

use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::fetcher::{parser, FetcherError, FetcherResult, HttpTransport};
use crate::window::TimeWindow;
use crate::{Interval, RawKline};

/// Exchange info endpoint (tradable symbol listing)
pub const EXCHANGE_INFO_ENDPOINT: &str = "/api/v3/exchangeInfo";

/// Klines endpoint (historical candles)
pub const KLINES_ENDPOINT: &str = "/api/v3/klines";

/// Instrument status marking an actively trading pair
const STATUS_TRADING: &str = "TRADING";

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolInfo {
    base_asset: String,
    quote_asset: String,
    status: String,
}

/// Client for the Binance spot REST API.
pub struct BinanceClient {
    transport: Arc<dyn HttpTransport>,
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl BinanceClient {
    /// Create a client over the given transport.
    ///
    /// # Arguments
    /// * `transport` - HTTP seam (shared so tests can keep a handle)
    /// * `retry_attempts` - Total kline request attempts before giving up
    /// * `retry_backoff` - Fixed pause between attempts
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        retry_attempts: u32,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            transport,
            retry_attempts,
            retry_backoff,
        }
    }

    /// List all currently tradable pairs as uppercased "BASE/QUOTE" strings.
    ///
    /// Network or HTTP failures are soft: they are logged and an empty list
    /// is returned, never an error.
    pub async fn list_symbols(&self) -> Vec<String> {
        let info = match self.transport.get_json(EXCHANGE_INFO_ENDPOINT, &[]).await {
            Ok(payload) => match serde_json::from_value::<ExchangeInfo>(payload) {
                Ok(info) => info,
                Err(e) => {
                    warn!("malformed exchange info response: {e}");
                    return Vec::new();
                }
            },
            Err(e) => {
                warn!("failed to fetch tradable symbols: {e}");
                return Vec::new();
            }
        };

        info.symbols
            .into_iter()
            .filter(|s| s.status == STATUS_TRADING)
            .map(|s| {
                format!(
                    "{}/{}",
                    s.base_asset.to_uppercase(),
                    s.quote_asset.to_uppercase()
                )
            })
            .collect()
    }

    /// Fetch one window of klines, retrying on failure.
    ///
    /// # Arguments
    /// * `symbol` - Normalized symbol without separator (e.g., "BTCUSDT")
    /// * `interval` - Kline granularity
    /// * `window` - Optional time span; sent as epoch-millisecond
    ///   `startTime`/`endTime` query parameters
    /// * `limit` - Maximum rows to request
    ///
    /// # Errors
    /// Retries network and HTTP errors up to the configured attempt count
    /// with a fixed backoff between attempts, then returns the last error.
    /// An empty 2xx response is a legitimate `Ok(vec![])`, distinct from
    /// retry exhaustion; callers decide whether exhaustion is fatal.
    pub async fn fetch_klines(
        &self,
        symbol: &str,
        interval: Interval,
        window: Option<&TimeWindow>,
        limit: usize,
    ) -> FetcherResult<Vec<RawKline>> {
        let mut params = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(w) = window {
            params.push(("startTime", (w.start * 1000).to_string()));
            params.push(("endTime", (w.end * 1000).to_string()));
        }

        let mut last_error = None;
        for attempt in 1..=self.retry_attempts {
            match self.transport.get_json(KLINES_ENDPOINT, &params).await {
                Ok(payload) => {
                    debug!("kline request for {symbol} succeeded on attempt {attempt}");
                    // Parse failures on a successful response are not retried.
                    return parser::parse_klines(payload);
                }
                Err(e) => {
                    warn!(
                        "kline request for {symbol} failed (attempt {attempt}/{}): {e}",
                        self.retry_attempts
                    );
                    last_error = Some(e);
                    if attempt < self.retry_attempts {
                        sleep(self.retry_backoff).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FetcherError::NetworkError("no request attempts made".to_string())))
    }
}
