//! Data fetching from the exchange
//!
//! The fetcher is split at the HTTP boundary: [`HttpTransport`] is the
//! narrow seam that performs a single GET returning JSON, and
//! [`BinanceClient`] layers endpoint knowledge, retry, and response parsing
//! on top of it. Tests inject a mock transport instead of patching globals.

use async_trait::async_trait;
use serde_json::Value;

pub mod binance;
pub mod parser;
pub mod transport;

pub use binance::BinanceClient;
pub use transport::ReqwestTransport;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Non-2xx HTTP response
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network-level failure (timeout, connection refused)
    #[error("network error: {0}")]
    NetworkError(String),

    /// Response could not be parsed
    #[error("parse error: {0}")]
    ParseError(String),

    /// Transport could not be constructed (bad proxy, TLS setup)
    #[error("client error: {0}")]
    ClientError(String),
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// A single-request HTTP seam.
///
/// Production code uses [`ReqwestTransport`]; tests substitute an in-memory
/// implementation with scripted responses.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute one GET request against `endpoint` with the given query
    /// parameters, returning the response body as JSON.
    ///
    /// # Errors
    /// Returns [`FetcherError::NetworkError`] on transport failures,
    /// [`FetcherError::HttpError`] on non-2xx status codes, and
    /// [`FetcherError::ParseError`] if the body is not valid JSON.
    async fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> FetcherResult<Value>;
}
