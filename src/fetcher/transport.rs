//! reqwest-backed HTTP transport

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::fetcher::{FetcherError, FetcherResult, HttpTransport};

/// Production [`HttpTransport`] built on a shared `reqwest::Client`.
///
/// The client carries the per-request timeout and optional HTTP/HTTPS proxy
/// configuration; connections are reused across requests by reqwest's pool.
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport for `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - API base (e.g., "<https://api.binance.com>")
    /// * `timeout` - Per-request timeout
    /// * `http_proxy` - Optional proxy URL for plain HTTP requests
    /// * `https_proxy` - Optional proxy URL for HTTPS requests
    ///
    /// # Errors
    /// Returns [`FetcherError::ClientError`] if a proxy URL is malformed or
    /// the underlying client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        http_proxy: Option<&str>,
        https_proxy: Option<&str>,
    ) -> FetcherResult<Self> {
        let mut builder = Client::builder().timeout(timeout);

        if let Some(proxy) = http_proxy {
            builder = builder.proxy(
                Proxy::http(proxy)
                    .map_err(|e| FetcherError::ClientError(format!("invalid HTTP proxy: {e}")))?,
            );
        }
        if let Some(proxy) = https_proxy {
            builder = builder.proxy(
                Proxy::https(proxy)
                    .map_err(|e| FetcherError::ClientError(format!("invalid HTTPS proxy: {e}")))?,
            );
        }

        let client = builder
            .build()
            .map_err(|e| FetcherError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> FetcherResult<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {} with {} params", url, params.len());

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| FetcherError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(FetcherError::HttpError(format!("{status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetcherError::ParseError(e.to_string()))
    }
}
