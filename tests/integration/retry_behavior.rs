//! Retry behavior of the kline client

use kline_downloader::fetcher::{BinanceClient, FetcherError};
use kline_downloader::window::TimeWindow;
use kline_downloader::Interval;
use std::sync::Arc;
use std::time::Duration;

use super::mock::{kline_rows, MockTransport};

const BACKOFF: Duration = Duration::from_secs(2);

const WINDOW: TimeWindow = TimeWindow {
    start: 1_625_097_600,
    end: 1_625_184_000,
};

#[tokio::test(start_paused = true)]
async fn test_two_failures_then_success() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        Err(FetcherError::NetworkError("timeout".to_string())),
        Err(FetcherError::HttpError("503 Service Unavailable".to_string())),
        Ok(kline_rows(1_625_097_600_000, 3_600_000, 5)),
    ]));
    let client = BinanceClient::new(transport.clone(), 3, BACKOFF);

    let rows = client
        .fetch_klines("BTCUSDT", Interval::OneHour, Some(&WINDOW), 1000)
        .await
        .unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(transport.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_return_error() {
    let transport = Arc::new(MockTransport::always_failing());
    let client = BinanceClient::new(transport.clone(), 3, BACKOFF);

    let started = tokio::time::Instant::now();
    let err = client
        .fetch_klines("BTCUSDT", Interval::OneHour, Some(&WINDOW), 1000)
        .await
        .unwrap_err();
    assert!(matches!(err, FetcherError::NetworkError(_)));
    assert_eq!(transport.calls(), 3);
    // Fixed 2-second pause between attempts, none after the last.
    assert_eq!(started.elapsed(), Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn test_retry_attempts_is_configurable() {
    let transport = Arc::new(MockTransport::always_failing());
    let client = BinanceClient::new(transport.clone(), 5, BACKOFF);

    let result = client
        .fetch_klines("BTCUSDT", Interval::OneHour, Some(&WINDOW), 1000)
        .await;
    assert!(result.is_err());
    assert_eq!(transport.calls(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_empty_success_is_not_retried() {
    // An empty 2xx payload means "no candles in this window", not failure.
    let transport = Arc::new(MockTransport::with_responses(vec![]));
    let client = BinanceClient::new(transport.clone(), 3, BACKOFF);

    let rows = client
        .fetch_klines("BTCUSDT", Interval::OneHour, Some(&WINDOW), 1000)
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_parse_error_on_success_is_not_retried() {
    let transport = Arc::new(MockTransport::with_responses(vec![Ok(
        serde_json::json!({"code": -1121, "msg": "Invalid symbol."}),
    )]));
    let client = BinanceClient::new(transport.clone(), 3, BACKOFF);

    let err = client
        .fetch_klines("NOPE", Interval::OneHour, Some(&WINDOW), 1000)
        .await
        .unwrap_err();
    assert!(matches!(err, FetcherError::ParseError(_)));
    assert_eq!(transport.calls(), 1);
}
