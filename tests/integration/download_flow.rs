//! End-to-end download tests over a scripted transport

use kline_downloader::downloader::{DownloadConfig, DownloadError, DownloadJob, Downloader};
use kline_downloader::output::Dimension;
use kline_downloader::window::parse_date;
use kline_downloader::Interval;
use std::sync::Arc;
use tempfile::TempDir;

use super::mock::{kline_rows, MockTransport};

// 2021-07-01 00:00:00 UTC; only used as candle content, independent of the
// local-midnight window boundaries.
const T0_MS: i64 = 1_625_097_600_000;

const HOUR_MS: i64 = 3_600_000;

fn downloader_with(transport: Arc<MockTransport>) -> Downloader {
    Downloader::with_transport(DownloadConfig::default(), transport)
}

#[tokio::test]
async fn test_two_days_of_hourly_candles() {
    // 48 hourly candles fit in a single request window.
    let transport = Arc::new(MockTransport::with_responses(vec![Ok(kline_rows(
        T0_MS, HOUR_MS, 48,
    ))]));
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("btc.csv");

    let job = DownloadJob::new("BTC/USDT", Interval::OneHour, "2021-07-01")
        .with_end("2021-07-03")
        .with_output(&out);

    downloader_with(transport.clone()).download(&job).await.unwrap();
    assert_eq!(transport.calls(), 1);

    let contents = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "open_time,open,high,low,close,volume");
    assert_eq!(lines.len(), 49, "header + 48 candles");

    // open_time is strictly increasing; the datetime format sorts
    // lexicographically.
    let times: Vec<&str> = lines[1..]
        .iter()
        .map(|l| l.split(',').next().unwrap())
        .collect();
    for pair in times.windows(2) {
        assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
    }
}

#[tokio::test]
async fn test_window_times_sent_in_milliseconds() {
    let transport = Arc::new(MockTransport::with_responses(vec![Ok(kline_rows(
        T0_MS, HOUR_MS, 48,
    ))]));
    let dir = TempDir::new().unwrap();

    let job = DownloadJob::new("BTC/USDT", Interval::OneHour, "2021-07-01")
        .with_end("2021-07-03")
        .with_output(dir.path().join("btc.csv"));
    downloader_with(transport.clone()).download(&job).await.unwrap();

    let params = transport.recorded_params();
    assert_eq!(params.len(), 1);
    let find = |key: &str| {
        params[0]
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };
    assert_eq!(find("symbol").as_deref(), Some("BTCUSDT"));
    assert_eq!(find("interval").as_deref(), Some("1h"));
    assert_eq!(find("limit").as_deref(), Some("1000"));

    let start_ms = parse_date("2021-07-01").unwrap() * 1000;
    let end_ms = parse_date("2021-07-03").unwrap() * 1000;
    assert_eq!(find("startTime").as_deref(), Some(start_ms.to_string().as_str()));
    assert_eq!(find("endTime").as_deref(), Some(end_ms.to_string().as_str()));
}

#[tokio::test]
async fn test_multi_window_download_preserves_order() {
    // Three days of minute candles need five windows of <= 1000 rows.
    let responses: Vec<_> = (0..5)
        .map(|i| Ok(kline_rows(T0_MS + i * 120_000, 60_000, 2)))
        .collect();
    let transport = Arc::new(MockTransport::with_responses(responses));
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("btc.csv");

    let job = DownloadJob::new("BTC/USDT", Interval::OneMinute, "2021-07-01")
        .with_end("2021-07-04")
        .with_output(&out);
    downloader_with(transport.clone()).download(&job).await.unwrap();
    assert_eq!(transport.calls(), 5);

    let contents = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 11, "header + 5 windows x 2 candles");
    let times: Vec<&str> = lines[1..]
        .iter()
        .map(|l| l.split(',').next().unwrap())
        .collect();
    for pair in times.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[tokio::test]
async fn test_full_dimension_columns() {
    let transport = Arc::new(MockTransport::with_responses(vec![Ok(kline_rows(
        T0_MS, HOUR_MS, 48,
    ))]));
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("btc.csv");

    let job = DownloadJob::new("BTC/USDT", Interval::OneHour, "2021-07-01")
        .with_end("2021-07-03")
        .with_output(&out)
        .with_dimension(Dimension::Full);
    downloader_with(transport).download(&job).await.unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    assert!(contents.starts_with(
        "open_time,open,high,low,close,volume,value,trade_cnt,active_buy_volume,active_buy_value"
    ));
}

#[tokio::test]
async fn test_all_empty_windows_is_no_data_error() {
    // Drained queue answers with empty arrays for every window.
    let transport = Arc::new(MockTransport::with_responses(vec![]));
    let dir = TempDir::new().unwrap();

    let job = DownloadJob::new("BTC/USDT", Interval::OneHour, "2021-07-01")
        .with_end("2021-07-03")
        .with_output(dir.path().join("btc.csv"));
    let err = downloader_with(transport).download(&job).await.unwrap_err();
    assert!(matches!(err, DownloadError::NoData));
}

#[tokio::test]
async fn test_output_parent_directories_created() {
    let transport = Arc::new(MockTransport::with_responses(vec![Ok(kline_rows(
        T0_MS, HOUR_MS, 48,
    ))]));
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("data").join("spot").join("btc.csv");

    let job = DownloadJob::new("BTC/USDT", Interval::OneHour, "2021-07-01")
        .with_end("2021-07-03")
        .with_output(&out);
    let written = downloader_with(transport).download(&job).await.unwrap();
    assert_eq!(written, out);
    assert!(out.exists());
}

#[tokio::test]
async fn test_invalid_range_fails_before_any_request() {
    let transport = Arc::new(MockTransport::always_failing());

    let job = DownloadJob::new("BTC/USDT", Interval::OneHour, "2021-08-01")
        .with_end("2021-07-01");
    let err = downloader_with(transport.clone())
        .download(&job)
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::WindowError(_)));
    assert_eq!(transport.calls(), 0, "no network activity expected");
}

#[tokio::test]
async fn test_failed_window_is_skipped_not_fatal() {
    // First window fails every retry, second succeeds; the download still
    // completes with the surviving rows.
    let responses: Vec<_> = (0..3)
        .map(|_| {
            Err(kline_downloader::fetcher::FetcherError::NetworkError(
                "connection reset".to_string(),
            ))
        })
        .chain(std::iter::once(Ok(kline_rows(T0_MS, 60_000, 2))))
        .collect();
    let transport = Arc::new(MockTransport::with_responses(responses));
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("btc.csv");

    // Two windows: >1000 and <2000 minute intervals.
    let job = DownloadJob::new("BTC/USDT", Interval::OneMinute, "2021-07-01")
        .with_end("2021-07-02")
        .with_output(&out);

    tokio::time::pause();
    downloader_with(transport.clone()).download(&job).await.unwrap();
    // 3 failed attempts for window one, 1 success for window two.
    assert_eq!(transport.calls(), 4);

    let contents = std::fs::read_to_string(&out).unwrap();
    assert_eq!(contents.lines().count(), 3, "header + 2 surviving candles");
}
