//! Yahoo chart provider against a mocked chart API

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use swingalert::error::DataError;
use swingalert::models::Timeframe;
use swingalert::services::yahoo::{parse_chart, ChartResponse, YahooChartProvider};
use swingalert::services::MarketDataProvider;

use crate::common::{base_time, hour};

const CHART_PATH: &str = "/v8/finance/chart/EURUSD=X";

fn chart_body(hours: usize, null_close_at: Option<usize>) -> Value {
    let start = base_time().timestamp();
    let timestamps: Vec<i64> = (0..hours).map(|i| start + 3600 * i as i64).collect();
    let price = |i: usize| 1.08 + i as f64 * 0.001;
    let close: Vec<Value> = (0..hours)
        .map(|i| {
            if Some(i) == null_close_at {
                Value::Null
            } else {
                json!(price(i))
            }
        })
        .collect();

    json!({
        "chart": {
            "result": [{
                "meta": { "symbol": "EURUSD=X", "dataGranularity": "1h" },
                "timestamp": timestamps,
                "indicators": {
                    "quote": [{
                        "open": (0..hours).map(price).collect::<Vec<_>>(),
                        "high": (0..hours).map(|i| price(i) + 0.0005).collect::<Vec<_>>(),
                        "low": (0..hours).map(|i| price(i) - 0.0005).collect::<Vec<_>>(),
                        "close": close,
                        "volume": vec![0; hours],
                    }]
                }
            }],
            "error": null
        }
    })
}

fn provider(server: &MockServer) -> YahooChartProvider {
    YahooChartProvider::new(server.uri(), Duration::from_secs(5)).expect("client builds")
}

#[tokio::test]
async fn fetches_hourly_bars() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHART_PATH))
        .and(query_param("interval", "1h"))
        .and(query_param("range", "5d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(6, Some(2))))
        .expect(1)
        .mount(&server)
        .await;

    let bars = provider(&server)
        .fetch_ohlc("EURUSD=X", Timeframe::H1, 10)
        .await
        .expect("bars");

    assert_eq!(bars.len(), 6);
    assert_eq!(bars[0].timestamp, hour(0));
    assert!((bars[5].close - 1.085).abs() < 1e-12);
    // null close becomes an anomalous bar
    assert!(!bars[2].is_finite());
    assert!(bars[3].is_finite());
}

#[tokio::test]
async fn keeps_only_lookback_bars() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHART_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(6, None)))
        .mount(&server)
        .await;

    let bars = provider(&server)
        .fetch_ohlc("EURUSD=X", Timeframe::H1, 2)
        .await
        .unwrap();
    let stamps: Vec<_> = bars.iter().map(|b| b.timestamp).collect();
    assert_eq!(stamps, vec![hour(4), hour(5)]);
}

#[tokio::test]
async fn four_hour_bars_are_resampled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHART_PATH))
        .and(query_param("interval", "1h"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(10, None)))
        .mount(&server)
        .await;

    let bars = provider(&server)
        .fetch_ohlc("EURUSD=X", Timeframe::H4, 10)
        .await
        .unwrap();

    // the forming third bucket (hours 8-9) is withheld
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].timestamp, hour(0));
    assert_eq!(bars[1].timestamp, hour(4));
    assert!((bars[0].open - 1.08).abs() < 1e-12);
    assert!((bars[0].close - 1.083).abs() < 1e-12);
}

#[tokio::test]
async fn provider_error_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/NOPE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "chart": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "No data found, symbol may be delisted"
                }
            }
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch_ohlc("NOPE", Timeframe::H1, 10)
        .await
        .unwrap_err();
    match err {
        DataError::Provider { symbol, reason } => {
            assert_eq!(symbol, "NOPE");
            assert!(reason.contains("No data found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_without_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch_ohlc("EURUSD=X", Timeframe::H1, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::Provider { .. }));
}

#[tokio::test]
async fn malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"chart\": 42}"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch_ohlc("EURUSD=X", Timeframe::H1, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::Parse { .. }));
}

#[tokio::test]
async fn empty_result_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(0, None)))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch_ohlc("EURUSD=X", Timeframe::H1, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::Empty { .. }));
}

#[tokio::test]
async fn connection_failure_is_a_request_error() {
    let provider = YahooChartProvider::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
    let err = provider
        .fetch_ohlc("EURUSD=X", Timeframe::H1, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::Request { .. }));
}

#[test]
fn parse_chart_orders_and_dedups() {
    let start = base_time().timestamp();
    let response: ChartResponse = serde_json::from_value(json!({
        "chart": {
            "result": [{
                "timestamp": [start + 3600, start, start + 3600],
                "indicators": { "quote": [{
                    "open": [1.0, 2.0, 3.0],
                    "high": [1.0, 2.0, 3.0],
                    "low": [1.0, 2.0, 3.0],
                    "close": [1.0, 2.0, 3.0]
                }]}
            }],
            "error": null
        }
    }))
    .unwrap();

    let bars = parse_chart("EURUSD=X", response).unwrap();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].close, 2.0);
    // the later revision of a repeated timestamp wins
    assert_eq!(bars[1].close, 3.0);
}

#[test]
fn range_grows_with_lookback() {
    assert_eq!(YahooChartProvider::range_for(10), "5d");
    assert_eq!(YahooChartProvider::range_for(501), "42d");
    assert_eq!(YahooChartProvider::range_for(100_000), "730d");
}

#[tokio::test]
async fn huge_lookback_requests_the_longest_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHART_PATH))
        .and(query_param("interval", "1h"))
        .and(query_param("range", "730d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(8, None)))
        .expect(1)
        .mount(&server)
        .await;

    let bars = provider(&server)
        .fetch_ohlc("EURUSD=X", Timeframe::H4, usize::MAX)
        .await
        .expect("bars");

    assert_eq!(bars.len(), 2);
}
