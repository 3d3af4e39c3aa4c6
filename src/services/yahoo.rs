//! Yahoo Finance chart API provider

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::DataError;
use crate::indicators::resample;
use crate::models::{Bar, Timeframe};
use crate::services::market_data::MarketDataProvider;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; swingalert/0.1)";
/// Yahoo serves intraday hourly bars for at most this many days back
const MAX_RANGE_DAYS: usize = 730;
const MIN_RANGE_DAYS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

/// Column-oriented quotes; gaps arrive as `null`.
#[derive(Debug, Default, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

pub struct YahooChartProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Query range covering `native_bars` hourly bars with room for weekends and gaps.
    pub fn range_for(native_bars: usize) -> String {
        let days = (native_bars.div_ceil(24) * 2).clamp(MIN_RANGE_DAYS, MAX_RANGE_DAYS);
        format!("{}d", days)
    }
}

/// Convert a chart payload into ascending, de-duplicated bars.
///
/// Missing quote values become NaN so the bar is treated as anomalous downstream.
pub fn parse_chart(symbol: &str, response: ChartResponse) -> Result<Vec<Bar>, DataError> {
    if let Some(err) = response.chart.error {
        return Err(DataError::provider(
            symbol,
            format!("{}: {}", err.code, err.description),
        ));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| DataError::parse(symbol, "chart.result is empty"))?;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let value = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten().unwrap_or(f64::NAN);

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let timestamp = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| DataError::parse(symbol, format!("invalid timestamp {}", ts)))?;
        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);
        bars.push(
            Bar::new(
                timestamp,
                value(&quote.open, i),
                value(&quote.high, i),
                value(&quote.low, i),
                value(&quote.close, i),
            )
            .with_volume(volume),
        );
    }

    bars.sort_by_key(|b| b.timestamp);
    // keep the latest revision of a repeated timestamp
    bars.reverse();
    bars.dedup_by_key(|b| b.timestamp);
    bars.reverse();
    Ok(bars)
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    async fn fetch_ohlc(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let native = timeframe.native();
        let factor = timeframe.resample_factor();
        let native_bars = lookback.saturating_mul(factor).saturating_add(factor);
        let range = Self::range_for(native_bars);
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        debug!(
            symbol = %symbol,
            timeframe = %timeframe,
            range = %range,
            "YahooChartProvider: requesting {} bars",
            native
        );

        let response = self
            .client
            .get(&url)
            .query(&[("interval", native.as_str()), ("range", range.as_str())])
            .send()
            .await
            .map_err(|source| DataError::Request {
                symbol: symbol.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| DataError::Request {
            symbol: symbol.to_string(),
            source,
        })?;

        let parsed: ChartResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(DataError::provider(symbol, format!("HTTP {}", status)));
            }
            Err(e) => return Err(DataError::parse(symbol, e.to_string())),
        };

        let mut bars = parse_chart(symbol, parsed)?;
        if !status.is_success() {
            return Err(DataError::provider(symbol, format!("HTTP {}", status)));
        }
        if factor > 1 {
            bars = resample(&bars, native, timeframe);
        }
        if bars.len() > lookback {
            bars.drain(..bars.len() - lookback);
        }
        if bars.is_empty() {
            return Err(DataError::Empty {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            });
        }

        debug!(
            symbol = %symbol,
            timeframe = %timeframe,
            count = bars.len(),
            "YahooChartProvider: fetched {} bars",
            bars.len()
        );
        Ok(bars)
    }
}
