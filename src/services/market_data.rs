//! Market data provider interface and an in-memory implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::DataError;
use crate::models::{Bar, SeriesKey, Timeframe};

/// Source of OHLC bars. The engine depends only on this trait.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Up to `lookback` most recent bars for `symbol` at `timeframe`, ascending by
    /// timestamp with no duplicates.
    async fn fetch_ohlc(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, DataError>;
}

/// Provider serving bars held in memory; useful for replays and tests.
#[derive(Default)]
pub struct InMemoryMarketDataProvider {
    bars: RwLock<HashMap<SeriesKey, Vec<Bar>>>,
}

impl InMemoryMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bars served for `key`.
    pub async fn set_bars(&self, key: SeriesKey, mut bars: Vec<Bar>) {
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        self.bars.write().await.insert(key, bars);
    }

    pub async fn push_bar(&self, key: SeriesKey, bar: Bar) {
        let mut map = self.bars.write().await;
        let bars = map.entry(key).or_default();
        bars.retain(|b| b.timestamp != bar.timestamp);
        bars.push(bar);
        bars.sort_by_key(|b| b.timestamp);
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryMarketDataProvider {
    async fn fetch_ohlc(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let key = SeriesKey::new(symbol, timeframe);
        let map = self.bars.read().await;
        match map.get(&key) {
            Some(bars) if !bars.is_empty() => {
                let start = bars.len().saturating_sub(lookback);
                Ok(bars[start..].to_vec())
            }
            _ => Err(DataError::Empty {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            }),
        }
    }
}
