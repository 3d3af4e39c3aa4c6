//! OHLC bar model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One period's open/high/low/close summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Opening time of the period
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// False when any price field is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// Close prices of a bar slice; NaN for any anomalous bar.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .map(|b| if b.is_finite() { b.close } else { f64::NAN })
        .collect()
}
