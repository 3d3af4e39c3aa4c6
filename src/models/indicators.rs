use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Periods for every indicator the engine derives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub stoch_k: usize,
    pub stoch_d: usize,
    pub atr: usize,
}

impl IndicatorParams {
    /// Bars needed before every snapshot field can be defined.
    pub fn longest_lookback(&self) -> usize {
        [
            self.ema_fast,
            self.ema_slow,
            self.rsi + 1,
            self.macd_slow + self.macd_signal - 1,
            self.stoch_k + self.stoch_d - 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_fast: 50,
            ema_slow: 200,
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            stoch_k: 14,
            stoch_d: 3,
            atr: 14,
        }
    }
}

/// Whether a snapshot can take part in signal evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotStatus {
    Ready,
    /// At least one indicator has not warmed up yet
    InsufficientHistory,
    /// The bar or a derived value is NaN/inf
    NumericAnomaly,
}

/// Indicator values for one bar.
///
/// `None` means the indicator has not enough history at this bar; `Some(NaN)` marks a
/// numeric anomaly inherited from the bar itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    /// Informational; does not affect `status()`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr: Option<f64>,
}

impl IndicatorSnapshot {
    fn core_fields(&self) -> [Option<f64>; 8] {
        [
            self.ema_fast,
            self.ema_slow,
            self.rsi,
            self.macd_line,
            self.macd_signal,
            self.macd_hist,
            self.stoch_k,
            self.stoch_d,
        ]
    }

    pub fn status(&self) -> SnapshotStatus {
        let fields = self.core_fields();
        if !self.close.is_finite() || fields.iter().flatten().any(|v| !v.is_finite()) {
            SnapshotStatus::NumericAnomaly
        } else if fields.iter().any(Option::is_none) {
            SnapshotStatus::InsufficientHistory
        } else {
            SnapshotStatus::Ready
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status() == SnapshotStatus::Ready
    }
}
