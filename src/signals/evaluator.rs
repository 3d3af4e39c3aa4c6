//! Condition evaluator: turns two consecutive snapshots into named signals

use serde::{Deserialize, Serialize};

use crate::models::{IndicatorSnapshot, SignalName, SignalSet, Strategy};
use crate::signals::crossover::{crosses_above, crosses_below, detect_cross, Cross};

/// Oscillator levels the conditions compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    pub rsi_midline: f64,
    pub stoch_oversold: f64,
    pub stoch_overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_midline: 50.0,
            stoch_oversold: 20.0,
            stoch_overbought: 80.0,
        }
    }
}

/// Snapshot fields once a snapshot is known to be ready.
struct Readings {
    ema_fast: f64,
    ema_slow: f64,
    rsi: f64,
    macd_line: f64,
    macd_signal: f64,
    stoch_k: f64,
    stoch_d: f64,
}

impl Readings {
    fn from_snapshot(snapshot: &IndicatorSnapshot) -> Option<Self> {
        if !snapshot.is_ready() {
            return None;
        }
        Some(Self {
            ema_fast: snapshot.ema_fast?,
            ema_slow: snapshot.ema_slow?,
            rsi: snapshot.rsi?,
            macd_line: snapshot.macd_line?,
            macd_signal: snapshot.macd_signal?,
            stoch_k: snapshot.stoch_k?,
            stoch_d: snapshot.stoch_d?,
        })
    }

    fn uptrend(&self) -> bool {
        self.ema_fast > self.ema_slow
    }

    fn downtrend(&self) -> bool {
        self.ema_fast < self.ema_slow
    }
}

#[derive(Debug, Clone)]
pub struct ConditionEvaluator {
    strategies: Vec<Strategy>,
    thresholds: SignalThresholds,
}

impl ConditionEvaluator {
    pub fn new(strategies: Vec<Strategy>, thresholds: SignalThresholds) -> Self {
        let mut strategies = strategies;
        strategies.sort();
        strategies.dedup();
        Self {
            strategies,
            thresholds,
        }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Value of every signal of the configured strategies at `current`.
    ///
    /// Returns `None` unless both snapshots are ready.
    pub fn evaluate(
        &self,
        previous: &IndicatorSnapshot,
        current: &IndicatorSnapshot,
    ) -> Option<SignalSet> {
        let prev = Readings::from_snapshot(previous)?;
        let curr = Readings::from_snapshot(current)?;

        let mut signals = SignalSet::new();
        for strategy in &self.strategies {
            match strategy {
                Strategy::TrendContinuation => self.trend_continuation(&prev, &curr, &mut signals),
                Strategy::PullbackReversal => self.pullback_reversal(&prev, &curr, &mut signals),
            }
        }
        Some(signals)
    }

    fn trend_continuation(&self, prev: &Readings, curr: &Readings, signals: &mut SignalSet) {
        let macd_cross = detect_cross(
            prev.macd_line,
            prev.macd_signal,
            curr.macd_line,
            curr.macd_signal,
        );
        let midline = self.thresholds.rsi_midline;

        signals.insert(
            SignalName::TrendLongEntry,
            curr.uptrend() && macd_cross == Some(Cross::Above) && curr.rsi > midline,
        );
        signals.insert(
            SignalName::TrendShortEntry,
            curr.downtrend() && macd_cross == Some(Cross::Below) && curr.rsi < midline,
        );
        signals.insert(SignalName::TrendLongExit, macd_cross == Some(Cross::Below));
        signals.insert(SignalName::TrendShortExit, macd_cross == Some(Cross::Above));
    }

    fn pullback_reversal(&self, prev: &Readings, curr: &Readings, signals: &mut SignalSet) {
        let stoch_cross = detect_cross(prev.stoch_k, prev.stoch_d, curr.stoch_k, curr.stoch_d);
        let oversold = self.thresholds.stoch_oversold;
        let overbought = self.thresholds.stoch_overbought;

        let turns_up = stoch_cross == Some(Cross::Above)
            || crosses_above(prev.stoch_k, oversold, curr.stoch_k, oversold);
        let turns_down = stoch_cross == Some(Cross::Below)
            || crosses_below(prev.stoch_k, overbought, curr.stoch_k, overbought);

        signals.insert(
            SignalName::PullbackLongEntry,
            curr.uptrend() && prev.stoch_k < oversold && turns_up,
        );
        signals.insert(
            SignalName::PullbackShortEntry,
            curr.downtrend() && prev.stoch_k > overbought && turns_down,
        );
        signals.insert(
            SignalName::PullbackLongExit,
            stoch_cross == Some(Cross::Below) && curr.stoch_k > overbought,
        );
        signals.insert(
            SignalName::PullbackShortExit,
            stoch_cross == Some(Cross::Above) && curr.stoch_k < oversold,
        );
    }
}
