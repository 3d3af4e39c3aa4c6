//! Signal engine: series in, signal set for the latest bar out.

use chrono::{DateTime, Utc};

use crate::indicators::compute_snapshots;
use crate::models::{Bar, IndicatorParams, IndicatorSnapshot, SignalSet, SnapshotStatus};
use crate::signals::evaluator::ConditionEvaluator;

/// Why no signals could be evaluated for the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insufficient {
    /// Fewer than two snapshots in the series
    TooFewBars { available: usize },
    /// One of the two latest snapshots is still warming up
    History,
    /// One of the two latest bars is anomalous
    Anomaly,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Ready {
        timestamp: DateTime<Utc>,
        snapshot: IndicatorSnapshot,
        signals: SignalSet,
    },
    Insufficient(Insufficient),
}

pub struct SignalEngine {
    params: IndicatorParams,
    evaluator: ConditionEvaluator,
}

impl SignalEngine {
    pub fn new(params: IndicatorParams, evaluator: ConditionEvaluator) -> Self {
        Self { params, evaluator }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    pub fn evaluator(&self) -> &ConditionEvaluator {
        &self.evaluator
    }

    /// Compute indicators over `bars` and evaluate the latest two snapshots.
    pub fn evaluate(&self, bars: &[Bar]) -> Evaluation {
        let snapshots = compute_snapshots(bars, &self.params);
        self.evaluate_snapshots(&snapshots)
    }

    pub fn evaluate_snapshots(&self, snapshots: &[IndicatorSnapshot]) -> Evaluation {
        let [.., previous, current] = snapshots else {
            return Evaluation::Insufficient(Insufficient::TooFewBars {
                available: snapshots.len(),
            });
        };

        let statuses = [previous.status(), current.status()];
        if statuses.contains(&SnapshotStatus::NumericAnomaly) {
            return Evaluation::Insufficient(Insufficient::Anomaly);
        }
        if statuses.contains(&SnapshotStatus::InsufficientHistory) {
            return Evaluation::Insufficient(Insufficient::History);
        }

        match self.evaluator.evaluate(previous, current) {
            Some(signals) => Evaluation::Ready {
                timestamp: current.timestamp,
                snapshot: current.clone(),
                signals,
            },
            None => Evaluation::Insufficient(Insufficient::History),
        }
    }
}
