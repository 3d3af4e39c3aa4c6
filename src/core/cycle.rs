//! One evaluation pass per (symbol, timeframe) pair

use backon::{ExponentialBuilder, Retryable};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use crate::alerts::AlertStateTracker;
use crate::config::Config;
use crate::core::series::SeriesStore;
use crate::error::DataError;
use crate::models::{Bar, SeriesKey, TransitionEvent};
use crate::services::{MarketDataProvider, NotificationHub};
use crate::signals::{message, ConditionEvaluator, Evaluation, Insufficient, SignalEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Fetching,
    UpdatingSeries,
    Computing,
    Evaluating,
    Notifying,
    Idle,
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CycleStage::Fetching => "fetching",
            CycleStage::UpdatingSeries => "updating_series",
            CycleStage::Computing => "computing",
            CycleStage::Evaluating => "evaluating",
            CycleStage::Notifying => "notifying",
            CycleStage::Idle => "idle",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
pub enum CycleOutcome {
    /// At least one transition was dispatched
    Notified {
        events: Vec<TransitionEvent>,
        /// Channel deliveries that failed across all events
        failed_deliveries: usize,
    },
    NoSignal,
    /// Not an error: the series cannot be evaluated yet
    Insufficient(Insufficient),
    /// The pair was aborted; series and alert state are untouched
    Failed { stage: CycleStage, error: DataError },
}

#[derive(Debug)]
pub struct CycleReport {
    pub series: SeriesKey,
    pub outcome: CycleOutcome,
    /// Bars held for the series after the pass
    pub bar_count: usize,
}

impl CycleReport {
    pub fn events(&self) -> &[TransitionEvent] {
        match &self.outcome {
            CycleOutcome::Notified { events, .. } => events,
            _ => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, CycleOutcome::Failed { .. })
    }
}

/// Fetch → update series → compute → evaluate → notify, for every configured pair.
pub struct EvaluationCycle {
    pairs: Vec<SeriesKey>,
    lookback: usize,
    provider: Arc<dyn MarketDataProvider>,
    hub: NotificationHub,
    engine: SignalEngine,
    tracker: AlertStateTracker,
    series: HashMap<SeriesKey, SeriesStore>,
    backoff: ExponentialBuilder,
}

impl EvaluationCycle {
    pub fn new(
        config: &Config,
        provider: Arc<dyn MarketDataProvider>,
        hub: NotificationHub,
    ) -> Self {
        let evaluator = ConditionEvaluator::new(config.strategies.clone(), config.thresholds.clone());
        Self {
            pairs: config.pairs(),
            lookback: config.lookback_bars,
            provider,
            hub,
            engine: SignalEngine::new(config.indicators.clone(), evaluator),
            tracker: AlertStateTracker::new(),
            series: HashMap::new(),
            backoff: ExponentialBuilder::default()
                .with_min_delay(Duration::from_secs(1))
                .with_max_delay(Duration::from_secs(30))
                .with_max_times(config.fetch_retries),
        }
    }

    pub fn with_tracker(mut self, tracker: AlertStateTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_backoff(mut self, backoff: ExponentialBuilder) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn pairs(&self) -> &[SeriesKey] {
        &self.pairs
    }

    pub fn tracker(&self) -> &AlertStateTracker {
        &self.tracker
    }

    pub fn series(&self, key: &SeriesKey) -> Option<&SeriesStore> {
        self.series.get(key)
    }

    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    /// One pass over every configured pair, sequentially.
    pub async fn run_all(&mut self) -> Vec<CycleReport> {
        let pairs = self.pairs.clone();
        let mut reports = Vec::with_capacity(pairs.len());
        for key in &pairs {
            reports.push(self.run_pair(key).await);
        }
        reports
    }

    pub async fn run_pair(&mut self, key: &SeriesKey) -> CycleReport {
        let outcome = self.advance(key).await;
        enter_stage(key, CycleStage::Idle);

        let bar_count = self.series.get(key).map(SeriesStore::len).unwrap_or(0);
        match &outcome {
            CycleOutcome::Failed { stage, error } => warn!(
                symbol = %key.symbol,
                timeframe = %key.timeframe,
                stage = %stage,
                error = %error,
                "EvaluationCycle: data unavailable, skipping pair until next cycle"
            ),
            CycleOutcome::Insufficient(reason) => info!(
                symbol = %key.symbol,
                timeframe = %key.timeframe,
                bars = bar_count,
                reason = ?reason,
                "EvaluationCycle: insufficient data, no signal yet"
            ),
            CycleOutcome::NoSignal => debug!(
                symbol = %key.symbol,
                timeframe = %key.timeframe,
                "EvaluationCycle: no new signal"
            ),
            CycleOutcome::Notified {
                events,
                failed_deliveries,
            } => info!(
                symbol = %key.symbol,
                timeframe = %key.timeframe,
                events = events.len(),
                failed_deliveries,
                "EvaluationCycle: dispatched {} alert(s)",
                events.len()
            ),
        }

        CycleReport {
            series: key.clone(),
            outcome,
            bar_count,
        }
    }

    async fn advance(&mut self, key: &SeriesKey) -> CycleOutcome {
        enter_stage(key, CycleStage::Fetching);
        let bars = match self.fetch(key).await {
            Ok(bars) => bars,
            Err(error) => {
                return CycleOutcome::Failed {
                    stage: CycleStage::Fetching,
                    error,
                }
            }
        };

        enter_stage(key, CycleStage::UpdatingSeries);
        let lookback = self.lookback;
        let store = self
            .series
            .entry(key.clone())
            .or_insert_with(|| SeriesStore::new(key.clone(), lookback));
        store.merge(bars);

        enter_stage(key, CycleStage::Computing);
        let evaluation = self.engine.evaluate(store.bars());

        enter_stage(key, CycleStage::Evaluating);
        let (timestamp, snapshot, signals) = match evaluation {
            Evaluation::Ready {
                timestamp,
                snapshot,
                signals,
            } => (timestamp, snapshot, signals),
            Evaluation::Insufficient(reason) => return CycleOutcome::Insufficient(reason),
        };

        // state is committed before dispatch; a failed delivery is not retried
        let events = self.tracker.apply(key, &signals, timestamp);
        if events.is_empty() {
            return CycleOutcome::NoSignal;
        }

        enter_stage(key, CycleStage::Notifying);
        let mut failed_deliveries = 0;
        for event in &events {
            let notification = message::compose(event, &snapshot);
            info!(
                symbol = %key.symbol,
                timeframe = %key.timeframe,
                signal = %event.signal,
                "{}",
                notification.body
            );
            if self.hub.is_empty() {
                continue;
            }
            let report = self.hub.broadcast(&notification).await;
            failed_deliveries += report.failures.len();
        }

        CycleOutcome::Notified {
            events,
            failed_deliveries,
        }
    }

    async fn fetch(&self, key: &SeriesKey) -> Result<Vec<Bar>, DataError> {
        let provider = &*self.provider;
        let symbol = key.symbol.as_str();
        let timeframe = key.timeframe;
        let lookback = self.lookback;

        (move || async move { provider.fetch_ohlc(symbol, timeframe, lookback).await })
            .retry(self.backoff.clone())
            .when(|e| !matches!(e, DataError::Empty { .. }))
            .notify(|e: &DataError, after: Duration| {
                warn!(
                    symbol,
                    timeframe = %timeframe,
                    error = %e,
                    "EvaluationCycle: fetch failed, retrying in {:?}",
                    after
                );
            })
            .await
    }
}

fn enter_stage(key: &SeriesKey, stage: CycleStage) {
    trace!(
        symbol = %key.symbol,
        timeframe = %key.timeframe,
        stage = %stage,
        "EvaluationCycle: entering stage"
    );
}
