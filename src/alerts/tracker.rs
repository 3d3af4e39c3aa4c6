//! Rising-edge alert tracking with per-signal de-duplication

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::alerts::store::{AlertKey, AlertRecord, AlertStore, InMemoryAlertStore, SetupKey};
use crate::models::{SeriesKey, SignalKind, SignalName, SignalSet, TransitionEvent};

/// Remembers the last value of every (symbol, timeframe, signal) and reports only
/// false → true transitions, so a signal notifies at most once per continuous
/// true-run.
///
/// Exit signals are additionally gated on an open entry of the same strategy and
/// direction; an ungated exit edge is recorded without notifying.
pub struct AlertStateTracker {
    store: Box<dyn AlertStore>,
}

impl AlertStateTracker {
    pub fn new() -> Self {
        Self::with_store(Box::new(InMemoryAlertStore::new()))
    }

    pub fn with_store(store: Box<dyn AlertStore>) -> Self {
        Self { store }
    }

    pub fn update(
        &mut self,
        series: &SeriesKey,
        signal: SignalName,
        value: bool,
        at: DateTime<Utc>,
    ) -> Option<TransitionEvent> {
        let key = AlertKey {
            series: series.clone(),
            signal,
        };
        let mut record = self.store.record(&key);
        let rising = value && !record.active;
        record.active = value;

        if !rising {
            trace!(series = %series, signal = %signal, value, "AlertStateTracker: no edge");
            self.store.save_record(key, record);
            return None;
        }

        let setup = SetupKey {
            series: series.clone(),
            strategy: signal.strategy(),
        };
        let notify = match signal.kind() {
            SignalKind::Entry => {
                self.store.set_open_setup(setup, Some(signal.direction()));
                true
            }
            SignalKind::Exit => {
                if self.store.open_setup(&setup) == Some(signal.direction()) {
                    self.store.set_open_setup(setup, None);
                    true
                } else {
                    debug!(
                        series = %series,
                        signal = %signal,
                        "AlertStateTracker: exit edge without matching open entry, not notifying"
                    );
                    false
                }
            }
        };

        if notify {
            record.last_notified = Some(at);
        }
        self.store.save_record(key, record);

        notify.then(|| TransitionEvent {
            series: series.clone(),
            signal,
            at,
        })
    }

    /// Feed a whole signal set; returns the events to notify, in signal order.
    pub fn apply(
        &mut self,
        series: &SeriesKey,
        signals: &SignalSet,
        at: DateTime<Utc>,
    ) -> Vec<TransitionEvent> {
        signals
            .iter()
            .filter_map(|(name, value)| self.update(series, name, value, at))
            .collect()
    }

    pub fn record(&self, series: &SeriesKey, signal: SignalName) -> AlertRecord {
        self.store.record(&AlertKey {
            series: series.clone(),
            signal,
        })
    }
}

impl Default for AlertStateTracker {
    fn default() -> Self {
        Self::new()
    }
}
