//! Alert state storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Direction, SeriesKey, SignalName, Strategy};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertKey {
    pub series: SeriesKey,
    pub signal: SignalName,
}

/// Last known state of one signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub active: bool,
    pub last_notified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetupKey {
    pub series: SeriesKey,
    pub strategy: Strategy,
}

/// Backing store for alert state.
///
/// The default is process-lifetime memory; a durable implementation can be plugged
/// into `AlertStateTracker::with_store` without touching the transition logic.
pub trait AlertStore: Send {
    /// State for `key`, or the inactive default for an unseen key.
    fn record(&self, key: &AlertKey) -> AlertRecord;

    fn save_record(&mut self, key: AlertKey, record: AlertRecord);

    /// Direction of the last notified entry that has not been exited yet.
    fn open_setup(&self, key: &SetupKey) -> Option<Direction>;

    fn set_open_setup(&mut self, key: SetupKey, direction: Option<Direction>);
}

#[derive(Debug, Default)]
pub struct InMemoryAlertStore {
    records: HashMap<AlertKey, AlertRecord>,
    setups: HashMap<SetupKey, Direction>,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AlertStore for InMemoryAlertStore {
    fn record(&self, key: &AlertKey) -> AlertRecord {
        self.records.get(key).cloned().unwrap_or_default()
    }

    fn save_record(&mut self, key: AlertKey, record: AlertRecord) {
        self.records.insert(key, record);
    }

    fn open_setup(&self, key: &SetupKey) -> Option<Direction> {
        self.setups.get(key).copied()
    }

    fn set_open_setup(&mut self, key: SetupKey, direction: Option<Direction>) {
        match direction {
            Some(direction) => {
                self.setups.insert(key, direction);
            }
            None => {
                self.setups.remove(&key);
            }
        }
    }
}
