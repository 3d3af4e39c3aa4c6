//! Per-(symbol, timeframe) bar storage

use tracing::debug;

use crate::error::SeriesError;
use crate::models::{Bar, SeriesKey};

/// Counts from merging a fetched batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub appended: usize,
    /// Bars that overwrote the stored bar with the same timestamp
    pub replaced: usize,
    /// Bars older than the stored tail
    pub skipped: usize,
}

/// Ordered bars for one series, bounded to `capacity` most recent entries.
///
/// Timestamps are strictly increasing.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    key: SeriesKey,
    bars: Vec<Bar>,
    capacity: usize,
}

impl SeriesStore {
    pub fn new(key: SeriesKey, capacity: usize) -> Self {
        Self {
            key,
            bars: Vec::with_capacity(capacity.min(4096)),
            capacity: capacity.max(1),
        }
    }

    pub fn key(&self) -> &SeriesKey {
        &self.key
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append one bar after the current tail.
    pub fn append(&mut self, bar: Bar) -> Result<(), SeriesError> {
        if let Some(last) = self.bars.last() {
            if bar.timestamp <= last.timestamp {
                return Err(SeriesError::NonIncreasingTimestamp {
                    last: last.timestamp,
                    got: bar.timestamp,
                });
            }
        }
        self.bars.push(bar);
        self.trim();
        Ok(())
    }

    /// Merge an ascending batch from the provider.
    ///
    /// Newer bars are appended, a bar sharing the tail's timestamp replaces it (the
    /// provider revises the bar still forming) and older bars are ignored.
    pub fn merge(&mut self, batch: Vec<Bar>) -> MergeStats {
        let mut stats = MergeStats::default();

        for bar in batch {
            match self.bars.last_mut() {
                Some(last) if bar.timestamp < last.timestamp => stats.skipped += 1,
                Some(last) if bar.timestamp == last.timestamp => {
                    *last = bar;
                    stats.replaced += 1;
                }
                _ => {
                    self.bars.push(bar);
                    stats.appended += 1;
                }
            }
        }
        self.trim();

        debug!(
            series = %self.key,
            appended = stats.appended,
            replaced = stats.replaced,
            skipped = stats.skipped,
            len = self.bars.len(),
            "SeriesStore: merged batch"
        );
        stats
    }

    /// Drop the oldest bars beyond capacity.
    pub fn trim(&mut self) {
        if self.bars.len() > self.capacity {
            let excess = self.bars.len() - self.capacity;
            self.bars.drain(..excess);
        }
    }
}
