//! Signal names, strategies and alert transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::models::timeframe::Timeframe;

/// Signal family; selected through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// MACD cross with RSI momentum filter inside the EMA trend
    TrendContinuation,
    /// Stochastic turn out of oversold/overbought inside the EMA trend
    PullbackReversal,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::TrendContinuation => "trend continuation",
            Strategy::PullbackReversal => "pullback reversal",
        }
    }

    pub fn signals(&self) -> [SignalName; 4] {
        match self {
            Strategy::TrendContinuation => [
                SignalName::TrendLongEntry,
                SignalName::TrendShortEntry,
                SignalName::TrendLongExit,
                SignalName::TrendShortExit,
            ],
            Strategy::PullbackReversal => [
                SignalName::PullbackLongEntry,
                SignalName::PullbackShortEntry,
                SignalName::PullbackLongExit,
                SignalName::PullbackShortExit,
            ],
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trend" | "trend_continuation" | "macd_rsi" => Ok(Strategy::TrendContinuation),
            "pullback" | "pullback_reversal" | "stochastic" => Ok(Strategy::PullbackReversal),
            other => Err(ConfigError::invalid("strategy", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Entry,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalName {
    TrendLongEntry,
    TrendShortEntry,
    TrendLongExit,
    TrendShortExit,
    PullbackLongEntry,
    PullbackShortEntry,
    PullbackLongExit,
    PullbackShortExit,
}

impl SignalName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalName::TrendLongEntry => "trend_long_entry",
            SignalName::TrendShortEntry => "trend_short_entry",
            SignalName::TrendLongExit => "trend_long_exit",
            SignalName::TrendShortExit => "trend_short_exit",
            SignalName::PullbackLongEntry => "pullback_long_entry",
            SignalName::PullbackShortEntry => "pullback_short_entry",
            SignalName::PullbackLongExit => "pullback_long_exit",
            SignalName::PullbackShortExit => "pullback_short_exit",
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            SignalName::TrendLongEntry
            | SignalName::TrendShortEntry
            | SignalName::TrendLongExit
            | SignalName::TrendShortExit => Strategy::TrendContinuation,
            _ => Strategy::PullbackReversal,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            SignalName::TrendLongEntry
            | SignalName::TrendLongExit
            | SignalName::PullbackLongEntry
            | SignalName::PullbackLongExit => Direction::Long,
            _ => Direction::Short,
        }
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            SignalName::TrendLongExit
            | SignalName::TrendShortExit
            | SignalName::PullbackLongExit
            | SignalName::PullbackShortExit => SignalKind::Exit,
            _ => SignalKind::Entry,
        }
    }
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (symbol, timeframe) pair under evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl SeriesKey {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.timeframe)
    }
}

/// Value of every signal of the configured strategies at one bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalSet {
    values: Vec<(SignalName, bool)>,
}

impl SignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: SignalName, value: bool) {
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: SignalName) -> Option<bool> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignalName, bool)> + '_ {
        self.values.iter().copied()
    }

    /// Signals currently true.
    pub fn active(&self) -> Vec<SignalName> {
        self.values.iter().filter(|(_, v)| *v).map(|(n, _)| *n).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A notify-worthy rising edge produced by the alert tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub series: SeriesKey,
    pub signal: SignalName,
    /// Timestamp of the bar the signal fired on
    pub at: DateTime<Utc>,
}
