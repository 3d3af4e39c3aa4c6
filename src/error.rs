//! Error types shared across the engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Market data could not be obtained for a symbol/timeframe.
///
/// Every variant is the "data unavailable" kind: the cycle for that pair aborts
/// without touching series or alert state and is retried on the next tick.
#[derive(Debug, Error)]
pub enum DataError {
    /// Transport-level failure talking to the provider
    #[error("request for {symbol} failed: {source}")]
    Request {
        symbol: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with an error payload or an unexpected status
    #[error("provider rejected {symbol}: {reason}")]
    Provider { symbol: String, reason: String },

    /// The response body could not be decoded into bars
    #[error("malformed response for {symbol}: {reason}")]
    Parse { symbol: String, reason: String },

    /// The provider returned no bars at all
    #[error("no bars returned for {symbol} ({timeframe})")]
    Empty { symbol: String, timeframe: String },
}

impl DataError {
    pub fn provider(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        DataError::Provider {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    pub fn parse(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        DataError::Parse {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

/// A single channel failed to deliver a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("{channel} request failed: {source}")]
    Http {
        channel: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{channel} rejected message: {reason}")]
    Rejected { channel: &'static str, reason: String },

    #[error("{channel} is misconfigured: {reason}")]
    Misconfigured { channel: &'static str, reason: String },
}

impl NotifyError {
    pub fn channel(&self) -> &'static str {
        match self {
            NotifyError::Http { channel, .. }
            | NotifyError::Rejected { channel, .. }
            | NotifyError::Misconfigured { channel, .. } => *channel,
        }
    }
}

/// Invalid or unparseable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, value: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Rejected mutation of a series store.
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("bar at {got} does not follow last bar at {last}")]
    NonIncreasingTimestamp {
        last: DateTime<Utc>,
        got: DateTime<Utc>,
    },
}
