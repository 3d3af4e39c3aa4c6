//! Unit tests for alert message rendering

use chrono::Utc;
use swingalert::models::{IndicatorSnapshot, SeriesKey, SignalName, Timeframe, TransitionEvent};
use swingalert::signals::message::{compose, render, ALERT_SUBJECT};

fn snapshot(close: f64, atr: Option<f64>) -> IndicatorSnapshot {
    IndicatorSnapshot {
        timestamp: Utc::now(),
        close,
        ema_fast: Some(1.2),
        ema_slow: Some(1.1),
        rsi: Some(55.0),
        macd_line: Some(0.001),
        macd_signal: Some(0.0),
        macd_hist: Some(0.001),
        stoch_k: Some(40.0),
        stoch_d: Some(35.0),
        atr,
    }
}

fn event(timeframe: Timeframe, signal: SignalName) -> TransitionEvent {
    TransitionEvent {
        series: SeriesKey::new("EURUSD=X", timeframe),
        signal,
        at: Utc::now(),
    }
}

#[test]
fn test_long_entry_with_levels() {
    let text = render(
        &event(Timeframe::H1, SignalName::TrendLongEntry),
        &snapshot(1.1, Some(0.002)),
    );
    assert_eq!(
        text,
        "EURUSD=X (1h) → 📈 LONG entry (trend continuation) | SL: 1.0970 | TP: 1.1060"
    );
}

#[test]
fn test_short_entry_with_levels() {
    let text = render(
        &event(Timeframe::H4, SignalName::PullbackShortEntry),
        &snapshot(1.1, Some(0.002)),
    );
    assert_eq!(
        text,
        "EURUSD=X (4h) → 📉 SHORT entry (pullback reversal) | SL: 1.1030 | TP: 1.0940"
    );
}

#[test]
fn test_entry_without_atr() {
    let text = render(
        &event(Timeframe::H1, SignalName::TrendLongEntry),
        &snapshot(1.1, None),
    );
    assert_eq!(text, "EURUSD=X (1h) → 📈 LONG entry (trend continuation)");
}

#[test]
fn test_exit_message() {
    let text = render(
        &event(Timeframe::H4, SignalName::PullbackShortExit),
        &snapshot(1.1, Some(0.002)),
    );
    assert_eq!(text, "EURUSD=X (4h) → ⚠️ SHORT exit (pullback reversal)");
}

#[test]
fn test_compose_uses_alert_subject() {
    let notification = compose(
        &event(Timeframe::H1, SignalName::TrendLongExit),
        &snapshot(1.1, None),
    );
    assert_eq!(notification.subject, ALERT_SUBJECT);
    assert_eq!(notification.subject, "Trading Alert");
    assert_eq!(notification.body, "EURUSD=X (1h) → ⚠️ LONG exit (trend continuation)");
}
