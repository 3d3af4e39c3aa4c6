//! Unit tests for shared models

use swingalert::logging::LogFormat;
use swingalert::models::{
    Direction, IndicatorParams, Notification, SeriesKey, SignalKind, SignalName, Strategy,
    Timeframe,
};

#[test]
fn test_timeframe_parsing() {
    assert_eq!("1h".parse::<Timeframe>().unwrap(), Timeframe::H1);
    assert_eq!("60m".parse::<Timeframe>().unwrap(), Timeframe::H1);
    assert_eq!(" 4H ".parse::<Timeframe>().unwrap(), Timeframe::H4);
    assert!("1d".parse::<Timeframe>().is_err());
}

#[test]
fn test_timeframe_resample_factor() {
    assert_eq!(Timeframe::H1.resample_factor(), 1);
    assert_eq!(Timeframe::H4.resample_factor(), 4);
    assert_eq!(Timeframe::H4.native(), Timeframe::H1);
}

#[test]
fn test_strategy_aliases() {
    assert_eq!("macd_rsi".parse::<Strategy>().unwrap(), Strategy::TrendContinuation);
    assert_eq!("stochastic".parse::<Strategy>().unwrap(), Strategy::PullbackReversal);
}

#[test]
fn test_signal_name_parts() {
    let name = SignalName::PullbackShortExit;
    assert_eq!(name.as_str(), "pullback_short_exit");
    assert_eq!(name.strategy(), Strategy::PullbackReversal);
    assert_eq!(name.direction(), Direction::Short);
    assert_eq!(name.kind(), SignalKind::Exit);

    for strategy in [Strategy::TrendContinuation, Strategy::PullbackReversal] {
        assert!(strategy.signals().iter().all(|s| s.strategy() == strategy));
    }
}

#[test]
fn test_series_key_display() {
    assert_eq!(
        SeriesKey::new("EURUSD=X", Timeframe::H4).to_string(),
        "EURUSD=X (4h)"
    );
}

#[test]
fn test_longest_lookback() {
    assert_eq!(IndicatorParams::default().longest_lookback(), 200);
}

#[test]
fn test_connectivity_notification() {
    let notification = Notification::connectivity_test();
    assert!(notification.body.contains("test"));
}

#[test]
fn test_log_format_for_environment() {
    assert_eq!(LogFormat::for_environment("production"), LogFormat::Json);
    assert_eq!(LogFormat::for_environment("prod"), LogFormat::Json);
    assert_eq!(LogFormat::for_environment("development"), LogFormat::Pretty);
}
