//! Evaluation cycle against an in-memory provider

use std::sync::Arc;

use swingalert::config::Config;
use swingalert::core::{CycleOutcome, CycleStage, EvaluationCycle};
use swingalert::error::DataError;
use swingalert::models::{IndicatorParams, SignalName};
use swingalert::services::{InMemoryMarketDataProvider, NotificationHub};
use swingalert::signals::Insufficient;

use crate::common::{
    bars_from_closes, swing_closes, SWING_LONG_ENTRY, SWING_LONG_EXIT, SWING_SECOND_ENTRY,
};
use crate::test_utils::{
    cycle_with, fast_backoff, provider_with, series_key, test_config, FailingNotifier,
    FlakyProvider, RecordingNotifier,
};

const ENTRY_MESSAGE: &str =
    "EURUSD=X (1h) → 📈 LONG entry (trend continuation) | SL: 125.7500 | TP: 132.5000";
const EXIT_MESSAGE: &str = "EURUSD=X (1h) → ⚠️ LONG exit (trend continuation)";

async fn show_bars_through(provider: &InMemoryMarketDataProvider, index: usize) {
    provider
        .set_bars(series_key(), bars_from_closes(&swing_closes()[..=index]))
        .await;
}

#[tokio::test]
async fn entry_notifies_once_per_true_run() {
    let provider = provider_with(&swing_closes()[..=SWING_LONG_ENTRY]).await;
    let recorder = RecordingNotifier::new();
    let mut cycle = cycle_with(provider.clone(), vec![Box::new(recorder.clone())]);

    let reports = cycle.run_all().await;
    assert_eq!(reports.len(), 1);
    assert!(matches!(
        reports[0].outcome,
        CycleOutcome::Notified {
            failed_deliveries: 0,
            ..
        }
    ));
    assert_eq!(reports[0].events().len(), 1);
    assert_eq!(reports[0].events()[0].signal, SignalName::TrendLongEntry);
    assert_eq!(recorder.bodies(), vec![ENTRY_MESSAGE.to_string()]);

    // same latest bar again
    let report = cycle.run_pair(&series_key()).await;
    assert!(matches!(report.outcome, CycleOutcome::NoSignal));

    // next bar, cross is over
    show_bars_through(&provider, SWING_LONG_ENTRY + 1).await;
    let report = cycle.run_pair(&series_key()).await;
    assert!(matches!(report.outcome, CycleOutcome::NoSignal));

    assert_eq!(recorder.count(), 1);
    assert_eq!(report.bar_count, SWING_LONG_ENTRY + 2);
}

#[tokio::test]
async fn exit_follows_open_entry() {
    let provider = provider_with(&swing_closes()[..=SWING_LONG_ENTRY]).await;
    let recorder = RecordingNotifier::new();
    let mut cycle = cycle_with(provider.clone(), vec![Box::new(recorder.clone())]);

    cycle.run_all().await;
    for index in [SWING_LONG_ENTRY + 1, SWING_LONG_EXIT, SWING_SECOND_ENTRY] {
        show_bars_through(&provider, index).await;
        cycle.run_all().await;
    }

    let bodies = recorder.bodies();
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[0], ENTRY_MESSAGE);
    assert_eq!(bodies[1], EXIT_MESSAGE);
    assert!(bodies[2].starts_with("EURUSD=X (1h) → 📈 LONG entry (trend continuation)"));
}

#[tokio::test]
async fn exit_without_entry_is_silent() {
    let provider = provider_with(&swing_closes()[..=SWING_LONG_EXIT]).await;
    let recorder = RecordingNotifier::new();
    let mut cycle = cycle_with(provider, vec![Box::new(recorder.clone())]);

    let reports = cycle.run_all().await;
    assert!(matches!(reports[0].outcome, CycleOutcome::NoSignal));
    assert_eq!(recorder.count(), 0);
    assert!(cycle
        .tracker()
        .record(&series_key(), SignalName::TrendLongExit)
        .active);
}

#[tokio::test]
async fn fresh_cycles_agree() {
    let closes = &swing_closes()[..=SWING_LONG_ENTRY];
    let mut first = cycle_with(provider_with(closes).await, vec![]);
    let mut second = cycle_with(provider_with(closes).await, vec![]);

    let a = first.run_all().await;
    let b = second.run_all().await;
    assert_eq!(a[0].events(), b[0].events());
    assert_eq!(a[0].events().len(), 1);
}

#[tokio::test]
async fn warm_up_is_not_an_error() {
    let closes: Vec<f64> = (0..199).map(|i| 1.1 + i as f64 * 0.0001).collect();
    let provider = provider_with(&closes).await;
    let recorder = RecordingNotifier::new();
    let config = Config {
        indicators: IndicatorParams::default(),
        ..test_config()
    };
    let hub = NotificationHub::new().with_channel(Box::new(recorder.clone()));
    let mut cycle = EvaluationCycle::new(&config, provider, hub);

    let reports = cycle.run_all().await;
    assert!(matches!(
        reports[0].outcome,
        CycleOutcome::Insufficient(Insufficient::History)
    ));
    assert!(!reports[0].is_failure());
    assert_eq!(reports[0].bar_count, 199);
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn unavailable_data_leaves_state_untouched() {
    let provider = Arc::new(InMemoryMarketDataProvider::new());
    let recorder = RecordingNotifier::new();
    let mut cycle = cycle_with(provider, vec![Box::new(recorder.clone())]);

    let report = cycle.run_pair(&series_key()).await;
    match report.outcome {
        CycleOutcome::Failed { stage, error } => {
            assert_eq!(stage, CycleStage::Fetching);
            assert!(matches!(error, DataError::Empty { .. }));
        }
        other => panic!("expected a failed cycle, got {other:?}"),
    }
    assert!(cycle.series(&series_key()).is_none());
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn fetch_is_retried() {
    let inner = InMemoryMarketDataProvider::new();
    inner
        .set_bars(
            series_key(),
            bars_from_closes(&swing_closes()[..=SWING_LONG_ENTRY]),
        )
        .await;
    let provider = Arc::new(FlakyProvider::new(inner, 2));
    let recorder = RecordingNotifier::new();
    let hub = NotificationHub::new().with_channel(Box::new(recorder.clone()));
    let mut cycle =
        EvaluationCycle::new(&test_config(), provider.clone(), hub).with_backoff(fast_backoff(2));

    let report = cycle.run_pair(&series_key()).await;
    assert!(matches!(report.outcome, CycleOutcome::Notified { .. }));
    assert_eq!(provider.calls(), 3);
    assert_eq!(recorder.count(), 1);
}

#[tokio::test]
async fn retries_are_bounded() {
    let provider = Arc::new(FlakyProvider::new(InMemoryMarketDataProvider::new(), usize::MAX));
    let mut cycle = EvaluationCycle::new(&test_config(), provider.clone(), NotificationHub::new())
        .with_backoff(fast_backoff(1));

    let report = cycle.run_pair(&series_key()).await;
    assert!(report.is_failure());
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn failed_delivery_is_not_retried() {
    let provider = provider_with(&swing_closes()[..=SWING_LONG_ENTRY]).await;
    let recorder = RecordingNotifier::new();
    let mut cycle = cycle_with(
        provider,
        vec![Box::new(FailingNotifier), Box::new(recorder.clone())],
    );

    let report = cycle.run_pair(&series_key()).await;
    assert!(matches!(
        report.outcome,
        CycleOutcome::Notified {
            failed_deliveries: 1,
            ..
        }
    ));
    // other channels still receive it
    assert_eq!(recorder.count(), 1);

    let report = cycle.run_pair(&series_key()).await;
    assert!(matches!(report.outcome, CycleOutcome::NoSignal));
}

#[tokio::test]
async fn alerts_are_logged_without_channels() {
    let provider = provider_with(&swing_closes()[..=SWING_LONG_ENTRY]).await;
    let mut cycle = cycle_with(provider, vec![]);

    let report = cycle.run_pair(&series_key()).await;
    assert_eq!(report.events().len(), 1);
    assert!(cycle.hub().is_empty());
}

#[tokio::test]
async fn series_accumulates_across_cycles() {
    let provider = provider_with(&swing_closes()[..10]).await;
    let mut cycle = cycle_with(provider.clone(), vec![]);
    cycle.run_all().await;

    // the provider only returns the most recent window now
    provider
        .set_bars(series_key(), bars_from_closes(&swing_closes())[5..20].to_vec())
        .await;
    cycle.run_all().await;

    let series = cycle.series(&series_key()).unwrap();
    assert_eq!(series.len(), 20);
    assert!(series
        .bars()
        .windows(2)
        .all(|w| w[0].timestamp < w[1].timestamp));
}
