//! Unit tests for timeframe resampling

use swingalert::indicators::resample;
use swingalert::models::{Bar, Timeframe};

use crate::common::{bar_at, hour};

fn hourly(range: std::ops::Range<usize>) -> Vec<Bar> {
    range.map(|i| bar_at(i, 100.0 + i as f64)).collect()
}

#[test]
fn test_resample_full_buckets() {
    let bars = hourly(0..8);
    let out = resample(&bars, Timeframe::H1, Timeframe::H4);

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].timestamp, hour(0));
    assert_eq!(out[0].open, 100.0);
    assert_eq!(out[0].close, 103.0);
    assert_eq!(out[0].high, 103.5);
    assert_eq!(out[0].low, 99.5);
    assert_eq!(out[1].timestamp, hour(4));
}

#[test]
fn test_resample_withholds_trailing_partial_bucket() {
    let out = resample(&hourly(0..10), Timeframe::H1, Timeframe::H4);
    assert_eq!(out.len(), 2);
    assert_eq!(out.last().unwrap().timestamp, hour(4));
}

#[test]
fn test_resample_withholds_leading_partial_bucket() {
    let out = resample(&hourly(1..12), Timeframe::H1, Timeframe::H4);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].timestamp, hour(4));
}

#[test]
fn test_resample_withholds_gap_bucket() {
    let mut bars = hourly(0..12);
    bars.remove(6);
    let out = resample(&bars, Timeframe::H1, Timeframe::H4);
    let stamps: Vec<_> = out.iter().map(|b| b.timestamp).collect();
    assert_eq!(stamps, vec![hour(0), hour(8)]);
}

#[test]
fn test_resample_propagates_anomaly() {
    let mut bars = hourly(0..8);
    bars[5].high = f64::NAN;
    let out = resample(&bars, Timeframe::H1, Timeframe::H4);
    assert!(out[0].is_finite());
    assert!(!out[1].is_finite());
}

#[test]
fn test_resample_same_timeframe_is_identity() {
    let bars = hourly(0..5);
    assert_eq!(resample(&bars, Timeframe::H1, Timeframe::H1), bars);
}
