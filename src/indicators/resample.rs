//! Timeframe aggregation of native bars (e.g. 1h → 4h)

use chrono::DateTime;

use crate::models::{Bar, Timeframe};

/// Aggregate ascending `bars` of timeframe `from` into bars of timeframe `to`.
///
/// Buckets are aligned to the UTC epoch. A bucket is emitted only when it holds
/// exactly the expected number of sub-bars; partial buckets, including the trailing
/// one that is still forming, are withheld. A bucket containing an anomalous sub-bar
/// is emitted with NaN prices.
pub fn resample(bars: &[Bar], from: Timeframe, to: Timeframe) -> Vec<Bar> {
    let from_secs = from.duration().num_seconds();
    let to_secs = to.duration().num_seconds();
    if to_secs <= from_secs {
        return bars.to_vec();
    }
    let factor = (to_secs / from_secs) as usize;

    let mut result = Vec::with_capacity(bars.len() / factor + 1);
    let mut group: Vec<&Bar> = Vec::with_capacity(factor);
    let mut current_bucket: Option<i64> = None;

    for bar in bars {
        let bucket = bar.timestamp.timestamp().div_euclid(to_secs) * to_secs;
        if current_bucket != Some(bucket) {
            if let Some(start) = current_bucket {
                result.extend(aggregate(start, &group, factor));
            }
            group.clear();
            current_bucket = Some(bucket);
        }
        group.push(bar);
    }
    if let Some(start) = current_bucket {
        result.extend(aggregate(start, &group, factor));
    }

    result
}

fn aggregate(bucket_start: i64, group: &[&Bar], factor: usize) -> Option<Bar> {
    if group.len() != factor {
        return None;
    }
    let timestamp = DateTime::from_timestamp(bucket_start, 0)?;
    let first = group.first()?;
    let last = group.last()?;
    let volume = group.iter().map(|b| b.volume).sum();

    if group.iter().any(|b| !b.is_finite()) {
        return Some(Bar::new(timestamp, f64::NAN, f64::NAN, f64::NAN, f64::NAN).with_volume(volume));
    }

    let high = group.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = group.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

    Some(Bar::new(timestamp, first.open, high, low, last.close).with_volume(volume))
}
