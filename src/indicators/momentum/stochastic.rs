//! Stochastic oscillator (%K / %D)

use std::collections::VecDeque;

use crate::indicators::math;
use crate::models::Bar;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

/// %K for a close within a high/low range; 50 when the range is flat.
pub fn percent_k(close: f64, lowest_low: f64, highest_high: f64) -> f64 {
    if highest_high == lowest_low {
        return 50.0;
    }
    (100.0 * (close - lowest_low) / (highest_high - lowest_low)).clamp(0.0, 100.0)
}

/// %K over a `k_period` window and %D as the SMA of the last `d_period` %K values.
///
/// Anomalous bars get `Some(NaN)` for both lines and are left out of neighbouring
/// windows and of the %D average.
pub fn calculate_stochastic(bars: &[Bar], k_period: usize, d_period: usize) -> StochasticSeries {
    let mut k = vec![None; bars.len()];
    let mut d = vec![None; bars.len()];
    if k_period == 0 || d_period == 0 {
        return StochasticSeries { k, d };
    }

    let mut recent_k: VecDeque<f64> = VecDeque::with_capacity(d_period);

    for (i, bar) in bars.iter().enumerate() {
        if !bar.is_finite() {
            k[i] = Some(f64::NAN);
            d[i] = Some(f64::NAN);
            continue;
        }
        if i + 1 < k_period {
            continue;
        }

        let (lowest, highest) = bars[i + 1 - k_period..=i]
            .iter()
            .filter(|b| b.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
                (lo.min(b.low), hi.max(b.high))
            });

        let value = percent_k(bar.close, lowest, highest);
        k[i] = Some(value);

        if recent_k.len() == d_period {
            recent_k.pop_front();
        }
        recent_k.push_back(value);
        if recent_k.len() == d_period {
            d[i] = math::sma(recent_k.make_contiguous());
        }
    }

    StochasticSeries { k, d }
}
