//! EMA (Exponential Moving Average) indicator

use crate::indicators::math;

/// EMA series aligned with `values`.
///
/// Seeded with the SMA of the first `period` finite values, so the first defined
/// output sits at index `period - 1` for a clean input. A non-finite input yields
/// `Some(NaN)` at its own index and leaves the recurrence untouched; during warm-up
/// it is not counted toward the seed, so the first defined value moves one bar later.
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let wrapped: Vec<Option<f64>> = values.iter().map(|&v| Some(v)).collect();
    calculate_ema_sparse(&wrapped, period)
}

/// EMA over a series whose leading entries may be undefined (e.g. a MACD line).
///
/// `None` entries are skipped without advancing the warm-up.
pub fn calculate_ema_sparse(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 {
        return result;
    }

    let mut seed = Vec::with_capacity(period);
    let mut prev: Option<f64> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(value) = *value else { continue };

        if !value.is_finite() {
            result[i] = Some(f64::NAN);
            continue;
        }

        match prev {
            Some(p) => {
                let ema = math::ema_from_previous(value, p, period);
                prev = Some(ema);
                result[i] = Some(ema);
            }
            None => {
                seed.push(value);
                if seed.len() == period {
                    prev = math::sma(&seed);
                    result[i] = prev;
                }
            }
        }
    }

    result
}
