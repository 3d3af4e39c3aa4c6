//! RSI (Relative Strength Index) indicator
//!
//! RSI = 100 - (100 / (1 + RS))
//! RS = Average Gain / Average Loss, both Wilder-smoothed

/// RSI series aligned with `closes`; first defined at index `period`.
///
/// Averages are seeded with the mean of the first `period` deltas and then smoothed
/// with `avg = (avg * (period - 1) + x) / period`. When none of the last `period`
/// deltas is a loss the value is exactly 100, whatever losses the smoothed average
/// still remembers.
///
/// A non-finite close yields `Some(NaN)` for that bar and the next delta is taken
/// against the last finite close.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 {
        return result;
    }

    let period_f = period as f64;
    let mut prev_close: Option<f64> = None;
    let mut seed_gain = 0.0;
    let mut seed_loss = 0.0;
    let mut seed_count = 0usize;
    let mut averages: Option<(f64, f64)> = None;
    // consecutive deltas without a loss, ending at the current bar
    let mut lossless_run = 0usize;

    for (i, &close) in closes.iter().enumerate() {
        if !close.is_finite() {
            result[i] = Some(f64::NAN);
            continue;
        }

        let Some(prev) = prev_close.replace(close) else { continue };
        let change = close - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        lossless_run = if loss > 0.0 { 0 } else { lossless_run + 1 };

        let (avg_gain, avg_loss) = match averages {
            Some((avg_gain, avg_loss)) => (
                (avg_gain * (period_f - 1.0) + gain) / period_f,
                (avg_loss * (period_f - 1.0) + loss) / period_f,
            ),
            None => {
                seed_gain += gain;
                seed_loss += loss;
                seed_count += 1;
                if seed_count < period {
                    continue;
                }
                (seed_gain / period_f, seed_loss / period_f)
            }
        };
        averages = Some((avg_gain, avg_loss));

        result[i] = Some(if lossless_run >= period {
            100.0
        } else {
            rsi_from_averages(avg_gain, avg_loss)
        });
    }

    result
}

/// RSI from smoothed averages; 100 when there are no losses.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0)
}
