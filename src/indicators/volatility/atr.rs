//! ATR (Average True Range) indicator

use std::collections::VecDeque;

use crate::indicators::math;
use crate::models::{Bar, Direction};

pub const STOP_LOSS_ATR_MULTIPLIER: f64 = 1.5;
pub const TAKE_PROFIT_ATR_MULTIPLIER: f64 = 3.0;

/// ATR series aligned with `bars`.
///
/// True range starts at the second bar and is averaged with a simple rolling mean
/// over `period` values.
pub fn calculate_atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; bars.len()];
    if period == 0 {
        return result;
    }

    let mut window: VecDeque<f64> = VecDeque::with_capacity(period);
    let mut prev_close: Option<f64> = None;

    for (i, bar) in bars.iter().enumerate() {
        if !bar.is_finite() {
            result[i] = Some(f64::NAN);
            continue;
        }

        if let Some(pc) = prev_close {
            if window.len() == period {
                window.pop_front();
            }
            window.push_back(math::true_range(bar.high, bar.low, pc));
            if window.len() == period {
                result[i] = math::sma(window.make_contiguous());
            }
        }
        prev_close = Some(bar.close);
    }

    result
}

/// Suggested (stop loss, take profit) around `close` for a position in `direction`.
pub fn stop_levels(close: f64, atr: f64, direction: Direction) -> (f64, f64) {
    match direction {
        Direction::Long => (
            close - STOP_LOSS_ATR_MULTIPLIER * atr,
            close + TAKE_PROFIT_ATR_MULTIPLIER * atr,
        ),
        Direction::Short => (
            close + STOP_LOSS_ATR_MULTIPLIER * atr,
            close - TAKE_PROFIT_ATR_MULTIPLIER * atr,
        ),
    }
}
