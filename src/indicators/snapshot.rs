//! Per-bar indicator snapshots

use crate::indicators::momentum::{calculate_macd, calculate_rsi, calculate_stochastic};
use crate::indicators::trend::calculate_ema;
use crate::indicators::volatility::calculate_atr;
use crate::models::bar::closes;
use crate::models::{Bar, IndicatorParams, IndicatorSnapshot};

/// Compute one snapshot per bar from the full series.
pub fn compute_snapshots(bars: &[Bar], params: &IndicatorParams) -> Vec<IndicatorSnapshot> {
    let closes = closes(bars);

    let ema_fast = calculate_ema(&closes, params.ema_fast);
    let ema_slow = calculate_ema(&closes, params.ema_slow);
    let rsi = calculate_rsi(&closes, params.rsi);
    let macd = calculate_macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
    let stoch = calculate_stochastic(bars, params.stoch_k, params.stoch_d);
    let atr = calculate_atr(bars, params.atr);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| IndicatorSnapshot {
            timestamp: bar.timestamp,
            close: closes[i],
            ema_fast: ema_fast[i],
            ema_slow: ema_slow[i],
            rsi: rsi[i],
            macd_line: macd.line[i],
            macd_signal: macd.signal[i],
            macd_hist: macd.histogram[i],
            stoch_k: stoch.k[i],
            stoch_d: stoch.d[i],
            atr: atr[i],
        })
        .collect()
}
