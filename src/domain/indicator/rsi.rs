//! RSI (Relative Strength Index) indicator.
//!
//! Average gain/loss are trailing simple means over the last n price
//! changes (not Wilder's recursive smoothing). The first bar has no prior
//! close, so its change counts as zero:
//!
//! - gain[i] = max(C[i] - C[i-1], 0), loss[i] = max(C[i-1] - C[i], 0), gain[0] = loss[0] = 0
//! - RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! - If avg_loss == 0: RSI = 100
//!
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut gains = Vec::with_capacity(bars.len());
    let mut losses = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let change = if i == 0 { 0.0 } else { bar.close - bars[i - 1].close };
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if period == 0 || i + 1 < period {
            values.push(IndicatorPoint::invalid_simple(bar.date));
            continue;
        }

        let start = i + 1 - period;
        let avg_gain = gains[start..=i].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[start..=i].iter().sum::<f64>() / period as f64;
        values.push(IndicatorPoint::simple(bar.date, rsi_from_averages(avg_gain, avg_loss)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
