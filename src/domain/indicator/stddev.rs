//! Standard Deviation indicator.
//!
//! Sample standard deviation (divides by n-1) over n closing prices.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / (n - 1))
//! Warmup: first (n-1) bars are invalid. n < 2 leaves every bar invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_stddev(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match window_mean_and_stddev(bars, i, period) {
            Some((_, stddev)) => IndicatorPoint::simple(bar.date, stddev),
            None => IndicatorPoint::invalid_simple(bar.date),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}

/// Mean and sample standard deviation of the `period` closes ending at `index`.
pub(crate) fn window_mean_and_stddev(
    bars: &[OhlcvBar],
    index: usize,
    period: usize,
) -> Option<(f64, f64)> {
    if period < 2 || index + 1 < period || index >= bars.len() {
        return None;
    }

    let window = &bars[index + 1 - period..=index];
    let mean = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
    let variance = window
        .iter()
        .map(|b| {
            let diff = b.close - mean;
            diff * diff
        })
        .sum::<f64>()
        / (period - 1) as f64;

    Some((mean, variance.sqrt()))
}

/// Sample standard deviation of a slice; `None` with fewer than two values.
pub(crate) fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}
