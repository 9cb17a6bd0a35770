//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No warmup: every bar is valid, unlike SMA. n = 0 leaves every bar invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = if period == 0 {
        bars.iter()
            .map(|b| IndicatorPoint::invalid_simple(b.date))
            .collect()
    } else {
        ema_values(&closes, period)
            .into_iter()
            .zip(bars)
            .map(|(v, b)| IndicatorPoint::simple(b.date, v))
            .collect()
    };

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

/// Recursive EMA over raw values, seeded with the first input.
pub(crate) fn ema_values(input: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(input.len());
    let mut ema = 0.0;

    for (i, &x) in input.iter().enumerate() {
        ema = if i == 0 { x } else { x * k + ema * (1.0 - k) };
        out.push(ema);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;

    #[test]
    fn ema_valid_from_first_bar() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_ema(&bars, 3);

        assert_eq!(series.len(), 5);
        assert!(series.values.iter().all(|p| p.valid));
        assert_eq!(series.warmup_len(), 0);
    }

    #[test]
    fn ema_seed_is_first_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 3);
        assert_eq!(series.simple_at(0), Some(10.0));
    }

    #[test]
    fn ema_recursive_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_ema(&bars, 3);

        let k = 2.0 / 4.0;
        let e1 = 20.0 * k + 10.0 * (1.0 - k);
        let e2 = 30.0 * k + e1 * (1.0 - k);
        let e3 = 40.0 * k + e2 * (1.0 - k);

        assert!((series.simple_at(1).unwrap() - e1).abs() < 1e-12);
        assert!((series.simple_at(2).unwrap() - e2).abs() < 1e-12);
        assert!((series.simple_at(3).unwrap() - e3).abs() < 1e-12);
    }

    #[test]
    fn ema_period_1_tracks_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 1);

        assert_eq!(series.simple_at(1), Some(20.0));
        assert_eq!(series.simple_at(2), Some(30.0));
    }

    #[test]
    fn ema_converges_toward_constant_input() {
        let mut prices = vec![50.0];
        prices.extend(std::iter::repeat_n(100.0, 60));
        let bars = make_bars(&prices);
        let series = calculate_ema(&bars, 10);

        let mut prev_gap = f64::INFINITY;
        for i in 1..series.len() {
            let gap = (100.0 - series.simple_at(i).unwrap()).abs();
            assert!(gap < prev_gap, "gap should shrink at bar {}", i);
            prev_gap = gap;
        }
        assert!(prev_gap < 0.01);
    }

    #[test]
    fn ema_equal_prices() {
        let bars = make_bars(&[100.0; 5]);
        let series = calculate_ema(&bars, 3);

        for i in 0..5 {
            assert!((series.simple_at(i).unwrap() - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_empty_bars() {
        let series = calculate_ema(&[], 3);
        assert!(series.is_empty());
    }

    #[test]
    fn ema_period_0() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_ema(&bars, 0);
        assert_eq!(series.len(), 2);
        assert!(series.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn ema_indicator_type() {
        let bars = make_bars(&[10.0]);
        assert_eq!(calculate_ema(&bars, 5).indicator_type, IndicatorType::Ema(5));
    }
}
