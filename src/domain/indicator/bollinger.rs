//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are invalid; period < 2 is invalid throughout.

use crate::domain::indicator::stddev::window_mean_and_stddev;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV_MULT_X100: u32 = 200;

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let mult = stddev_mult_x100 as f64 / 100.0;

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (valid, upper, middle, lower) = match window_mean_and_stddev(bars, i, period) {
                Some((middle, stddev)) => {
                    (true, middle + mult * stddev, middle, middle - mult * stddev)
                }
                None => (false, 0.0, 0.0, 0.0),
            };
            IndicatorPoint {
                date: bar.date,
                valid,
                value: IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}

pub fn calculate_bollinger_default(bars: &[OhlcvBar]) -> IndicatorSeries {
    calculate_bollinger(bars, DEFAULT_PERIOD, DEFAULT_STDDEV_MULT_X100)
}
