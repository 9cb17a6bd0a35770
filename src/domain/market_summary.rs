//! Headline market figures computed from the raw bars.

use super::indicator::stddev::sample_stddev;
use super::metrics::TRADING_DAYS_PER_YEAR;
use super::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq)]
pub struct MarketSummary {
    pub current_price: f64,
    /// Absolute change versus the previous close.
    pub daily_change: Option<f64>,
    pub daily_change_pct: Option<f64>,
    pub average_volume: f64,
    /// Sample std of close-to-close returns, annualised, in percent.
    pub annualized_volatility_pct: Option<f64>,
}

impl MarketSummary {
    /// `None` for an empty series.
    pub fn from_bars(bars: &[OhlcvBar]) -> Option<Self> {
        let last = bars.last()?;

        let prev_close = bars.len().checked_sub(2).map(|i| bars[i].close);
        let daily_change = prev_close.map(|p| last.close - p);
        let daily_change_pct = prev_close
            .filter(|p| *p != 0.0)
            .map(|p| (last.close - p) / p * 100.0);

        let average_volume = bars.iter().map(|b| b.volume).sum::<f64>() / bars.len() as f64;

        let returns: Vec<f64> = bars
            .windows(2)
            .map(|w| w[1].return_from(w[0].close))
            .collect();
        let annualized_volatility_pct =
            sample_stddev(&returns).map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt() * 100.0);

        Some(MarketSummary {
            current_price: last.close,
            daily_change,
            daily_change_pct,
            average_volume,
            annualized_volatility_pct,
        })
    }
}
