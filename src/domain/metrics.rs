//! Backtest performance metrics.

use super::backtest::BacktestResult;
use super::indicator::stddev::sample_stddev;
use super::portfolio::EquityPoint;
use super::position::pair_round_trips;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub final_value: f64,
    pub total_return_pct: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    pub win_rate_pct: f64,
    pub total_trades: usize,
    pub round_trips: usize,
    pub open_position: bool,
}

impl Metrics {
    pub fn compute(result: &BacktestResult, initial_capital: f64) -> Self {
        let equity_curve = &result.equity_curve;

        let final_value = result.final_value().unwrap_or(initial_capital);

        let total_return_pct = if initial_capital > 0.0 {
            (final_value - initial_capital) / initial_capital * 100.0
        } else {
            0.0
        };

        let trips = pair_round_trips(&result.trades);
        let wins = trips.iter().filter(|t| t.is_win()).count();
        let win_rate_pct = if trips.is_empty() {
            0.0
        } else {
            wins as f64 / trips.len() as f64 * 100.0
        };

        Metrics {
            final_value,
            total_return_pct,
            sharpe_ratio: compute_sharpe(equity_curve),
            max_drawdown_pct: compute_max_drawdown_pct(equity_curve),
            win_rate_pct,
            total_trades: result.trades.len(),
            round_trips: trips.len(),
            open_position: !result.account.is_flat(),
        }
    }
}

/// Per-bar simple returns of the portfolio value. A non-positive previous
/// value contributes a zero return.
pub fn value_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            let prev = w[0].value;
            if prev > 0.0 {
                (w[1].value - prev) / prev
            } else {
                0.0
            }
        })
        .collect()
}

/// Annualised mean / sample std of per-bar returns, no risk-free rate.
fn compute_sharpe(equity_curve: &[EquityPoint]) -> f64 {
    let returns = value_returns(equity_curve);
    let Some(stddev) = sample_stddev(&returns) else {
        return 0.0;
    };
    if stddev <= 0.0 || !stddev.is_finite() {
        return 0.0;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
}

fn compute_max_drawdown_pct(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.value > peak {
            peak = point.value;
        } else if peak > 0.0 {
            let dd = (peak - point.value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd * 100.0
}
