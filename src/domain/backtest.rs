//! Backtest replay loop.
//!
//! Walks the retained signal rows in date order, acting on the close of
//! each bar, and records one equity point per row.

use tracing::debug;

use super::execution::{enter_long, exit_long};
use super::portfolio::{Account, EquityPoint};
use super::position::Trade;
use super::signal::{PositionChange, Signal, SignalPoint};
use super::strategy::TriggerMode;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub risk_per_trade: f64,
    pub trigger: TriggerMode,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 10_000.0,
            risk_per_trade: 0.02,
            trigger: TriggerMode::Level,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    /// Account state after the last bar.
    pub account: Account,
}

impl BacktestResult {
    pub fn final_value(&self) -> Option<f64> {
        self.equity_curve.last().map(|p| p.value)
    }
}

pub fn run_backtest(signals: &[SignalPoint], config: &BacktestConfig) -> BacktestResult {
    let mut account = Account::new(config.initial_capital);
    let mut trades = Vec::new();
    let mut equity_curve = Vec::with_capacity(signals.len());

    for point in signals {
        let (wants_buy, wants_sell) = match config.trigger {
            TriggerMode::Level => (point.signal == Signal::Long, point.signal == Signal::Flat),
            TriggerMode::Crossover => (
                point.change == PositionChange::Enter,
                point.change == PositionChange::Exit,
            ),
        };

        let fill = if wants_buy {
            enter_long(&mut account, point.close, point.date, config.risk_per_trade)
        } else if wants_sell {
            exit_long(&mut account, point.close, point.date)
        } else {
            None
        };

        if let Some(trade) = fill {
            debug!(
                date = %trade.date,
                side = %trade.side,
                price = trade.price,
                shares = trade.shares,
                "fill"
            );
            trades.push(trade);
        }

        equity_curve.push(account.snapshot(point.date, point.close));
    }

    BacktestResult {
        trades,
        equity_curve,
        account,
    }
}
