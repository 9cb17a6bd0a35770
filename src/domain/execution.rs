//! Fill simulation for the single-ticker long-only account.
//!
//! Buys commit `cash * risk_per_trade` at the bar close. Sells liquidate the
//! whole holding at the bar close. No commission or slippage.

use chrono::NaiveDate;

use super::portfolio::Account;
use super::position::{Trade, TradeSide};

/// Buy with a fraction of current cash. Returns `None` without touching the
/// account when already holding or when the price is not a positive number.
pub fn enter_long(
    account: &mut Account,
    price: f64,
    date: NaiveDate,
    risk_per_trade: f64,
) -> Option<Trade> {
    if !account.is_flat() || !price.is_finite() || price <= 0.0 {
        return None;
    }

    let cost = account.cash * risk_per_trade;
    let shares = cost / price;
    if !shares.is_finite() || shares <= 0.0 {
        return None;
    }

    account.cash -= cost;
    account.shares_held += shares;

    Some(Trade {
        side: TradeSide::Buy,
        price,
        shares,
        date,
    })
}

/// Sell every share held. Returns `None` when nothing is held.
pub fn exit_long(account: &mut Account, price: f64, date: NaiveDate) -> Option<Trade> {
    if account.is_flat() {
        return None;
    }

    let shares = account.shares_held;
    account.cash += shares * price;
    account.shares_held = 0.0;

    Some(Trade {
        side: TradeSide::Sell,
        price,
        shares,
        date,
    })
}
