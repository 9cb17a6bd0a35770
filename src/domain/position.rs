//! Trade log entries and round-trip pairing.

use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        })
    }
}

/// A single fill. Shares are fractional.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub side: TradeSide,
    pub price: f64,
    pub shares: f64,
    pub date: NaiveDate,
}

impl Trade {
    pub fn notional(&self) -> f64 {
        self.price * self.shares
    }
}

/// A BUY followed by the SELL that closed it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTrip {
    pub entry: Trade,
    pub exit: Trade,
}

impl RoundTrip {
    pub fn is_win(&self) -> bool {
        self.exit.price > self.entry.price
    }
}

/// Pair trades strictly by log order: (0, 1), (2, 3), ... A trailing
/// unmatched BUY is ignored.
pub fn pair_round_trips(trades: &[Trade]) -> Vec<RoundTrip> {
    trades
        .chunks_exact(2)
        .map(|pair| RoundTrip {
            entry: pair[0].clone(),
            exit: pair[1].clone(),
        })
        .collect()
}
