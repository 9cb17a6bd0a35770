//! Account state and equity tracking.

use chrono::NaiveDate;

/// Cash plus a single long holding. `shares_held` never goes negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub cash: f64,
    pub shares_held: f64,
}

impl Account {
    pub fn new(initial_capital: f64) -> Self {
        Account {
            cash: initial_capital,
            shares_held: 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.shares_held == 0.0
    }

    pub fn value(&self, price: f64) -> f64 {
        self.cash + self.shares_held * price
    }

    pub fn snapshot(&self, date: NaiveDate, close: f64) -> EquityPoint {
        EquityPoint {
            date,
            close,
            cash: self.cash,
            shares_held: self.shares_held,
            value: self.value(close),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub cash: f64,
    pub shares_held: f64,
    pub value: f64,
}
