//! trendtrader — moving-average crossover analysis and backtesting.
//!
//! Hexagonal architecture: pure indicator, signal and backtest logic in
//! [`domain`], port traits in [`ports`], concrete implementations in
//! [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
