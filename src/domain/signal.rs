//! Crossover signal generation.
//!
//! A bar is kept only when both moving averages are defined. The signal is
//! LONG when the short line is strictly above the long line, FLAT otherwise.
//! Position changes are the difference of consecutive kept signals; the
//! first kept bar has no predecessor and always reports `None`.

use chrono::NaiveDate;

use crate::domain::indicator::IndicatorSeries;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Long,
    Flat,
}

impl Signal {
    pub fn from_lines(short: f64, long: f64) -> Self {
        if short > long { Signal::Long } else { Signal::Flat }
    }

    /// 1 for LONG, 0 for FLAT.
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Long => 1,
            Signal::Flat => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionChange {
    Enter,
    Exit,
    None,
}

impl PositionChange {
    pub fn between(prev: Signal, curr: Signal) -> Self {
        match (prev, curr) {
            (Signal::Flat, Signal::Long) => PositionChange::Enter,
            (Signal::Long, Signal::Flat) => PositionChange::Exit,
            _ => PositionChange::None,
        }
    }

    /// +1 for ENTER, -1 for EXIT, 0 otherwise.
    pub fn as_i8(self) -> i8 {
        match self {
            PositionChange::Enter => 1,
            PositionChange::Exit => -1,
            PositionChange::None => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub short: f64,
    pub long: f64,
    pub signal: Signal,
    pub change: PositionChange,
}

/// Build the filtered signal sequence. `short` and `long` must be aligned
/// with `bars`.
pub fn generate_signals(
    bars: &[OhlcvBar],
    short: &IndicatorSeries,
    long: &IndicatorSeries,
) -> Vec<SignalPoint> {
    let mut out: Vec<SignalPoint> = Vec::new();

    for (i, bar) in bars.iter().enumerate() {
        let (Some(s), Some(l)) = (short.simple_at(i), long.simple_at(i)) else {
            continue;
        };

        let signal = Signal::from_lines(s, l);
        let change = match out.last() {
            Some(prev) => PositionChange::between(prev.signal, signal),
            None => PositionChange::None,
        };

        out.push(SignalPoint {
            date: bar.date,
            close: bar.close,
            short: s,
            long: l,
            signal,
            change,
        });
    }

    out
}

/// Dates of ENTER transitions (buy markers).
pub fn entry_dates(signals: &[SignalPoint]) -> Vec<NaiveDate> {
    dates_with_change(signals, PositionChange::Enter)
}

/// Dates of EXIT transitions (sell markers).
pub fn exit_dates(signals: &[SignalPoint]) -> Vec<NaiveDate> {
    dates_with_change(signals, PositionChange::Exit)
}

fn dates_with_change(signals: &[SignalPoint], change: PositionChange) -> Vec<NaiveDate> {
    signals
        .iter()
        .filter(|p| p.change == change)
        .map(|p| p.date)
        .collect()
}
