//! Moving-average crossover strategy parameters.

use std::fmt;
use std::str::FromStr;

use crate::domain::indicator::IndicatorType;

/// Which moving average forms the crossover lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaKind {
    #[default]
    Sma,
    Ema,
}

/// When the backtester opens and closes its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerMode {
    /// Buy while the signal is LONG and nothing is held; sell while it is FLAT
    /// and shares are held.
    #[default]
    Level,
    /// Buy only on an ENTER transition, sell only on an EXIT transition.
    Crossover,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverStrategy {
    pub short_window: usize,
    pub long_window: usize,
    pub ma_kind: MaKind,
    pub trigger: TriggerMode,
}

impl Default for CrossoverStrategy {
    fn default() -> Self {
        CrossoverStrategy {
            short_window: 20,
            long_window: 50,
            ma_kind: MaKind::Sma,
            trigger: TriggerMode::Level,
        }
    }
}

impl CrossoverStrategy {
    pub fn short_indicator(&self) -> IndicatorType {
        self.ma_kind.indicator(self.short_window)
    }

    pub fn long_indicator(&self) -> IndicatorType {
        self.ma_kind.indicator(self.long_window)
    }

    /// Bars needed before both lines are defined.
    pub fn warmup_bars(&self) -> usize {
        match self.ma_kind {
            MaKind::Sma => self.short_window.max(self.long_window),
            MaKind::Ema => 1,
        }
    }
}

impl MaKind {
    pub fn indicator(self, window: usize) -> IndicatorType {
        match self {
            MaKind::Sma => IndicatorType::Sma(window),
            MaKind::Ema => IndicatorType::Ema(window),
        }
    }
}

impl FromStr for MaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sma" => Ok(MaKind::Sma),
            "ema" => Ok(MaKind::Ema),
            other => Err(format!("unknown moving average type '{}' (expected sma or ema)", other)),
        }
    }
}

impl fmt::Display for MaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaKind::Sma => write!(f, "sma"),
            MaKind::Ema => write!(f, "ema"),
        }
    }
}

impl FromStr for TriggerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "level" => Ok(TriggerMode::Level),
            "crossover" => Ok(TriggerMode::Crossover),
            other => Err(format!("unknown trigger '{}' (expected level or crossover)", other)),
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerMode::Level => write!(f, "level"),
            TriggerMode::Crossover => write!(f, "crossover"),
        }
    }
}
