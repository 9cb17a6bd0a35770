#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use trendtrader::domain::analysis::AnalysisParams;
use trendtrader::domain::error::TrendtraderError;
pub use trendtrader::domain::ohlcv::OhlcvBar;
use trendtrader::domain::strategy::CrossoverStrategy;
use trendtrader::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    fn check_error(&self, ticker: &str) -> Result<(), TrendtraderError> {
        match self.errors.get(ticker) {
            Some(reason) => Err(TrendtraderError::DataSource {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TrendtraderError> {
        self.check_error(ticker)?;
        Ok(self
            .data
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_tickers(&self) -> Result<Vec<String>, TrendtraderError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendtraderError> {
        self.check_error(ticker)?;
        match self.data.get(ticker) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(ticker: &str, date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        ticker: ticker.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

/// One bar per calendar day starting at `start_date`.
pub fn bars_from_closes(ticker: &str, start_date: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            ticker: ticker.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0 + i as f64,
        })
        .collect()
}

/// Closes rising by 1.0 per bar from `start_price`.
pub fn generate_bars(ticker: &str, start_date: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + i as f64).collect();
    bars_from_closes(ticker, start_date, &closes)
}

pub fn constant_bars(ticker: &str, count: usize, price: f64) -> Vec<OhlcvBar> {
    bars_from_closes(ticker, "2024-01-01", &vec![price; count])
}

/// `flat` bars at `base`, then `rising` bars climbing by 1.0.
pub fn flat_then_rising(ticker: &str, flat: usize, rising: usize, base: f64) -> Vec<OhlcvBar> {
    let mut closes = vec![base; flat];
    closes.extend((1..=rising).map(|i| base + i as f64));
    bars_from_closes(ticker, "2024-01-01", &closes)
}

pub fn sample_params(ticker: &str, short_window: usize, long_window: usize) -> AnalysisParams {
    AnalysisParams {
        ticker: ticker.to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2025, 12, 31),
        strategy: CrossoverStrategy {
            short_window,
            long_window,
            ..Default::default()
        },
        ema_span: 12,
        initial_capital: 10_000.0,
        risk_per_trade: 0.02,
    }
}
