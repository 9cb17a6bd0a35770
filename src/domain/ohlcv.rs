//! OHLCV bar representation and series validation.

use chrono::NaiveDate;

use super::error::TrendtraderError;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// Close-to-close simple return against `prev_close`; zero when the
    /// previous close is not positive.
    pub fn return_from(&self, prev_close: f64) -> f64 {
        if prev_close > 0.0 {
            (self.close - prev_close) / prev_close
        } else {
            0.0
        }
    }

    fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ]
    }
}

/// Reject an empty series, a bar with a non-finite or negative field, or
/// dates that are not strictly increasing.
pub fn validate_bars(ticker: &str, bars: &[OhlcvBar]) -> Result<(), TrendtraderError> {
    if bars.is_empty() {
        return Err(TrendtraderError::InsufficientData {
            ticker: ticker.to_string(),
            bars: 0,
            required: 1,
        });
    }

    for (index, bar) in bars.iter().enumerate() {
        if let Some((field, value)) = bar
            .fields()
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(TrendtraderError::InvalidBar {
                ticker: ticker.to_string(),
                index,
                field,
                value,
            });
        }
    }

    for (i, pair) in bars.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            return Err(TrendtraderError::NonMonotonicDates {
                ticker: ticker.to_string(),
                index: i + 1,
                date: pair[1].date,
            });
        }
    }

    Ok(())
}
