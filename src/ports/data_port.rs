//! Data access port trait.

use crate::domain::error::TrendtraderError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `ticker` with `start_date <= date <= end_date`, sorted by date.
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TrendtraderError>;

    fn list_tickers(&self) -> Result<Vec<String>, TrendtraderError>;

    /// First date, last date and bar count, or `None` when there is no data.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendtraderError>;
}
