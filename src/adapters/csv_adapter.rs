//! CSV file data adapter.
//!
//! Reads one `<TICKER>.csv` per ticker from a directory. The header must
//! name `date,open,high,low,close,volume` (capitalised names are accepted,
//! extra columns are ignored).

use crate::domain::config_validation::DATE_FORMAT;
use crate::domain::error::TrendtraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume")]
    volume: f64,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_all(&self, ticker: &str) -> Result<Vec<OhlcvBar>, TrendtraderError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| TrendtraderError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (line, result) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = result.map_err(|e| TrendtraderError::DataSource {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;

            let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT).map_err(|e| {
                TrendtraderError::DataSource {
                    reason: format!(
                        "{}: invalid date '{}' on data row {}: {}",
                        path.display(),
                        row.date,
                        line + 1,
                        e
                    ),
                }
            })?;

            bars.push(OhlcvBar {
                ticker: ticker.to_string(),
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TrendtraderError> {
        let all = self.read_all(ticker)?;
        let total = all.len();

        let bars: Vec<OhlcvBar> = all
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();

        debug!(
            ticker,
            total,
            kept = bars.len(),
            %start_date,
            %end_date,
            "loaded bars"
        );
        if bars.is_empty() {
            warn!(ticker, %start_date, %end_date, "no bars in requested range");
        }
        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, TrendtraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TrendtraderError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| TrendtraderError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(ticker) = name_str.strip_suffix(".csv") {
                if !ticker.is_empty() {
                    tickers.push(ticker.to_string());
                }
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendtraderError> {
        let bars = self.read_all(ticker)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
