//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for trendtrader.
#[derive(Debug, thiserror::Error)]
pub enum TrendtraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("insufficient data for {ticker}: have {bars} usable bars, need {required}")]
    InsufficientData {
        ticker: String,
        bars: usize,
        required: usize,
    },

    #[error("dates for {ticker} are not strictly increasing at bar {index} ({date})")]
    NonMonotonicDates {
        ticker: String,
        index: usize,
        date: NaiveDate,
    },

    #[error("invalid {field} for {ticker} at bar {index}: {value}")]
    InvalidBar {
        ticker: String,
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TrendtraderError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        TrendtraderError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&TrendtraderError> for std::process::ExitCode {
    fn from(err: &TrendtraderError) -> Self {
        let code: u8 = match err {
            TrendtraderError::Io(_) => 1,
            TrendtraderError::ConfigParse { .. }
            | TrendtraderError::ConfigMissing { .. }
            | TrendtraderError::ConfigInvalid { .. } => 2,
            TrendtraderError::DataSource { .. } => 3,
            TrendtraderError::InvalidParameter { .. } => 4,
            TrendtraderError::InsufficientData { .. }
            | TrendtraderError::NonMonotonicDates { .. }
            | TrendtraderError::InvalidBar { .. } => 5,
            TrendtraderError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
