//! Configuration validation.
//!
//! Validates every INI field before a run, so the CLI can fail fast with a
//! `ConfigMissing` / `ConfigInvalid` error naming the offending key.

use std::str::FromStr;

use crate::domain::error::TrendtraderError;
use crate::domain::strategy::{MaKind, TriggerMode};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TrendtraderError> {
    validate_data_config(config)?;
    validate_analysis_config(config, None)?;
    validate_strategy_config(config)?;
    validate_backtest_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), TrendtraderError> {
    required_string(config, "data", "source_dir").map(|_| ())
}

/// `ticker_override` stands in for a missing `[analysis] ticker`.
pub fn validate_analysis_config(
    config: &dyn ConfigPort,
    ticker_override: Option<&str>,
) -> Result<(), TrendtraderError> {
    if ticker_override.is_none_or(|t| t.trim().is_empty()) {
        required_string(config, "analysis", "ticker")?;
    }

    let start_date = parse_date(config, "start_date")?;
    let end_date = parse_date(config, "end_date")?;

    if start_date > end_date {
        return Err(invalid(
            "analysis",
            "start_date",
            "start_date must not be after end_date",
        ));
    }
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TrendtraderError> {
    let short = parse_value::<i64>(config, "strategy", "short_window")?.unwrap_or(20);
    if short < 1 {
        return Err(invalid(
            "strategy",
            "short_window",
            "short_window must be at least 1",
        ));
    }

    let long = parse_value::<i64>(config, "strategy", "long_window")?.unwrap_or(50);
    if long < 1 {
        return Err(invalid(
            "strategy",
            "long_window",
            "long_window must be at least 1",
        ));
    }

    let span = parse_value::<i64>(config, "strategy", "ema_span")?.unwrap_or(12);
    if span < 1 {
        return Err(invalid("strategy", "ema_span", "ema_span must be at least 1"));
    }

    parse_value::<MaKind>(config, "strategy", "ma_type")?;
    parse_value::<TriggerMode>(config, "strategy", "trigger")?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TrendtraderError> {
    let capital = parse_value::<f64>(config, "backtest", "initial_capital")?.unwrap_or(10_000.0);
    if !capital.is_finite() || capital <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }

    let risk = parse_value::<f64>(config, "backtest", "risk_per_trade")?.unwrap_or(0.02);
    if risk.is_nan() || risk <= 0.0 || risk > 1.0 {
        return Err(invalid(
            "backtest",
            "risk_per_trade",
            "risk_per_trade must be greater than 0 and at most 1",
        ));
    }
    Ok(())
}

/// Parse an optional key. A present but malformed value is `ConfigInvalid`;
/// an absent or blank one is `Ok(None)`.
pub fn parse_value<T>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, TrendtraderError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match config.get_string(section, key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| invalid(section, key, format!("cannot parse '{}': {}", raw.trim(), e))),
        _ => Ok(None),
    }
}

pub fn required_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, TrendtraderError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(TrendtraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

pub fn parse_date(config: &dyn ConfigPort, field: &str) -> Result<NaiveDate, TrendtraderError> {
    let raw = required_string(config, "analysis", field)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| {
        invalid(
            "analysis",
            field,
            format!("invalid {} format, expected YYYY-MM-DD", field),
        )
    })
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> TrendtraderError {
    TrendtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}
