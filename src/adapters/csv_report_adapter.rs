//! CSV report adapter implementing ReportPort.
//!
//! Writes one file per table into the output directory. Undefined indicator
//! values are written as empty cells.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::domain::analysis::AnalysisReport;
use crate::domain::config_validation::DATE_FORMAT;
use crate::domain::error::TrendtraderError;
use crate::domain::indicator::IndicatorValue;
use crate::ports::report_port::ReportPort;

pub const TRADES_FILE: &str = "trades.csv";
pub const EQUITY_FILE: &str = "equity.csv";
pub const SIGNALS_FILE: &str = "signals.csv";
pub const INDICATORS_FILE: &str = "indicators.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

#[derive(Serialize)]
struct TradeRow {
    date: String,
    side: String,
    price: f64,
    shares: f64,
    value: f64,
}

#[derive(Serialize)]
struct EquityRow {
    date: String,
    close: f64,
    cash: f64,
    shares_held: f64,
    value: f64,
}

#[derive(Serialize)]
struct SignalRow {
    date: String,
    close: f64,
    short_ma: f64,
    long_ma: f64,
    signal: i8,
    position_change: i8,
}

#[derive(Serialize)]
struct IndicatorRow {
    date: String,
    close: f64,
    short_ma: Option<f64>,
    long_ma: Option<f64>,
    ema: Option<f64>,
    rsi: Option<f64>,
    macd: Option<f64>,
    macd_signal: Option<f64>,
    macd_histogram: Option<f64>,
    bb_upper: Option<f64>,
    bb_middle: Option<f64>,
    bb_lower: Option<f64>,
}

#[derive(Serialize)]
struct SummaryRow {
    metric: &'static str,
    value: String,
}

impl CsvReportAdapter {
    pub fn new() -> Self {
        CsvReportAdapter
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        report: &AnalysisReport,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, TrendtraderError> {
        fs::create_dir_all(output_dir).map_err(|e| TrendtraderError::Report {
            reason: format!("failed to create {}: {}", output_dir.display(), e),
        })?;

        let written = vec![
            write_rows(output_dir, TRADES_FILE, trade_rows(report))?,
            write_rows(output_dir, EQUITY_FILE, equity_rows(report))?,
            write_rows(output_dir, SIGNALS_FILE, signal_rows(report))?,
            write_rows(output_dir, INDICATORS_FILE, indicator_rows(report))?,
            write_rows(output_dir, SUMMARY_FILE, summary_rows(report))?,
        ];

        info!(dir = %output_dir.display(), files = written.len(), "report written");
        Ok(written)
    }
}

fn write_rows<T: Serialize>(
    dir: &Path,
    name: &str,
    rows: Vec<T>,
) -> Result<PathBuf, TrendtraderError> {
    let path = dir.join(name);
    let report_err = |e: csv::Error| TrendtraderError::Report {
        reason: format!("failed to write {}: {}", path.display(), e),
    };

    let mut writer = csv::Writer::from_path(&path).map_err(report_err)?;
    for row in rows {
        writer.serialize(row).map_err(report_err)?;
    }
    writer.flush()?;
    Ok(path)
}

fn fmt_date(date: chrono::NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn trade_rows(report: &AnalysisReport) -> Vec<TradeRow> {
    report
        .backtest
        .trades
        .iter()
        .map(|t| TradeRow {
            date: fmt_date(t.date),
            side: t.side.to_string(),
            price: t.price,
            shares: t.shares,
            value: t.notional(),
        })
        .collect()
}

fn equity_rows(report: &AnalysisReport) -> Vec<EquityRow> {
    report
        .backtest
        .equity_curve
        .iter()
        .map(|p| EquityRow {
            date: fmt_date(p.date),
            close: p.close,
            cash: p.cash,
            shares_held: p.shares_held,
            value: p.value,
        })
        .collect()
}

fn signal_rows(report: &AnalysisReport) -> Vec<SignalRow> {
    report
        .signals
        .iter()
        .map(|s| SignalRow {
            date: fmt_date(s.date),
            close: s.close,
            short_ma: s.short,
            long_ma: s.long,
            signal: s.signal.as_i8(),
            position_change: s.change.as_i8(),
        })
        .collect()
}

fn indicator_rows(report: &AnalysisReport) -> Vec<IndicatorRow> {
    let overlay = &report.overlay;

    report
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (macd, macd_signal, macd_histogram) = match overlay.macd.value_at(i) {
                Some(IndicatorValue::Macd {
                    line,
                    signal,
                    histogram,
                }) => (Some(*line), Some(*signal), Some(*histogram)),
                _ => (None, None, None),
            };
            let (bb_upper, bb_middle, bb_lower) = match overlay.bollinger.value_at(i) {
                Some(IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                }) => (Some(*upper), Some(*middle), Some(*lower)),
                _ => (None, None, None),
            };

            IndicatorRow {
                date: fmt_date(bar.date),
                close: bar.close,
                short_ma: overlay.short_ma.simple_at(i),
                long_ma: overlay.long_ma.simple_at(i),
                ema: overlay.ema.simple_at(i),
                rsi: overlay.rsi.simple_at(i),
                macd,
                macd_signal,
                macd_histogram,
                bb_upper,
                bb_middle,
                bb_lower,
            }
        })
        .collect()
}

fn summary_rows(report: &AnalysisReport) -> Vec<SummaryRow> {
    let params = &report.params;
    let m = &report.metrics;

    let mut rows = vec![
        SummaryRow {
            metric: "ticker",
            value: params.ticker.clone(),
        },
        SummaryRow {
            metric: "start_date",
            value: fmt_date(params.start_date),
        },
        SummaryRow {
            metric: "end_date",
            value: fmt_date(params.end_date),
        },
        SummaryRow {
            metric: "short_ma",
            value: report.overlay.short_ma.indicator_type.to_string(),
        },
        SummaryRow {
            metric: "long_ma",
            value: report.overlay.long_ma.indicator_type.to_string(),
        },
        SummaryRow {
            metric: "trigger",
            value: params.strategy.trigger.to_string(),
        },
        SummaryRow {
            metric: "initial_capital",
            value: format!("{:.2}", params.initial_capital),
        },
        SummaryRow {
            metric: "risk_per_trade",
            value: params.risk_per_trade.to_string(),
        },
        SummaryRow {
            metric: "final_value",
            value: format!("{:.2}", m.final_value),
        },
        SummaryRow {
            metric: "total_return_pct",
            value: format!("{:.4}", m.total_return_pct),
        },
        SummaryRow {
            metric: "sharpe_ratio",
            value: format!("{:.4}", m.sharpe_ratio),
        },
        SummaryRow {
            metric: "max_drawdown_pct",
            value: format!("{:.4}", m.max_drawdown_pct),
        },
        SummaryRow {
            metric: "win_rate_pct",
            value: format!("{:.2}", m.win_rate_pct),
        },
        SummaryRow {
            metric: "total_trades",
            value: m.total_trades.to_string(),
        },
        SummaryRow {
            metric: "round_trips",
            value: m.round_trips.to_string(),
        },
        SummaryRow {
            metric: "open_position",
            value: m.open_position.to_string(),
        },
    ];

    if let Some(market) = &report.market {
        let opt = |v: Option<f64>| v.map(|x| format!("{:.4}", x)).unwrap_or_default();
        rows.extend([
            SummaryRow {
                metric: "current_price",
                value: format!("{:.4}", market.current_price),
            },
            SummaryRow {
                metric: "daily_change",
                value: opt(market.daily_change),
            },
            SummaryRow {
                metric: "daily_change_pct",
                value: opt(market.daily_change_pct),
            },
            SummaryRow {
                metric: "average_volume",
                value: format!("{:.2}", market.average_volume),
            },
            SummaryRow {
                metric: "annualized_volatility_pct",
                value: opt(market.annualized_volatility_pct),
            },
        ]);
    }

    rows
}
