//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{
    AnalysisParams, AnalysisReport, DEFAULT_EMA_SPAN, DEFAULT_INITIAL_CAPITAL,
    DEFAULT_RISK_PER_TRADE, IndicatorOverlay, run_analysis,
};
use crate::domain::config_validation::{
    parse_date, parse_value, required_string, validate_analysis_config, validate_backtest_config,
    validate_config, validate_data_config, validate_strategy_config,
};
use crate::domain::error::TrendtraderError;
use crate::domain::signal::{entry_dates, exit_dates};
use crate::domain::strategy::CrossoverStrategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

/// Number of most recent trades shown in the console summary.
const RECENT_TRADES: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "trendtrader", about = "Moving-average crossover analysis and backtester")]
pub struct Cli {
    /// Log filter, e.g. `info` or `trendtrader=debug` (RUST_LOG wins)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run indicators, signals and the backtest for one ticker
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        /// Directory for the CSV export (defaults to [report] output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range for a ticker
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// List tickers available in the data directory
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            ticker,
            output,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, ticker.as_deref())
            } else {
                run_analyze(&config, ticker.as_deref(), output.as_deref())
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
        Command::ListTickers { config } => run_list_tickers(&config),
    }
}

fn fail(err: &TrendtraderError) -> ExitCode {
    debug!(?err, "command failed");
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

pub fn resolve_ticker(ticker_override: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    ticker_override
        .map(str::to_string)
        .or_else(|| config.get_string("analysis", "ticker"))
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
}

pub fn build_analysis_params(
    config: &dyn ConfigPort,
    ticker_override: Option<&str>,
) -> Result<AnalysisParams, TrendtraderError> {
    validate_analysis_config(config, ticker_override)?;
    validate_strategy_config(config)?;
    validate_backtest_config(config)?;

    let ticker =
        resolve_ticker(ticker_override, config).ok_or_else(|| TrendtraderError::ConfigMissing {
            section: "analysis".into(),
            key: "ticker".into(),
        })?;

    let defaults = CrossoverStrategy::default();
    let window = |key: &str, default: usize| -> Result<usize, TrendtraderError> {
        Ok(parse_value::<usize>(config, "strategy", key)?.unwrap_or(default))
    };

    let strategy = CrossoverStrategy {
        short_window: window("short_window", defaults.short_window)?,
        long_window: window("long_window", defaults.long_window)?,
        ma_kind: parse_value(config, "strategy", "ma_type")?.unwrap_or(defaults.ma_kind),
        trigger: parse_value(config, "strategy", "trigger")?.unwrap_or(defaults.trigger),
    };

    Ok(AnalysisParams {
        ticker,
        start_date: parse_date(config, "start_date")?,
        end_date: parse_date(config, "end_date")?,
        strategy,
        ema_span: window("ema_span", DEFAULT_EMA_SPAN)?,
        initial_capital: parse_value(config, "backtest", "initial_capital")?
            .unwrap_or(DEFAULT_INITIAL_CAPITAL),
        risk_per_trade: parse_value(config, "backtest", "risk_per_trade")?
            .unwrap_or(DEFAULT_RISK_PER_TRADE),
    })
}

pub fn build_data_port(config: &dyn ConfigPort) -> Result<CsvAdapter, TrendtraderError> {
    validate_data_config(config)?;
    let dir = required_string(config, "data", "source_dir")?;
    Ok(CsvAdapter::new(PathBuf::from(dir)))
}

fn run_analyze(config_path: &Path, ticker: Option<&str>, output: Option<&Path>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let params = match build_analysis_params(&adapter, ticker) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let data_port = match build_data_port(&adapter) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };

    let output_dir = output
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string("report", "output_dir").map(PathBuf::from));

    run_analysis_pipeline(
        &data_port,
        &CsvReportAdapter::new(),
        &params,
        output_dir.as_deref(),
    )
}

/// Fetch, analyse, print the console summary and optionally export.
pub fn run_analysis_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    params: &AnalysisParams,
    output_dir: Option<&Path>,
) -> ExitCode {
    info!(
        ticker = %params.ticker,
        start = %params.start_date,
        end = %params.end_date,
        "fetching bars"
    );
    let bars = match data_port.fetch_bars(&params.ticker, params.start_date, params.end_date) {
        Ok(b) => b,
        Err(e) => return fail(&e),
    };

    eprintln!(
        "Analyzing {}: {} bars, {} to {}",
        params.ticker,
        bars.len(),
        params.start_date,
        params.end_date
    );

    let report = match run_analysis(&bars, params) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    print_summary(&report);

    if let Some(dir) = output_dir {
        match report_port.write(&report, dir) {
            Ok(files) => {
                eprintln!("\nReport written to: {}", dir.display());
                for f in &files {
                    eprintln!("  {}", f.display());
                }
            }
            Err(e) => return fail(&e),
        }
    }

    ExitCode::SUCCESS
}

pub fn print_summary(report: &AnalysisReport) {
    let params = &report.params;
    let m = &report.metrics;

    if let Some(market) = &report.market {
        eprintln!("\n=== Key Metrics: {} ===", params.ticker);
        eprintln!("Current Price:    {:.2}", market.current_price);
        match (market.daily_change, market.daily_change_pct) {
            (Some(change), Some(pct)) => {
                eprintln!("Daily Change:     {:+.2} ({:+.2}%)", change, pct)
            }
            (Some(change), None) => eprintln!("Daily Change:     {:+.2}", change),
            _ => eprintln!("Daily Change:     n/a"),
        }
        eprintln!("Avg Volume:       {:.0}", market.average_volume);
        match market.annualized_volatility_pct {
            Some(v) => eprintln!("Volatility (ann): {:.2}%", v),
            None => eprintln!("Volatility (ann): n/a"),
        }
    }

    eprintln!(
        "\n=== Backtest: {} / {} ({} trigger) ===",
        report.overlay.short_ma.indicator_type,
        report.overlay.long_ma.indicator_type,
        params.strategy.trigger
    );
    eprintln!("Initial Capital:  {:.2}", params.initial_capital);
    eprintln!("Final Value:      {:.2}", m.final_value);
    eprintln!("Total Return:     {:.2}%", m.total_return_pct);
    eprintln!("Sharpe Ratio:     {:.2}", m.sharpe_ratio);
    eprintln!("Max Drawdown:     -{:.2}%", m.max_drawdown_pct);
    eprintln!("Win Rate:         {:.1}%", m.win_rate_pct);
    eprintln!(
        "Total Trades:     {} ({} round trips{})",
        m.total_trades,
        m.round_trips,
        if m.open_position { ", position open" } else { "" }
    );
    eprintln!(
        "Crossovers:       {} buy / {} sell",
        entry_dates(&report.signals).len(),
        exit_dates(&report.signals).len()
    );

    let trades = &report.backtest.trades;
    if !trades.is_empty() {
        eprintln!("\n=== Recent Trades ===");
        for t in trades.iter().skip(trades.len().saturating_sub(RECENT_TRADES)) {
            eprintln!(
                "  {}  {:<4}  {:>10.2} x {:>12.4} = {:>12.2}",
                t.date,
                t.side,
                t.price,
                t.shares,
                t.notional()
            );
        }
    }
}

pub fn run_dry_run(config_path: &Path, ticker: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_data_config(&adapter) {
        return fail(&e);
    }
    let params = match build_analysis_params(&adapter, ticker) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    if let Err(e) = crate::domain::analysis::validate_params(&params) {
        return fail(&e);
    }
    eprintln!("Config validated successfully");

    eprintln!("\nAnalysis:");
    eprintln!("  ticker:          {}", params.ticker);
    eprintln!("  range:           {} to {}", params.start_date, params.end_date);
    eprintln!("  trigger:         {}", params.strategy.trigger);
    eprintln!("  initial_capital: {:.2}", params.initial_capital);
    eprintln!("  risk_per_trade:  {}", params.risk_per_trade);

    let overlay = IndicatorOverlay::compute(&[], &params);
    eprintln!("\nIndicators to compute:");
    for series in overlay.series() {
        eprintln!("  {}", series.indicator_type);
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        return fail(&e);
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, ticker: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let Some(ticker) = resolve_ticker(ticker, &adapter) else {
        return fail(&TrendtraderError::ConfigMissing {
            section: "analysis".into(),
            key: "ticker".into(),
        });
    };

    let data_port = match build_data_port(&adapter) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };

    match data_port.get_data_range(&ticker) {
        Ok(Some((first, last, count))) => {
            println!("{}: {} bars, {} to {}", ticker, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", ticker);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_list_tickers(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let data_port = match build_data_port(&adapter) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };

    let tickers = match data_port.list_tickers() {
        Ok(t) => t,
        Err(e) => return fail(&e),
    };

    if tickers.is_empty() {
        eprintln!("No tickers found");
    } else {
        for t in &tickers {
            println!("{}", t);
        }
        eprintln!("{} tickers found", tickers.len());
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::{MaKind, TriggerMode};

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "trendtrader",
            "--log-level",
            "debug",
            "analyze",
            "-c",
            "cfg.ini",
            "--ticker",
            "msft",
            "-o",
            "out",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(!cli.log_json);
        match cli.command {
            Command::Analyze {
                config,
                ticker,
                output,
                dry_run,
            } => {
                assert_eq!(config, PathBuf::from("cfg.ini"));
                assert_eq!(ticker.as_deref(), Some("msft"));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(dry_run);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["trendtrader", "list-tickers", "-c", "x.ini", "--log-json"])
            .unwrap();
        assert!(cli.log_json);
        assert_eq!(cli.log_level, "info");
        assert!(matches!(cli.command, Command::ListTickers { .. }));
    }

    #[test]
    fn cli_requires_config() {
        assert!(Cli::try_parse_from(["trendtrader", "validate"]).is_err());
    }

    #[test]
    fn resolve_ticker_prefers_override() {
        let c = config("[analysis]\nticker = aapl\n");
        assert_eq!(resolve_ticker(None, &c), Some("AAPL".to_string()));
        assert_eq!(resolve_ticker(Some(" msft "), &c), Some("MSFT".to_string()));
        assert_eq!(resolve_ticker(None, &config("[analysis]\n")), None);
    }

    #[test]
    fn build_params_with_defaults() {
        let c = config("[analysis]\nticker = AAPL\nstart_date = 2023-01-01\nend_date = 2023-12-31\n");
        let p = build_analysis_params(&c, None).unwrap();
        assert_eq!(p.ticker, "AAPL");
        assert_eq!(p.strategy, CrossoverStrategy::default());
        assert_eq!(p.ema_span, 12);
        assert_eq!(p.initial_capital, 10_000.0);
        assert_eq!(p.risk_per_trade, 0.02);
    }

    #[test]
    fn build_params_reads_all_sections() {
        let c = config(
            "[analysis]\nticker = AAPL\nstart_date = 2023-01-01\nend_date = 2023-12-31\n\
             [strategy]\nshort_window = 5\nlong_window = 15\nma_type = ema\ntrigger = crossover\nema_span = 9\n\
             [backtest]\ninitial_capital = 2500\nrisk_per_trade = 0.1\n",
        );
        let p = build_analysis_params(&c, Some("spy")).unwrap();
        assert_eq!(p.ticker, "SPY");
        assert_eq!(p.strategy.short_window, 5);
        assert_eq!(p.strategy.long_window, 15);
        assert_eq!(p.strategy.ma_kind, MaKind::Ema);
        assert_eq!(p.strategy.trigger, TriggerMode::Crossover);
        assert_eq!(p.ema_span, 9);
        assert_eq!(p.initial_capital, 2500.0);
        assert_eq!(p.risk_per_trade, 0.1);
    }

    #[test]
    fn build_params_rejects_bad_risk() {
        let c = config(
            "[analysis]\nticker = AAPL\nstart_date = 2023-01-01\nend_date = 2023-12-31\n\
             [backtest]\nrisk_per_trade = 2\n",
        );
        let err = build_analysis_params(&c, None).unwrap_err();
        assert!(matches!(err, TrendtraderError::ConfigInvalid { key, .. } if key == "risk_per_trade"));
    }

    #[test]
    fn build_data_port_requires_source_dir() {
        let err = build_data_port(&config("[data]\n")).err().unwrap();
        assert!(matches!(err, TrendtraderError::ConfigMissing { key, .. } if key == "source_dir"));
    }
}
