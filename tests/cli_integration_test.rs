//! CLI integration tests for the analyze/validate/info/list-tickers commands.
//!
//! Tests cover:
//! - Config parsing into analysis parameters
//! - Dry-run mode with real INI files on disk
//! - Full analyze runs against a CSV data directory, with CSV export
//! - Exit codes for config, data and insufficient-data failures

mod common;

use common::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::TempDir;
use trendtrader::adapters::file_config_adapter::FileConfigAdapter;
use trendtrader::cli::{self, Cli, Command};
use trendtrader::domain::error::TrendtraderError;
use trendtrader::domain::strategy::{MaKind, TriggerMode};

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn write_csv(dir: &Path, ticker: &str, bars: &[OhlcvBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    fs::write(dir.join(format!("{}.csv", ticker)), content).unwrap();
}

fn ini_for(data_dir: &Path, ticker: &str, extra: &str) -> String {
    format!(
        "[data]\nsource_dir = {}\n\n\
         [analysis]\nticker = {}\nstart_date = 2024-01-01\nend_date = 2024-12-31\n\n\
         [strategy]\nshort_window = 3\nlong_window = 5\n\n\
         [backtest]\ninitial_capital = 10000\nrisk_per_trade = 0.02\n\n{}",
        data_dir.display(),
        ticker,
        extra
    )
}

fn same_code(a: ExitCode, b: ExitCode) -> bool {
    format!("{:?}", a) == format!("{:?}", b)
}

fn cli_with(command: Command) -> Cli {
    Cli {
        log_level: "warn".to_string(),
        log_json: false,
        command,
    }
}

fn analyze(config: &Path, ticker: Option<&str>, output: Option<PathBuf>, dry_run: bool) -> ExitCode {
    cli::run(cli_with(Command::Analyze {
        config: config.to_path_buf(),
        ticker: ticker.map(String::from),
        output,
        dry_run,
    }))
}

const VALID_INI: &str = r#"
[data]
source_dir = ./data

[analysis]
ticker = aapl
start_date = 2020-01-01
end_date = 2024-12-31

[strategy]
short_window = 20
long_window = 50
ma_type = sma
trigger = crossover
ema_span = 12

[backtest]
initial_capital = 10000.0
risk_per_trade = 0.05

[report]
output_dir = reports
"#;

mod config_loading {
    use super::*;

    #[test]
    fn build_params_valid_full() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let params = cli::build_analysis_params(&adapter, None).unwrap();

        assert_eq!(params.ticker, "AAPL");
        assert_eq!(params.start_date, date(2020, 1, 1));
        assert_eq!(params.end_date, date(2024, 12, 31));
        assert_eq!(params.strategy.short_window, 20);
        assert_eq!(params.strategy.long_window, 50);
        assert_eq!(params.strategy.ma_kind, MaKind::Sma);
        assert_eq!(params.strategy.trigger, TriggerMode::Crossover);
        assert!((params.risk_per_trade - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn build_params_missing_dates() {
        let adapter = FileConfigAdapter::from_string("[analysis]\nticker = AAPL\n").unwrap();
        let err = cli::build_analysis_params(&adapter, None).unwrap_err();
        assert!(matches!(err, TrendtraderError::ConfigMissing { key, .. } if key == "start_date"));
    }

    #[test]
    fn build_params_malformed_number() {
        let ini = VALID_INI.replace("initial_capital = 10000.0", "initial_capital = lots");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let err = cli::build_analysis_params(&adapter, None).unwrap_err();
        assert!(
            matches!(err, TrendtraderError::ConfigInvalid { key, .. } if key == "initial_capital")
        );
    }

    #[test]
    fn build_data_port_uses_source_dir() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        assert!(cli::build_data_port(&adapter).is_ok());
    }
}

mod dry_run {
    use super::*;

    #[test]
    fn valid_config_succeeds() {
        let file = write_temp_ini(VALID_INI);
        assert!(same_code(
            analyze(file.path(), None, None, true),
            ExitCode::SUCCESS
        ));
    }

    #[test]
    fn ticker_override_fills_missing_ticker() {
        let ini = VALID_INI.replace("ticker = aapl\n", "");
        let file = write_temp_ini(&ini);
        assert!(same_code(
            analyze(file.path(), None, None, true),
            ExitCode::from(2)
        ));
        assert!(same_code(
            analyze(file.path(), Some("msft"), None, true),
            ExitCode::SUCCESS
        ));
    }

    #[test]
    fn invalid_trigger_is_config_error() {
        let ini = VALID_INI.replace("trigger = crossover", "trigger = sometimes");
        let file = write_temp_ini(&ini);
        assert!(same_code(
            analyze(file.path(), None, None, true),
            ExitCode::from(2)
        ));
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let code = analyze(Path::new("/nonexistent/trendtrader.ini"), None, None, true);
        assert!(same_code(code, ExitCode::from(2)));
    }
}

mod analyze_command {
    use super::*;

    #[test]
    fn full_run_writes_csv_report() {
        let data = TempDir::new().unwrap();
        write_csv(data.path(), "UP", &flat_then_rising("UP", 10, 20, 100.0));
        let out = TempDir::new().unwrap();
        let out_dir = out.path().join("report");

        let file = write_temp_ini(&ini_for(data.path(), "UP", ""));
        let code = analyze(file.path(), None, Some(out_dir.clone()), false);
        assert!(same_code(code, ExitCode::SUCCESS));

        for name in ["trades.csv", "equity.csv", "signals.csv", "indicators.csv", "summary.csv"] {
            assert!(out_dir.join(name).exists(), "{} not written", name);
        }

        let trades = fs::read_to_string(out_dir.join("trades.csv")).unwrap();
        let lines: Vec<&str> = trades.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("BUY"));
        assert!(lines[1].starts_with("2024-01-11"));
    }

    #[test]
    fn output_dir_from_config() {
        let data = TempDir::new().unwrap();
        write_csv(data.path(), "UP", &flat_then_rising("UP", 10, 20, 100.0));
        let out = TempDir::new().unwrap();
        let extra = format!("[report]\noutput_dir = {}\n", out.path().display());

        let file = write_temp_ini(&ini_for(data.path(), "UP", &extra));
        assert!(same_code(
            analyze(file.path(), None, None, false),
            ExitCode::SUCCESS
        ));
        assert!(out.path().join("summary.csv").exists());
    }

    #[test]
    fn date_range_limits_bars() {
        let data = TempDir::new().unwrap();
        write_csv(data.path(), "UP", &flat_then_rising("UP", 10, 20, 100.0));
        let ini = ini_for(data.path(), "UP", "").replace("end_date = 2024-12-31", "end_date = 2024-01-03");

        let file = write_temp_ini(&ini);
        // three bars cannot fill a 5-bar window
        assert!(same_code(
            analyze(file.path(), None, None, false),
            ExitCode::from(5)
        ));
    }

    #[test]
    fn nan_cell_in_data_file_is_invalid_data() {
        let data = TempDir::new().unwrap();
        let mut bars = flat_then_rising("GAP", 10, 20, 100.0);
        bars[20].close = f64::NAN;
        write_csv(data.path(), "GAP", &bars);

        let file = write_temp_ini(&ini_for(data.path(), "GAP", ""));
        assert!(same_code(
            analyze(file.path(), None, None, false),
            ExitCode::from(5)
        ));
    }

    #[test]
    fn missing_data_file_is_data_error() {
        let data = TempDir::new().unwrap();
        let file = write_temp_ini(&ini_for(data.path(), "GHOST", ""));
        assert!(same_code(
            analyze(file.path(), None, None, false),
            ExitCode::from(3)
        ));
    }

    #[test]
    fn ticker_override_selects_file() {
        let data = TempDir::new().unwrap();
        write_csv(data.path(), "MSFT", &generate_bars("MSFT", "2024-02-01", 30, 50.0));
        let file = write_temp_ini(&ini_for(data.path(), "AAPL", ""));
        assert!(same_code(
            analyze(file.path(), Some("msft"), None, false),
            ExitCode::SUCCESS
        ));
    }
}

mod other_commands {
    use super::*;

    #[test]
    fn validate_accepts_valid_config() {
        let file = write_temp_ini(VALID_INI);
        let code = cli::run(cli_with(Command::Validate {
            config: file.path().to_path_buf(),
        }));
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn validate_rejects_bad_risk() {
        let file = write_temp_ini(&VALID_INI.replace("risk_per_trade = 0.05", "risk_per_trade = 3"));
        let code = cli::run(cli_with(Command::Validate {
            config: file.path().to_path_buf(),
        }));
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn info_and_list_tickers() {
        let data = TempDir::new().unwrap();
        write_csv(data.path(), "AAA", &generate_bars("AAA", "2024-01-01", 5, 10.0));
        write_csv(data.path(), "BBB", &generate_bars("BBB", "2024-01-01", 3, 10.0));
        let file = write_temp_ini(&ini_for(data.path(), "AAA", ""));

        let code = cli::run(cli_with(Command::Info {
            config: file.path().to_path_buf(),
            ticker: Some("bbb".into()),
        }));
        assert!(same_code(code, ExitCode::SUCCESS));

        let code = cli::run(cli_with(Command::ListTickers {
            config: file.path().to_path_buf(),
        }));
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn list_tickers_missing_directory() {
        let file = write_temp_ini(&ini_for(Path::new("/nonexistent/trendtrader"), "AAA", ""));
        let code = cli::run(cli_with(Command::ListTickers {
            config: file.path().to_path_buf(),
        }));
        assert!(same_code(code, ExitCode::from(3)));
    }
}
