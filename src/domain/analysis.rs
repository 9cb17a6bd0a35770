//! End-to-end analysis of one ticker: indicators, signals, backtest,
//! metrics and the market summary.
//!
//! Every stage takes its inputs by reference and returns a new value, so a
//! run is a pure function of `(bars, params)`.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::backtest::{BacktestConfig, BacktestResult, run_backtest};
use super::error::TrendtraderError;
use super::indicator::{IndicatorSeries, IndicatorType, bollinger, macd, rsi};
use super::indicator_helpers::calculate_indicator;
use super::market_summary::MarketSummary;
use super::metrics::Metrics;
use super::ohlcv::{OhlcvBar, validate_bars};
use super::signal::{SignalPoint, generate_signals};
use super::strategy::CrossoverStrategy;

pub const DEFAULT_EMA_SPAN: usize = 12;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;
pub const DEFAULT_RISK_PER_TRADE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub strategy: CrossoverStrategy,
    /// Span of the standalone EMA overlay.
    pub ema_span: usize,
    pub initial_capital: f64,
    pub risk_per_trade: f64,
}

impl AnalysisParams {
    pub fn backtest_config(&self) -> BacktestConfig {
        BacktestConfig {
            initial_capital: self.initial_capital,
            risk_per_trade: self.risk_per_trade,
            trigger: self.strategy.trigger,
        }
    }
}

pub fn validate_params(params: &AnalysisParams) -> Result<(), TrendtraderError> {
    if params.ticker.trim().is_empty() {
        return Err(TrendtraderError::invalid_parameter(
            "ticker",
            "ticker must not be empty",
        ));
    }
    if params.start_date > params.end_date {
        return Err(TrendtraderError::invalid_parameter(
            "start_date",
            format!(
                "start_date {} is after end_date {}",
                params.start_date, params.end_date
            ),
        ));
    }
    if params.strategy.short_window == 0 {
        return Err(TrendtraderError::invalid_parameter(
            "short_window",
            "short_window must be positive",
        ));
    }
    if params.strategy.long_window == 0 {
        return Err(TrendtraderError::invalid_parameter(
            "long_window",
            "long_window must be positive",
        ));
    }
    if params.ema_span == 0 {
        return Err(TrendtraderError::invalid_parameter(
            "ema_span",
            "ema_span must be positive",
        ));
    }
    if !params.initial_capital.is_finite() || params.initial_capital <= 0.0 {
        return Err(TrendtraderError::invalid_parameter(
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    let risk = params.risk_per_trade;
    if risk.is_nan() || risk <= 0.0 || risk > 1.0 {
        return Err(TrendtraderError::invalid_parameter(
            "risk_per_trade",
            "risk_per_trade must be in (0, 1]",
        ));
    }
    Ok(())
}

/// Chart overlays, each aligned 1:1 with the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorOverlay {
    pub short_ma: IndicatorSeries,
    pub long_ma: IndicatorSeries,
    pub ema: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub macd: IndicatorSeries,
    pub bollinger: IndicatorSeries,
}

impl IndicatorOverlay {
    pub fn compute(bars: &[OhlcvBar], params: &AnalysisParams) -> Self {
        IndicatorOverlay {
            short_ma: calculate_indicator(bars, &params.strategy.short_indicator()),
            long_ma: calculate_indicator(bars, &params.strategy.long_indicator()),
            ema: calculate_indicator(bars, &IndicatorType::Ema(params.ema_span)),
            rsi: calculate_indicator(bars, &IndicatorType::Rsi(rsi::DEFAULT_PERIOD)),
            macd: calculate_indicator(
                bars,
                &IndicatorType::Macd {
                    fast: macd::DEFAULT_FAST,
                    slow: macd::DEFAULT_SLOW,
                    signal: macd::DEFAULT_SIGNAL,
                },
            ),
            bollinger: calculate_indicator(
                bars,
                &IndicatorType::Bollinger {
                    period: bollinger::DEFAULT_PERIOD,
                    stddev_mult_x100: bollinger::DEFAULT_STDDEV_MULT_X100,
                },
            ),
        }
    }

    /// All overlays in a stable order, for export.
    pub fn series(&self) -> [&IndicatorSeries; 6] {
        [
            &self.short_ma,
            &self.long_ma,
            &self.ema,
            &self.rsi,
            &self.macd,
            &self.bollinger,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub params: AnalysisParams,
    pub bars: Vec<OhlcvBar>,
    pub overlay: IndicatorOverlay,
    pub signals: Vec<SignalPoint>,
    pub backtest: BacktestResult,
    pub metrics: Metrics,
    pub market: Option<MarketSummary>,
}

pub fn run_analysis(
    bars: &[OhlcvBar],
    params: &AnalysisParams,
) -> Result<AnalysisReport, TrendtraderError> {
    validate_params(params)?;

    let required = params.strategy.warmup_bars();
    if bars.is_empty() {
        return Err(TrendtraderError::InsufficientData {
            ticker: params.ticker.clone(),
            bars: 0,
            required,
        });
    }
    validate_bars(&params.ticker, bars)?;

    let overlay = IndicatorOverlay::compute(bars, params);
    debug!(
        short = %overlay.short_ma.indicator_type,
        long = %overlay.long_ma.indicator_type,
        "indicators computed"
    );

    let signals = generate_signals(bars, &overlay.short_ma, &overlay.long_ma);
    if signals.is_empty() {
        return Err(TrendtraderError::InsufficientData {
            ticker: params.ticker.clone(),
            bars: bars.len(),
            required,
        });
    }
    debug!(rows = signals.len(), "signals generated");

    let backtest = run_backtest(&signals, &params.backtest_config());
    let metrics = Metrics::compute(&backtest, params.initial_capital);
    let market = MarketSummary::from_bars(bars);

    info!(
        ticker = %params.ticker,
        bars = bars.len(),
        trades = metrics.total_trades,
        final_value = metrics.final_value,
        total_return_pct = metrics.total_return_pct,
        "analysis complete"
    );

    Ok(AnalysisReport {
        params: params.clone(),
        bars: bars.to_vec(),
        overlay,
        signals,
        backtest,
        metrics,
        market,
    })
}
