//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::chart_svg::SvgChartAdapter;
use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::TextReportAdapter;
use crate::domain::backtest::{annualized_rates, run_strategies, BacktestConfig};
use crate::domain::config_validation::{
    read_double, validate_config, DEFAULT_CHART_PATH, DEFAULT_CSV_PATH, DEFAULT_INITIAL_INVESTMENT,
    DEFAULT_REPORT_PATH, DEFAULT_SYMBOL,
};
use crate::domain::error::RetrospectError;
use crate::domain::metrics::{equity_curve, max_drawdown};
use crate::domain::price::PriceSeries;
use crate::domain::rates::{DailyRate, DEFAULT_ANNUAL_CREDIT_RATE};
use crate::domain::strategy::{StrategyKind, StrategyRun};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::report_port::{ChartPort, ReportPort};

#[derive(Parser, Debug)]
#[command(
    name = "retrospect",
    about = "Backtest simple trading strategies against historical daily prices"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every strategy and write the report and chart
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Validate a configuration and its price file without running strategies
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the date range of a price file
    Info {
        #[arg(long)]
        csv: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Price CSV with Date, Open and Close columns
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Instrument label used in the report and chart
    #[arg(long)]
    pub symbol: Option<String>,
    /// Initial investment per strategy
    #[arg(long)]
    pub principal: Option<f64>,
    #[arg(long)]
    pub report: Option<PathBuf>,
    #[arg(long)]
    pub chart: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub csv_path: PathBuf,
    pub symbol: String,
    pub principal: f64,
    pub annual_credit_rate: f64,
    pub report_path: PathBuf,
    pub chart_path: PathBuf,
}

/// Everything the pipeline produced, in strategy order.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub series: PriceSeries,
    pub runs: Vec<StrategyRun>,
    pub rates: Vec<Option<f64>>,
    pub drawdowns: Vec<f64>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run { config, overrides } => run_backtest(config.as_ref(), &overrides),
        Command::Validate { config } => run_validate(&config),
        Command::Info { csv } => run_info(&csv),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, RetrospectError> {
    FileConfigAdapter::from_file(path).map_err(|e| RetrospectError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Operator-facing line for a fatal error, printed regardless of log filtering.
pub fn format_error_line(err: &RetrospectError) -> String {
    format!("error: {err}")
}

fn report_error(err: &RetrospectError) -> ExitCode {
    error!("{err}");
    eprintln!("{}", format_error_line(err));
    err.into()
}

pub fn resolve_settings(
    config: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<RunSettings, RetrospectError> {
    let principal = match overrides.principal {
        Some(p) => p,
        None => read_double(
            config,
            "backtest",
            "initial_investment",
            DEFAULT_INITIAL_INVESTMENT,
        )?,
    };
    if !(principal > 0.0 && principal.is_finite()) {
        return Err(RetrospectError::ConfigInvalid {
            section: "backtest".into(),
            key: "initial_investment".into(),
            reason: format!("initial_investment must be positive, got {principal}"),
        });
    }

    let symbol = overrides
        .symbol
        .clone()
        .or_else(|| config.get_string("backtest", "symbol"))
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string())
        .trim()
        .to_string();
    if symbol.is_empty() {
        return Err(RetrospectError::ConfigInvalid {
            section: "backtest".into(),
            key: "symbol".into(),
            reason: "symbol must not be empty".into(),
        });
    }

    let path_setting = |over: &Option<PathBuf>, section: &str, key: &str, default: &str| {
        over.clone()
            .or_else(|| config.get_string(section, key).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(default))
    };

    Ok(RunSettings {
        csv_path: path_setting(&overrides.csv, "data", "csv_path", DEFAULT_CSV_PATH),
        symbol,
        principal,
        annual_credit_rate: read_double(
            config,
            "backtest",
            "annual_credit_rate",
            DEFAULT_ANNUAL_CREDIT_RATE,
        )?,
        report_path: path_setting(
            &overrides.report,
            "report",
            "report_path",
            DEFAULT_REPORT_PATH,
        ),
        chart_path: path_setting(&overrides.chart, "report", "chart_path", DEFAULT_CHART_PATH),
    })
}

/// Console line for one strategy's annualized rate.
pub fn format_rate_line(kind: StrategyKind, rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{} {:.2}%", kind.console_label(), r * 100.0),
        None => format!("{} Could not calculate", kind.console_label()),
    }
}

/// Load the series, run all strategies and their rates, then write the report
/// and chart. Input errors stop the pipeline before any strategy runs.
pub fn run_pipeline(
    data_port: &dyn PriceDataPort,
    settings: &RunSettings,
    report: &dyn ReportPort,
    chart: &dyn ChartPort,
) -> Result<PipelineOutcome, RetrospectError> {
    let series = data_port.fetch_series()?;
    info!(
        observations = series.len(),
        start = %series.start_date(),
        end = %series.end_date(),
        "loaded price data"
    );

    let config = BacktestConfig {
        symbol: settings.symbol.clone(),
        principal: settings.principal,
        daily_rate: DailyRate::from_annual(settings.annual_credit_rate),
    };

    info!(strategies = StrategyKind::ALL.len(), "running strategies");
    let runs = run_strategies(&series, &config);
    let rates = annualized_rates(&series, &runs, config.principal);

    let drawdowns: Vec<f64> = runs
        .iter()
        .map(|run| max_drawdown(&equity_curve(&series, config.principal, &run.profits)))
        .collect();
    for (run, drawdown) in runs.iter().zip(&drawdowns) {
        info!(
            strategy = %run.kind,
            final_balance = run.summary.final_balance,
            max_drawdown = *drawdown,
            "strategy complete"
        );
    }

    report.write(&runs, &settings.report_path)?;
    chart.render(&series, &runs, &settings.symbol, &settings.chart_path)?;

    Ok(PipelineOutcome {
        series,
        runs,
        rates,
        drawdowns,
    })
}

fn run_backtest(config_path: Option<&PathBuf>, overrides: &Overrides) -> ExitCode {
    // Stage 1: Load config
    let adapter = match config_path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(a) => a,
                Err(e) => return report_error(&e),
            }
        }
        None => FileConfigAdapter::empty(),
    };

    // Stage 2: Validate and resolve settings
    if let Err(e) = validate_config(&adapter, overrides.principal.is_some()) {
        return report_error(&e);
    }
    let settings = match resolve_settings(&adapter, overrides) {
        Ok(s) => s,
        Err(e) => return report_error(&e),
    };
    info!(
        symbol = %settings.symbol,
        principal = settings.principal,
        csv = %settings.csv_path.display(),
        "resolved settings"
    );

    // Stage 3: Load data, run strategies, write outputs
    let data_port = CsvPriceAdapter::new(settings.csv_path.clone());
    let outcome = match run_pipeline(
        &data_port,
        &settings,
        &TextReportAdapter::new(),
        &SvgChartAdapter::new(),
    ) {
        Ok(o) => o,
        Err(e) => return report_error(&e),
    };

    // Stage 4: Console summary
    for ((run, rate), drawdown) in outcome
        .runs
        .iter()
        .zip(&outcome.rates)
        .zip(&outcome.drawdowns)
    {
        println!("{}", format_rate_line(run.kind, *rate));
        println!("    Max drawdown: {:.2}%", drawdown * 100.0);
    }
    println!("Analysis complete for {}", settings.symbol);
    println!("Results saved to {}", settings.report_path.display());
    println!("Plot saved to {}", settings.chart_path.display());
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    info!("Validating config {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return report_error(&e),
    };
    if let Err(e) = validate_config(&adapter, false) {
        return report_error(&e);
    }
    let settings = match resolve_settings(&adapter, &Overrides::default()) {
        Ok(s) => s,
        Err(e) => return report_error(&e),
    };

    println!("Symbol:             {}", settings.symbol);
    println!("Initial investment: {:.2}", settings.principal);
    println!("Annual credit rate: {:.2}%", settings.annual_credit_rate * 100.0);
    println!("Price file:         {}", settings.csv_path.display());
    println!("Report:             {}", settings.report_path.display());
    println!("Chart:              {}", settings.chart_path.display());

    let data_port = CsvPriceAdapter::new(settings.csv_path.clone());
    match data_port.data_range() {
        Ok((start, end, count)) => {
            println!("Data:               {} observations, {} to {}", count, start, end);
            println!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

fn run_info(csv_path: &Path) -> ExitCode {
    let data_port = CsvPriceAdapter::new(csv_path.to_path_buf());
    match data_port.data_range() {
        Ok((start, end, count)) => {
            println!(
                "{}: {} observations, {} to {}",
                csv_path.display(),
                count,
                start,
                end
            );
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}
