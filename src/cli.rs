//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvDataAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::analysis::AnalysisResult;
use crate::domain::error::{EvalError, ScreenerError};
use crate::domain::indicator::IndicatorRegistry;
use crate::domain::prohibited::ProhibitedTickers;
use crate::domain::strategy::Strategy;
use crate::domain::strategy_config::load_strategy;
use crate::domain::strategy_eval::evaluate_strategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "screener", about = "Strategy-based technical analysis screener")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a strategy against one ticker
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        strategy: PathBuf,
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Evaluate a strategy against every ticker in the data directory
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// Validate a strategy definition file
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// List the registered indicator codes
    Indicators,
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
            strategy,
            ticker,
            output,
        } => run_analyze(&config, &strategy, &ticker, output.as_deref()),
        Command::Screen { config, strategy } => run_screen(&config, &strategy),
        Command::Validate { strategy } => run_validate(&strategy),
        Command::Indicators => run_indicators(),
        Command::ListTickers { config } => run_list_tickers(&config),
    }
}

/// Loads an INI file into a config adapter.
pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ScreenerError> {
    FileConfigAdapter::from_file(path).map_err(|e| ScreenerError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Loads and validates a strategy definition file.
pub fn load_strategy_file(path: &Path) -> Result<Strategy, ScreenerError> {
    let config = load_config(path)?;
    load_strategy(&config)
}

/// Builds the CSV data adapter from `[data] path`.
pub fn build_data_adapter(config: &dyn ConfigPort) -> Result<CsvDataAdapter, ScreenerError> {
    let path = config
        .get_string("data", "path")
        .ok_or_else(|| ScreenerError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    Ok(CsvDataAdapter::new(PathBuf::from(path)))
}

/// Evaluates one ticker, optionally writing a text report.
pub fn analyze(
    config_path: &Path,
    strategy_path: &Path,
    ticker: &str,
    output: Option<&Path>,
) -> Result<AnalysisResult, ScreenerError> {
    let config = load_config(config_path)?;
    ProhibitedTickers::from_config(&config).ensure_allowed(ticker)?;

    let strategy = load_strategy_file(strategy_path)?;
    let adapter = build_data_adapter(&config)?;
    let data = adapter.fetch_ticker_data(ticker)?;

    let registry = IndicatorRegistry::builtin();
    let result = evaluate_strategy(&registry, &strategy, &data)?;

    if let Some(path) = output {
        TextReportAdapter.write(&result, &path.display().to_string())?;
    }
    Ok(result)
}

/// Per-ticker outcome of a batch screen.
#[derive(Debug)]
pub enum ScreenStatus {
    Evaluated { compliance: Decimal, passed: bool },
    Prohibited,
    Skipped { reason: String },
}

#[derive(Debug)]
pub struct ScreenOutcome {
    pub ticker: String,
    pub status: ScreenStatus,
}

/// Evaluates the strategy against every ticker the data directory offers.
///
/// Prohibited tickers and tickers the strategy cannot be evaluated for
/// (insufficient history, no data) are reported as skipped rather than
/// aborting the batch; any other error does abort.
pub fn screen(config_path: &Path, strategy_path: &Path) -> Result<Vec<ScreenOutcome>, ScreenerError> {
    let config = load_config(config_path)?;
    let prohibited = ProhibitedTickers::from_config(&config);
    let strategy = load_strategy_file(strategy_path)?;
    let adapter = build_data_adapter(&config)?;
    let registry = IndicatorRegistry::builtin();

    let mut outcomes = Vec::new();
    for ticker in adapter.list_tickers()? {
        if prohibited.is_prohibited(&ticker) {
            outcomes.push(ScreenOutcome {
                ticker,
                status: ScreenStatus::Prohibited,
            });
            continue;
        }
        let evaluated = adapter.fetch_ticker_data(&ticker).and_then(|data| {
            evaluate_strategy(&registry, &strategy, &data).map_err(ScreenerError::from)
        });
        let status = match evaluated {
            Ok(result) => ScreenStatus::Evaluated {
                compliance: result.compliance_rate(),
                passed: result.overall_passed,
            },
            Err(ScreenerError::NoData { .. }) => ScreenStatus::Skipped {
                reason: "no data".into(),
            },
            Err(ScreenerError::Eval(e))
                if matches!(e.root(), EvalError::InsufficientHistory { .. }) =>
            {
                ScreenStatus::Skipped {
                    reason: e.root().to_string(),
                }
            }
            Err(other) => return Err(other),
        };
        outcomes.push(ScreenOutcome { ticker, status });
    }
    Ok(outcomes)
}

fn run_analyze(
    config_path: &Path,
    strategy_path: &Path,
    ticker: &str,
    output: Option<&Path>,
) -> ExitCode {
    match analyze(config_path, strategy_path, ticker, output) {
        Ok(result) => {
            print!("{}", TextReportAdapter::render(&result));
            ExitCode::SUCCESS
        }
        Err(err) => report_error(&err),
    }
}

fn run_screen(config_path: &Path, strategy_path: &Path) -> ExitCode {
    match screen(config_path, strategy_path) {
        Ok(outcomes) => {
            for outcome in &outcomes {
                match &outcome.status {
                    ScreenStatus::Evaluated { compliance, passed } => {
                        let verdict = if *passed { "PASS" } else { "FAIL" };
                        println!("{:<10} {} {:>6.2}%", outcome.ticker, verdict, compliance);
                    }
                    ScreenStatus::Prohibited => {
                        println!("{:<10} SKIP prohibited", outcome.ticker);
                    }
                    ScreenStatus::Skipped { reason } => {
                        println!("{:<10} SKIP {}", outcome.ticker, reason);
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => report_error(&err),
    }
}

fn run_validate(strategy_path: &Path) -> ExitCode {
    match load_strategy_file(strategy_path) {
        Ok(strategy) => {
            println!(
                "strategy '{}' is valid ({} rules)",
                strategy.name,
                strategy.rules.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => report_error(&err),
    }
}

fn run_indicators() -> ExitCode {
    let registry = IndicatorRegistry::builtin();
    for definition in registry.definitions() {
        let param = if definition.requires_param {
            "param required"
        } else {
            "no param"
        };
        println!(
            "{:<12} {:<28} [{}] {}",
            definition.code, definition.name, param, definition.description
        );
    }
    ExitCode::SUCCESS
}

fn run_list_tickers(config_path: &Path) -> ExitCode {
    let listed = load_config(config_path)
        .and_then(|config| build_data_adapter(&config))
        .and_then(|adapter| adapter.list_tickers());
    match listed {
        Ok(tickers) => {
            for ticker in tickers {
                println!("{ticker}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => report_error(&err),
    }
}

fn report_error(err: &ScreenerError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}
