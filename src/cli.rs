//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::adapters::csv_price_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_run_store::JsonRunStore;
use crate::adapters::momentum_decision_adapter::MomentumDecisionAdapter;
use crate::adapters::series_indicator_adapter::SeriesIndicatorAdapter;
use crate::domain::config_validation::{validate_decision_config, validate_run_config};
use crate::domain::error::TradesimError;
use crate::domain::metrics::Metrics;
use crate::domain::portfolio::SizingPolicy;
use crate::domain::run::{RunConfig, RunStatus};
use crate::domain::runner;
use crate::domain::trading_day::PriceField;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;

#[derive(Parser, Debug)]
#[command(name = "tradesim", about = "Daily decision-driven trading simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the daily simulation over a date range
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Single ticker override (replaces the configured list)
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        /// one_share or all_in
        #[arg(long)]
        sizing: Option<String>,
        #[arg(long)]
        cost_rate: Option<f64>,
        /// Directory for run records
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List tickers available in the price store
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for ticker(s)
    Info {
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a run configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Import CSV price files into the SQLite store
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            ticker,
            start_date,
            end_date,
            sizing,
            cost_rate,
            output,
        } => run_simulation_command(
            &config,
            ticker.as_deref(),
            start_date.as_deref(),
            end_date.as_deref(),
            sizing.as_deref(),
            cost_rate,
            output.as_ref(),
        ),
        Command::ListTickers { config } => run_list_tickers(&config),
        Command::Info { ticker, config } => run_info(ticker.as_deref(), &config),
        Command::Validate { config } => run_validate(&config),
        Command::Import { config, csv_dir } => run_import(&config, csv_dir.as_ref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

#[allow(clippy::too_many_arguments)]
fn run_simulation_command(
    config_path: &PathBuf,
    ticker_override: Option<&str>,
    start_override: Option<&str>,
    end_override: Option<&str>,
    sizing_override: Option<&str>,
    cost_override: Option<f64>,
    output_override: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate run and decision config
    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_decision_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 3: Resolve tickers
    let tickers = resolve_tickers(ticker_override, &adapter);
    if tickers.is_empty() {
        eprintln!("error: no tickers configured");
        return ExitCode::from(2);
    }

    // Stage 4: Wire up collaborators
    let price_port = match build_price_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let window = adapter.get_int("decision", "window", 20) as usize;
    let indicator_adapter = SeriesIndicatorAdapter::new(Arc::clone(&price_port), window);
    let decision_adapter = MomentumDecisionAdapter::from_config(&adapter);

    let output_dir = output_override.cloned().unwrap_or_else(|| {
        PathBuf::from(
            adapter
                .get_string("output", "dir")
                .unwrap_or_else(|| "runs".to_string()),
        )
    });
    let run_store = JsonRunStore::new(output_dir);

    let risk_free_rate = adapter.get_double("simulation", "risk_free_rate", 0.05);
    let cancel = AtomicBool::new(false);

    // Stage 5: Run each ticker, continuing past individual failures
    eprintln!("Simulating {} ticker(s)...", tickers.len());

    let mut first_error: Option<ExitCode> = None;

    for ticker in &tickers {
        let run_config = match build_run_config(
            &adapter,
            ticker,
            start_override,
            end_override,
            sizing_override,
            cost_override,
        ) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        match runner::run_simulation(
            &run_config,
            price_port.as_ref(),
            &indicator_adapter,
            &decision_adapter,
            &run_store,
            &cancel,
        ) {
            Ok(outcome) => match outcome.run.status {
                RunStatus::Completed => {
                    let metrics = Metrics::compute(
                        &outcome.run.trajectory,
                        run_config.initial_cash,
                        risk_free_rate,
                    );
                    print_run_summary(ticker, &metrics);
                    eprintln!("Run record: {}", outcome.path.display());
                }
                RunStatus::Failed => {
                    eprintln!(
                        "error: {} run failed: {}",
                        ticker,
                        outcome.run.failure.as_deref().unwrap_or("unknown failure")
                    );
                    first_error.get_or_insert(ExitCode::from(4));
                }
                RunStatus::Cancelled => {
                    eprintln!("{} run cancelled", ticker);
                    first_error.get_or_insert(ExitCode::from(1));
                }
            },
            Err(e) => {
                eprintln!("error: {e}");
                first_error.get_or_insert((&e).into());
            }
        }
    }

    first_error.unwrap_or(ExitCode::SUCCESS)
}

fn print_run_summary(ticker: &str, metrics: &Metrics) {
    eprintln!("\n=== {} Results ===", ticker);
    eprintln!("Final Value:      ${:.2}", metrics.final_value);
    eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
    eprintln!("Annualized:       {:.2}%", metrics.annualized_return * 100.0);
    eprintln!("Volatility:       {:.2}%", metrics.volatility * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", metrics.sharpe_ratio);
    eprintln!("Sortino Ratio:    {:.2}", metrics.sortino_ratio);
    eprintln!("Max Drawdown:     -{:.1}%", metrics.max_drawdown * 100.0);
    eprintln!("Total Trades:     {}", metrics.total_trades);
}

pub fn build_run_config(
    adapter: &dyn ConfigPort,
    ticker: &str,
    start_override: Option<&str>,
    end_override: Option<&str>,
    sizing_override: Option<&str>,
    cost_override: Option<f64>,
) -> Result<RunConfig, TradesimError> {
    let start_str = start_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("simulation", "start_date"))
        .ok_or_else(|| TradesimError::ConfigMissing {
            section: "simulation".into(),
            key: "start_date".into(),
        })?;
    let end_str = end_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("simulation", "end_date"))
        .ok_or_else(|| TradesimError::ConfigMissing {
            section: "simulation".into(),
            key: "end_date".into(),
        })?;

    let start_date = NaiveDate::parse_from_str(&start_str, "%Y-%m-%d").map_err(|_| {
        TradesimError::ConfigInvalid {
            section: "simulation".into(),
            key: "start_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;
    let end_date = NaiveDate::parse_from_str(&end_str, "%Y-%m-%d").map_err(|_| {
        TradesimError::ConfigInvalid {
            section: "simulation".into(),
            key: "end_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;

    let sizing = match sizing_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("simulation", "sizing"))
    {
        Some(s) => {
            SizingPolicy::parse(s.trim()).ok_or_else(|| TradesimError::ConfigInvalid {
                section: "simulation".into(),
                key: "sizing".into(),
                reason: "sizing must be one_share or all_in".into(),
            })?
        }
        None => SizingPolicy::default(),
    };

    Ok(RunConfig {
        ticker: ticker.to_string(),
        start_date,
        end_date,
        initial_cash: adapter.get_double("simulation", "initial_cash", 10_000.0),
        transaction_cost_rate: cost_override
            .unwrap_or_else(|| adapter.get_double("simulation", "transaction_cost_rate", 0.0)),
        sizing,
    })
}

pub fn resolve_tickers(ticker_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    if let Some(t) = ticker_override {
        return vec![t.to_uppercase()];
    }

    if let Some(tickers_str) = config.get_string("simulation", "tickers") {
        return tickers_str
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(ticker) = config.get_string("simulation", "ticker") {
        let ticker = ticker.trim().to_uppercase();
        if !ticker.is_empty() {
            return vec![ticker];
        }
    }

    vec![]
}

pub fn build_price_port(config: &dyn ConfigPort) -> Result<Arc<dyn PricePort>, TradesimError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string());

    match source.trim() {
        "csv" => {
            let csv_dir =
                config
                    .get_string("data", "csv_dir")
                    .ok_or_else(|| TradesimError::ConfigMissing {
                        section: "data".into(),
                        key: "csv_dir".into(),
                    })?;
            let price_field = config
                .get_string("data", "price_field")
                .and_then(|s| PriceField::parse(s.trim()))
                .unwrap_or_default();
            Ok(Arc::new(CsvPriceAdapter::new(
                PathBuf::from(csv_dir),
                price_field,
            )))
        }
        "sqlite" => {
            #[cfg(feature = "sqlite")]
            {
                use crate::adapters::sqlite_price_adapter::SqlitePriceAdapter;
                let adapter = SqlitePriceAdapter::from_config(config)?;
                Ok(Arc::new(adapter))
            }
            #[cfg(not(feature = "sqlite"))]
            {
                Err(TradesimError::ConfigInvalid {
                    section: "data".into(),
                    key: "source".into(),
                    reason: "sqlite feature is required for the sqlite source".into(),
                })
            }
        }
        other => Err(TradesimError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: format!("unknown data source '{}'", other),
        }),
    }
}

fn run_list_tickers(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let price_port = match build_price_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tickers = match price_port.list_tickers() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if tickers.is_empty() {
        eprintln!("No tickers found");
    } else {
        for ticker in &tickers {
            println!("{}", ticker);
        }
        eprintln!("{} tickers found", tickers.len());
    }
    ExitCode::SUCCESS
}

fn run_info(ticker_override: Option<&str>, config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let tickers = resolve_tickers(ticker_override, &config);
    if tickers.is_empty() {
        eprintln!("error: no tickers configured (use --ticker or set in config)");
        return ExitCode::from(2);
    }

    let price_port = match build_price_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for ticker in &tickers {
        match price_port.get_data_range(ticker) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} bars, {} to {}", ticker, count, min_date, max_date);
            }
            Ok(None) => {
                eprintln!("{}: no data found", ticker);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", ticker, e);
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_decision_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let tickers = resolve_tickers(None, &adapter);

    eprintln!("\nSimulation:");
    eprintln!("  tickers:       {}", tickers.join(", "));
    eprintln!(
        "  date range:    {} to {}",
        adapter
            .get_string("simulation", "start_date")
            .unwrap_or_default(),
        adapter
            .get_string("simulation", "end_date")
            .unwrap_or_default()
    );
    eprintln!(
        "  initial cash:  {:.2}",
        adapter.get_double("simulation", "initial_cash", 10_000.0)
    );
    eprintln!(
        "  cost rate:     {}",
        adapter.get_double("simulation", "transaction_cost_rate", 0.0)
    );
    eprintln!(
        "  sizing:        {}",
        adapter
            .get_string("simulation", "sizing")
            .unwrap_or_else(|| "one_share".to_string())
    );

    eprintln!("\nData:");
    eprintln!(
        "  source:        {}",
        adapter
            .get_string("data", "source")
            .unwrap_or_else(|| "csv".to_string())
    );
    eprintln!(
        "  price field:   {}",
        adapter
            .get_string("data", "price_field")
            .unwrap_or_else(|| "close".to_string())
    );

    eprintln!("\nDecision:");
    eprintln!(
        "  provider:      {}",
        adapter
            .get_string("decision", "provider")
            .unwrap_or_else(|| "momentum".to_string())
    );
    eprintln!(
        "  thresholds:    buy {} / sell {}",
        adapter.get_double("decision", "buy_threshold", 0.25),
        adapter.get_double("decision", "sell_threshold", -0.25)
    );
    eprintln!("  window:        {}", adapter.get_int("decision", "window", 20));

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_import(config_path: &PathBuf, csv_dir_override: Option<&PathBuf>) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_price_adapter::SqlitePriceAdapter;

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let csv_dir = match csv_dir_override
            .cloned()
            .or_else(|| config.get_string("data", "csv_dir").map(PathBuf::from))
        {
            Some(d) => d,
            None => {
                eprintln!("error: csv_dir is required (use --csv-dir or set [data] csv_dir)");
                return ExitCode::from(2);
            }
        };

        // Import reads raw bars, so the price field choice is irrelevant here.
        let csv = CsvPriceAdapter::new(csv_dir.clone(), PriceField::Close);

        let sqlite = match SqlitePriceAdapter::from_config(&config) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        if let Err(e) = sqlite.initialize_schema() {
            eprintln!("error: {e}");
            return (&e).into();
        }

        let tickers = match csv.list_tickers() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        if tickers.is_empty() {
            eprintln!("No CSV files found in {}", csv_dir.display());
            return ExitCode::SUCCESS;
        }

        let mut total_bars = 0usize;
        for ticker in &tickers {
            let bars = match csv.fetch_bars(ticker, NaiveDate::MIN, NaiveDate::MAX) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("warning: skipping {} ({})", ticker, e);
                    continue;
                }
            };
            if let Err(e) = sqlite.insert_bars(&bars) {
                eprintln!("error: {e}");
                return (&e).into();
            }
            eprintln!("{}: {} bars imported", ticker, bars.len());
            total_bars += bars.len();
        }

        eprintln!("Imported {} bars from {} file(s)", total_bars, tickers.len());
        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config_path, csv_dir_override);
        eprintln!("error: sqlite feature is required for import");
        ExitCode::from(1)
    }
}
