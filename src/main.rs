//! CFO - programmatic cloud cost analysis
//!
//! Runs the CFO cost tools and prints their results.
//!
//! ## Usage
//!
//! ```bash
//! # Walk through all four example scenarios
//! cfo
//!
//! # Single operations
//! cfo analyze path/to/repo
//! cfo billing bill.csv --provider gcp
//! cfo forecast 250 --months 6 --growth-rate 0.15
//! cfo delta ../before ../after --json
//! cfo check --threshold 1500
//! ```

mod demo;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use cfo_analyzer::{BillingProvider, CostAnalyzer, ForecastRequest, ThresholdCheck};
use cfo_core::{CfoConfig, LogGuard, init_logging};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

/// Programmatic front end for the CFO cost-analysis tools
#[derive(Parser, Debug)]
#[command(name = "cfo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.cfo/logs/)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Configuration file (defaults to ./.cfo.yaml, then ~/.cfo/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Project root the tools are resolved against (defaults to the current directory)
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the example scenarios: analysis, billing, forecast, threshold check
    Demo,

    /// Estimate cloud costs of a codebase
    Analyze {
        /// Codebase root (defaults to the project root)
        root: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a provider billing export
    Billing {
        /// Billing export (CSV or JSON)
        file: PathBuf,

        /// Cloud provider: aws, gcp or azure
        #[arg(long, default_value = "aws")]
        provider: BillingProvider,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Project monthly costs forward
    Forecast {
        /// Current monthly cost baseline (USD)
        base_cost: f64,

        /// Number of months to project
        #[arg(long, default_value_t = 6)]
        months: u32,

        /// Monthly growth rate (0.10 = 10%)
        #[arg(long, default_value_t = 0.10, allow_negative_numbers = true)]
        growth_rate: f64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare estimated costs of two versions of a codebase
    Delta {
        /// Baseline codebase
        before: PathBuf,

        /// Modified codebase
        after: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Warn if the estimated monthly cost exceeds a threshold
    Check {
        /// Threshold in USD (defaults to alert_threshold from configuration)
        #[arg(long)]
        threshold: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::from(1);
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("cfo failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            if let Some(hint) = e
                .downcast_ref::<cfo_core::CfoError>()
                .and_then(|e| e.guidance())
            {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::from(1)
        }
    }
}

/// Set up logging based on CLI arguments.
fn setup_logging(cli: &Cli) -> cfo_core::Result<LogGuard> {
    init_logging(cli.log_dir.clone(), cli.verbose > 0)
}

fn load_config(cli: &Cli, project_root: &Path) -> anyhow::Result<CfoConfig> {
    let config = match &cli.config {
        Some(path) => CfoConfig::load(path)?,
        None => CfoConfig::discover(project_root)?,
    };
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let project_root = match &cli.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("resolving current directory")?,
    };
    let config = load_config(&cli, &project_root)?;
    let analyzer = CostAnalyzer::from_config(&config, &project_root);

    info!(project_root = %project_root.display(), "starting cfo");

    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => {
            let sample_bill = config.resolved_sample_bill(&project_root);
            let mut out = io::stdout().lock();
            demo::run(&analyzer, &sample_bill, config.alert_threshold, &mut out)
                .await
                .context("writing report")?;
        }
        Command::Analyze { root, json } => {
            let result = analyzer.analyze_codebase(root.as_deref()).await?;
            emit(json, &result, |out| demo::print_analysis(out, &result))?;
        }
        Command::Billing { file, provider, json } => {
            let billing = analyzer.parse_billing_data(&file, &provider).await?;
            emit(json, &billing, |out| demo::print_billing(out, &billing))?;
        }
        Command::Forecast {
            base_cost,
            months,
            growth_rate,
            json,
        } => {
            let request = ForecastRequest::new(base_cost)
                .with_months(months)
                .with_growth_rate(growth_rate);
            let forecast = analyzer.forecast_costs(request).await?;
            emit(json, &forecast, |out| demo::print_forecast(out, &forecast))?;
        }
        Command::Delta { before, after, json } => {
            let delta = analyzer.cost_delta(&before, &after).await?;
            emit(json, &delta, |out| demo::print_delta(out, &delta))?;
        }
        Command::Check { threshold, json } => {
            let threshold = threshold.unwrap_or(config.alert_threshold);
            let check: ThresholdCheck = analyzer.check_threshold(threshold).await?;
            emit(json, &check, |out| demo::print_threshold(out, &check))?;
        }
    }

    Ok(())
}

/// Print `value` as JSON, or run the human-readable printer.
fn emit<T: Serialize>(
    json: bool,
    value: &T,
    human: impl FnOnce(&mut io::StdoutLock<'static>) -> io::Result<()>,
) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    if json {
        let rendered = serde_json::to_string_pretty(value).context("serializing result")?;
        writeln!(out, "{}", rendered).context("writing result")?;
    } else {
        human(&mut out).context("writing result")?;
    }
    Ok(())
}
