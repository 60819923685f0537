//! Tokensim Command Line Interface
//!
//! Runs token supply scenarios from JSON or TOML files, compares them and
//! projects constant inflation, printing JSON, CSV or a plain table.

mod settings;
mod output;

use crate::settings::{load_scenario, load_scenario_config, AppConfig, OutputFormat};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tokensim_engine::{
    compare_scenarios, project_constant_inflation, simulate_scenario, supply_increase,
    validate_scenario,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "tokensim")]
#[command(about = "Token supply scenario simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (TOML, JSON or YAML)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Log level, overrides the settings file (RUST_LOG wins over both)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format, defaults to the configured one
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Write to this file instead of stdout
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a single scenario
    Simulate {
        /// Scenario file
        file: PathBuf,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Compare 2 to 5 scenarios side by side
    Compare {
        /// Scenario files, one scenario each
        #[arg(required = true, num_args = 2..=5)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Project supply under a constant annual inflation rate
    Project {
        #[arg(long)]
        initial_supply: Decimal,
        /// Annual inflation rate (%)
        #[arg(long)]
        rate: Decimal,
        #[arg(long)]
        years: u32,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Check scenario files without simulating them
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    init_logging(&config)?;

    match cli.command {
        Commands::Simulate { file, out } => handle_simulate(&file, &out, &config),
        Commands::Compare { files, out } => handle_compare(&files, &out, &config),
        Commands::Project {
            initial_supply,
            rate,
            years,
            out,
        } => handle_project(initial_supply, rate, years, &out, &config),
        Commands::Validate { files } => handle_validate(&files),
    }
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn emit(rendered: String, out: &OutputArgs) -> Result<()> {
    match &out.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write output to {}", path.display()))?;
            info!("Wrote output to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn handle_simulate(file: &Path, out: &OutputArgs, config: &AppConfig) -> Result<()> {
    let scenario = load_scenario_config(file)?;
    let run = simulate_scenario(&scenario)
        .with_context(|| format!("simulation of {} failed", file.display()))?;

    let format = out.format.unwrap_or(config.output_format);
    emit(output::render_run(&run, format, config.pretty_json)?, out)
}

fn handle_compare(files: &[PathBuf], out: &OutputArgs, config: &AppConfig) -> Result<()> {
    let scenarios = files
        .iter()
        .map(|path| load_scenario(path))
        .collect::<Result<Vec<_>>>()?;
    let report = compare_scenarios(&scenarios).context("comparison failed")?;

    let format = out.format.unwrap_or(config.output_format);
    emit(output::render_comparison(&report, format, config.pretty_json)?, out)
}

fn handle_project(
    initial_supply: Decimal,
    rate: Decimal,
    years: u32,
    out: &OutputArgs,
    config: &AppConfig,
) -> Result<()> {
    let points = project_constant_inflation(initial_supply, rate, years)
        .context("invalid projection parameters")?;
    let increase = supply_increase(&points)?;

    let format = out.format.unwrap_or(config.output_format);
    emit(
        output::render_projection(&points, &increase, format, config.pretty_json)?,
        out,
    )
}

fn handle_validate(files: &[PathBuf]) -> Result<()> {
    let mut failures = 0usize;

    for path in files {
        let outcome = load_scenario_config(path)
            .and_then(|scenario| validate_scenario(&scenario).map_err(anyhow::Error::from));
        match outcome {
            Ok(()) => println!("ok      {}", path.display()),
            Err(err) => {
                failures += 1;
                println!("invalid {}: {:#}", path.display(), err);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} scenario files are invalid", files.len());
    }
    Ok(())
}
