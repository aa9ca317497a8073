//! CLI command handlers.
//!
//! Implementation of the marketsim commands. The handlers are the only place
//! that formats output; the displayed numbers always come straight from the
//! domain computations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use crate::application::{Simulation, StepReport};
use crate::config::load_config;
use crate::domain::Portfolio;

/// Marketsim - discrete-step investment portfolio simulator
#[derive(Parser, Debug)]
#[command(
    name = "marketsim",
    version = env!("CARGO_PKG_VERSION"),
    about = "Discrete-step investment portfolio simulator",
    long_about = "Marketsim evolves a set of equity and fixed-income instruments over \
                  discrete time steps and reports the aggregate portfolio value after \
                  each step."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the simulation loop and report each step
    Run(RunCmd),

    /// Print the initial portfolio breakdown without running any step
    Report(ReportCmd),
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Run the simulation loop
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Path to the scenario configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/sim.toml")]
    pub config: PathBuf,

    /// Override the number of steps from the config
    #[arg(short, long, value_name = "N")]
    pub steps: Option<u32>,

    /// Override the RNG seed for a repeatable run
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_name = "FORMAT", default_value = "text")]
    pub format: OutputFormat,
}

/// Print the initial portfolio state
#[derive(Parser, Debug)]
pub struct ReportCmd {
    /// Path to the scenario configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/sim.toml")]
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, value_name = "FORMAT", default_value = "text")]
    pub format: OutputFormat,
}

/// One line of the final portfolio breakdown.
#[derive(Debug, Serialize)]
struct PositionLine {
    symbol: String,
    name: String,
    quantity: i64,
    price: f64,
    value: f64,
}

/// Serializable snapshot of a portfolio for report output.
#[derive(Debug, Serialize)]
struct PortfolioBreakdown {
    cash: f64,
    positions: Vec<PositionLine>,
    assets_value: f64,
    total_value: f64,
}

impl PortfolioBreakdown {
    fn from_portfolio(portfolio: &Portfolio) -> Self {
        let mut positions: Vec<PositionLine> = portfolio
            .positions()
            .values()
            .map(|position| {
                let instrument = position.instrument().borrow();
                PositionLine {
                    symbol: instrument.symbol().to_string(),
                    name: instrument.name().to_string(),
                    quantity: position.quantity(),
                    price: instrument.current_price(),
                    value: position.market_value(),
                }
            })
            .collect();
        positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Self {
            cash: portfolio.cash(),
            positions,
            assets_value: portfolio.assets_value(),
            total_value: portfolio.total_value(),
        }
    }
}

pub fn run_command(cmd: RunCmd) -> Result<()> {
    let mut config = load_config(&cmd.config)
        .with_context(|| format!("Failed to load configuration from {}", cmd.config.display()))?;
    if let Some(steps) = cmd.steps {
        config.simulation.steps = steps;
    }
    if let Some(seed) = cmd.seed {
        config.simulation.seed = Some(seed);
    }
    config
        .ensure_instruments()
        .with_context(|| format!("Nothing to simulate in {}", cmd.config.display()))?;

    let mut simulation =
        Simulation::from_config(&config).context("Failed to build simulation")?;
    tracing::info!(
        steps = config.simulation.steps,
        instruments = config.instruments.len(),
        "starting simulation"
    );

    let reports = simulation.run(config.simulation.steps);
    let breakdown = PortfolioBreakdown::from_portfolio(simulation.portfolio());

    match cmd.format {
        OutputFormat::Text => {
            for report in &reports {
                print_step(report);
            }
            println!("--- Final portfolio ---");
            print_breakdown(&breakdown);
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct RunOutput<'a> {
                steps: &'a [StepReport],
                portfolio: &'a PortfolioBreakdown,
            }
            let output = RunOutput {
                steps: &reports,
                portfolio: &breakdown,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

pub fn report_command(cmd: ReportCmd) -> Result<()> {
    let config = load_config(&cmd.config)
        .with_context(|| format!("Failed to load configuration from {}", cmd.config.display()))?;
    let simulation = Simulation::from_config(&config).context("Failed to build simulation")?;
    let breakdown = PortfolioBreakdown::from_portfolio(simulation.portfolio());

    match cmd.format {
        OutputFormat::Text => print_breakdown(&breakdown),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&breakdown)?),
    }
    Ok(())
}

fn print_step(report: &StepReport) {
    println!("--- Step {} ---", report.step);
    for quote in &report.quotes {
        println!("{} price: {:.2}", quote.symbol, quote.price);
    }
    println!("Portfolio value: {:.2}", report.total_value);
}

fn print_breakdown(breakdown: &PortfolioBreakdown) {
    println!("Cash: {:.2}", breakdown.cash);
    println!("Positions:");
    for line in &breakdown.positions {
        println!(
            "- {} ({}): {} @ {:.2} = {:.2}",
            line.name, line.symbol, line.quantity, line.price, line.value
        );
    }
    println!("Assets value: {:.2}", breakdown.assets_value);
    println!("Total value: {:.2}", breakdown.total_value);
}
