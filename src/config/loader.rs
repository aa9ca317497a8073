//! Configuration loader.
//!
//! Loads and validates a simulation scenario from a TOML file.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::domain::AccrualPeriod;

/// Main configuration structure matching the scenario TOML layout.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub portfolio: PortfolioSection,
    pub simulation: SimulationSection,
    #[serde(default)]
    pub instruments: Vec<InstrumentSpec>,
}

/// Portfolio configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioSection {
    /// Starting cash balance
    pub initial_cash: f64,
}

/// Simulation configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSection {
    /// Number of discrete price-update steps to run
    pub steps: u32,
    /// Optional RNG seed for repeatable runs; omitted means entropy-seeded
    #[serde(default)]
    pub seed: Option<u64>,
}

/// One `[[instruments]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstrumentSpec {
    Equity {
        symbol: String,
        name: String,
        initial_price: f64,
        quantity: i64,
    },
    FixedIncome {
        symbol: String,
        name: String,
        initial_price: f64,
        quantity: i64,
        accrual_rate: f64,
        /// "per_step" applies the full rate each step; "annual_365" divides
        /// the rate by 365 treating a step as one day
        #[serde(default)]
        accrual_period: AccrualPeriod,
    },
}

impl InstrumentSpec {
    pub fn symbol(&self) -> &str {
        match self {
            InstrumentSpec::Equity { symbol, .. } => symbol,
            InstrumentSpec::FixedIncome { symbol, .. } => symbol,
        }
    }

    pub fn initial_price(&self) -> f64 {
        match self {
            InstrumentSpec::Equity { initial_price, .. } => *initial_price,
            InstrumentSpec::FixedIncome { initial_price, .. } => *initial_price,
        }
    }

    pub fn quantity(&self) -> i64 {
        match self {
            InstrumentSpec::Equity { quantity, .. } => *quantity,
            InstrumentSpec::FixedIncome { quantity, .. } => *quantity,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    ///
    /// Domain-level construction checks (empty symbol/name, negative price)
    /// still run when the simulation is built; this catches what the TOML
    /// layer alone can express badly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.portfolio.initial_cash.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "initial_cash must be finite, got {}",
                self.portfolio.initial_cash
            )));
        }

        for spec in &self.instruments {
            if !spec.initial_price().is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "initial_price for '{}' must be finite, got {}",
                    spec.symbol(),
                    spec.initial_price()
                )));
            }
            if let InstrumentSpec::FixedIncome {
                symbol,
                accrual_rate,
                ..
            } = spec
            {
                if !accrual_rate.is_finite() {
                    return Err(ConfigError::ValidationError(format!(
                        "accrual_rate for '{symbol}' must be finite, got {accrual_rate}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Extra check for commands that advance prices: an empty instrument
    /// list leaves nothing to simulate. Reporting on a cash-only portfolio
    /// stays allowed, so this is not part of [`Config::validate`].
    pub fn ensure_instruments(&self) -> Result<(), ConfigError> {
        if self.instruments.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one instrument is required to run a simulation".to_string(),
            ));
        }
        Ok(())
    }
}
