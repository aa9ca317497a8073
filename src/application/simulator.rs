//! Simulation engine.
//!
//! Owns the instrument handles and the portfolio, advances every price one
//! step at a time, and snapshots portfolio value after each step. The same
//! handles back both the tracking list and the portfolio positions, so a
//! price update is reflected in portfolio value with no explicit sync.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, InstrumentSpec};
use crate::domain::{Instrument, InstrumentError, InstrumentHandle, Portfolio};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid instrument '{symbol}': {source}")]
    InvalidInstrument {
        symbol: String,
        #[source]
        source: InstrumentError,
    },
}

/// Price snapshot of a single instrument within a step report.
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
}

/// Snapshot taken after all instruments updated once.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: u32,
    pub quotes: Vec<PriceQuote>,
    pub assets_value: f64,
    pub total_value: f64,
}

/// Discrete-step portfolio simulation.
#[derive(Debug)]
pub struct Simulation {
    instruments: Vec<InstrumentHandle>,
    portfolio: Portfolio,
    rng: StdRng,
    steps_taken: u32,
}

impl Simulation {
    /// Build a simulation from a validated scenario config.
    ///
    /// Construction errors for individual instruments are surfaced, not
    /// swallowed; the first bad entry aborts the build.
    pub fn from_config(config: &Config) -> Result<Self, SimulationError> {
        let rng = match config.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut instruments = Vec::with_capacity(config.instruments.len());
        let mut portfolio = Portfolio::new(config.portfolio.initial_cash);

        for spec in &config.instruments {
            let instrument = build_instrument(spec)?;
            let handle = instrument.into_handle();
            instruments.push(Rc::clone(&handle));
            portfolio.add_position(handle, spec.quantity());
        }

        Ok(Self {
            instruments,
            portfolio,
            rng,
            steps_taken: 0,
        })
    }

    /// Advance every instrument's price once and snapshot the portfolio.
    pub fn step(&mut self) -> StepReport {
        self.steps_taken += 1;
        let mut quotes = Vec::with_capacity(self.instruments.len());
        for handle in &self.instruments {
            let mut instrument = handle.borrow_mut();
            instrument.update_price(&mut self.rng);
            debug!(
                symbol = instrument.symbol(),
                price = instrument.current_price(),
                "price updated"
            );
            quotes.push(PriceQuote {
                symbol: instrument.symbol().to_string(),
                name: instrument.name().to_string(),
                price: instrument.current_price(),
            });
        }

        StepReport {
            step: self.steps_taken,
            quotes,
            assets_value: self.portfolio.assets_value(),
            total_value: self.portfolio.total_value(),
        }
    }

    /// Run `steps` updates, collecting one report per step.
    pub fn run(&mut self, steps: u32) -> Vec<StepReport> {
        (0..steps).map(|_| self.step()).collect()
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn instruments(&self) -> &[InstrumentHandle] {
        &self.instruments
    }

    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }
}

fn build_instrument(spec: &InstrumentSpec) -> Result<Instrument, SimulationError> {
    let result = match spec {
        InstrumentSpec::Equity {
            symbol,
            name,
            initial_price,
            ..
        } => Instrument::equity(symbol.clone(), name.clone(), *initial_price),
        InstrumentSpec::FixedIncome {
            symbol,
            name,
            initial_price,
            accrual_rate,
            accrual_period,
            ..
        } => Instrument::fixed_income(
            symbol.clone(),
            name.clone(),
            *initial_price,
            *accrual_rate,
            *accrual_period,
        ),
    };
    result.map_err(|source| SimulationError::InvalidInstrument {
        symbol: spec.symbol().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario(seed: Option<u64>) -> Config {
        let mut config: Config = toml::from_str(
            r#"
            [portfolio]
            initial_cash = 10000.0

            [simulation]
            steps = 10

            [[instruments]]
            kind = "equity"
            symbol = "X"
            name = "Equity X"
            initial_price = 300.0
            quantity = 10

            [[instruments]]
            kind = "fixed_income"
            symbol = "Y"
            name = "Bond Y"
            initial_price = 1000.0
            quantity = 2
            accrual_rate = 0.05
        "#,
        )
        .unwrap();
        config.simulation.seed = seed;
        config
    }

    #[test]
    fn test_initial_value_before_any_step() {
        let sim = Simulation::from_config(&scenario(Some(1))).unwrap();
        assert_eq!(sim.steps_taken(), 0);
        assert_relative_eq!(sim.portfolio().assets_value(), 5000.0);
        assert_relative_eq!(sim.portfolio().total_value(), 15000.0);
    }

    #[test]
    fn test_step_report_matches_portfolio() {
        let mut sim = Simulation::from_config(&scenario(Some(1))).unwrap();
        let report = sim.step();

        assert_eq!(report.step, 1);
        assert_eq!(report.quotes.len(), 2);
        assert_relative_eq!(report.assets_value, sim.portfolio().assets_value());
        assert_relative_eq!(report.total_value, report.assets_value + 10000.0);
    }

    #[test]
    fn test_fixed_income_leg_after_one_step() {
        let mut sim = Simulation::from_config(&scenario(Some(1))).unwrap();
        let report = sim.step();
        let bond = report.quotes.iter().find(|q| q.symbol == "Y").unwrap();
        assert_relative_eq!(bond.price, 1050.0, epsilon = 1e-9);
    }

    #[test]
    fn test_seeded_runs_are_repeatable() {
        let mut a = Simulation::from_config(&scenario(Some(99))).unwrap();
        let mut b = Simulation::from_config(&scenario(Some(99))).unwrap();
        for (ra, rb) in a.run(10).iter().zip(b.run(10).iter()) {
            assert_eq!(ra.total_value, rb.total_value);
        }
    }

    #[test]
    fn test_invalid_instrument_surfaces_symbol() {
        let mut config = scenario(Some(0));
        config.instruments.push(
            toml::from_str(
                r#"
                kind = "equity"
                symbol = "BAD"
                name = ""
                initial_price = 1.0
                quantity = 1
            "#,
            )
            .unwrap(),
        );
        let err = Simulation::from_config(&config).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidInstrument { ref symbol, .. } if symbol == "BAD"));
    }

    #[test]
    fn test_run_returns_one_report_per_step() {
        let mut sim = Simulation::from_config(&scenario(Some(5))).unwrap();
        let reports = sim.run(10);
        assert_eq!(reports.len(), 10);
        assert_eq!(reports.last().unwrap().step, 10);
        assert_eq!(sim.steps_taken(), 10);
    }
}
