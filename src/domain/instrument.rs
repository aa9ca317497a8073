//! Financial instruments with per-kind price update policies.
//!
//! An [`Instrument`] is identified by its symbol alone; two instruments with
//! the same symbol compare equal even if their kinds or prices differ. The
//! same mutable instrument is shared between the simulation's tracking list
//! and any portfolio positions through an [`InstrumentHandle`], so a price
//! update is visible everywhere without an explicit sync call.

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

/// Shared mutable handle to an instrument.
///
/// Cloning the handle clones the reference, not the instrument. Copying the
/// `Instrument` value itself into a portfolio would break live price
/// propagation, so positions always hold a handle.
pub type InstrumentHandle = Rc<RefCell<Instrument>>;

/// How a fixed-income accrual rate maps onto one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccrualPeriod {
    /// The full rate is applied every step.
    #[default]
    PerStep,
    /// The rate is annual; each step applies `rate / 365`.
    #[serde(rename = "annual_365")]
    Annual365,
}

/// Price update policy, one variant per instrument kind.
#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentKind {
    /// Price moves by a uniform random shock in (-5%, +5%) per step.
    Equity,
    /// Price grows deterministically by the accrual rate per step.
    FixedIncome {
        accrual_rate: f64,
        accrual_period: AccrualPeriod,
    },
}

/// Construction-time validation errors.
#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("instrument symbol must not be empty")]
    EmptySymbol,
    #[error("instrument name must not be empty")]
    EmptyName,
    #[error("initial price must not be negative, got {0}")]
    NegativePrice(f64),
}

/// A priced financial entity with symbol-based identity.
#[derive(Debug, Clone)]
pub struct Instrument {
    symbol: String,
    name: String,
    current_price: f64,
    kind: InstrumentKind,
}

impl Instrument {
    fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        initial_price: f64,
        kind: InstrumentKind,
    ) -> Result<Self, InstrumentError> {
        let symbol = symbol.into();
        let name = name.into();
        if symbol.is_empty() {
            return Err(InstrumentError::EmptySymbol);
        }
        if name.is_empty() {
            return Err(InstrumentError::EmptyName);
        }
        if initial_price < 0.0 {
            return Err(InstrumentError::NegativePrice(initial_price));
        }
        Ok(Self {
            symbol,
            name,
            current_price: initial_price,
            kind,
        })
    }

    /// Create an equity instrument.
    pub fn equity(
        symbol: impl Into<String>,
        name: impl Into<String>,
        initial_price: f64,
    ) -> Result<Self, InstrumentError> {
        Self::new(symbol, name, initial_price, InstrumentKind::Equity)
    }

    /// Create a fixed-income instrument.
    ///
    /// The accrual rate is taken as-is; no lower bound is enforced beyond what
    /// monotonic growth naturally requires.
    pub fn fixed_income(
        symbol: impl Into<String>,
        name: impl Into<String>,
        initial_price: f64,
        accrual_rate: f64,
        accrual_period: AccrualPeriod,
    ) -> Result<Self, InstrumentError> {
        Self::new(
            symbol,
            name,
            initial_price,
            InstrumentKind::FixedIncome {
                accrual_rate,
                accrual_period,
            },
        )
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn kind(&self) -> &InstrumentKind {
        &self.kind
    }

    /// Advance the price by one step.
    ///
    /// Equity draws a fractional change uniformly in (-0.05, +0.05) from the
    /// supplied RNG and applies it multiplicatively, clamping at zero.
    /// Fixed income compounds by the configured per-step rate and never needs
    /// the RNG. Never fails and has no precondition beyond construction.
    pub fn update_price<R: Rng>(&mut self, rng: &mut R) {
        match self.kind {
            InstrumentKind::Equity => {
                let change = (rng.gen::<f64>() - 0.5) * 0.1;
                self.current_price *= 1.0 + change;
                if self.current_price < 0.0 {
                    self.current_price = 0.0;
                }
            }
            InstrumentKind::FixedIncome {
                accrual_rate,
                accrual_period,
            } => {
                let rate_applied = match accrual_period {
                    AccrualPeriod::PerStep => accrual_rate,
                    AccrualPeriod::Annual365 => accrual_rate / 365.0,
                };
                self.current_price *= 1.0 + rate_applied;
            }
        }
    }

    /// Wrap this instrument into a shared handle.
    pub fn into_handle(self) -> InstrumentHandle {
        Rc::new(RefCell::new(self))
    }
}

// Identity is the symbol alone. Two instruments of different kinds that share
// a symbol compare equal; the portfolio merge logic depends on this.
impl PartialEq for Instrument {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Instrument {}

impl std::hash::Hash for Instrument {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}
