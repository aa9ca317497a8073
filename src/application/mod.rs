//! Application layer - simulation orchestration.

pub mod simulator;

pub use simulator::{PriceQuote, Simulation, SimulationError, StepReport};
