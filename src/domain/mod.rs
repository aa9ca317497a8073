//! Domain layer - core portfolio model.
//!
//! Pure domain types with no external interactions:
//! - `instrument`: priced entities with per-kind update policies
//! - `position`: immutable instrument/quantity pairings
//! - `portfolio`: cash plus positions, merged by symbol

pub mod instrument;
pub mod portfolio;
pub mod position;

pub use instrument::{AccrualPeriod, Instrument, InstrumentError, InstrumentHandle, InstrumentKind};
pub use portfolio::Portfolio;
pub use position::Position;
