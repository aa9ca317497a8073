//! Marketsim - discrete-step investment portfolio simulator library
//!
//! Models a set of financial instruments whose prices evolve over discrete
//! time steps and a portfolio that tracks holdings and cash to compute
//! aggregate value.
//!
//! # Modules
//!
//! - `domain`: Core business logic (Instrument, Position, Portfolio)
//! - `application`: Simulation engine driving price updates
//! - `config`: Scenario loading and validation
//! - `cli`: Command-line interface

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
