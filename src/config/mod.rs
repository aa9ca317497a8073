//! Configuration module.
//!
//! Loads and validates simulation scenarios from TOML files.

pub mod loader;

pub use loader::{load_config, Config, ConfigError, InstrumentSpec};
