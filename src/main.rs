//! Marketsim - discrete-step investment portfolio simulator
//!
//! Thin driver: parses the CLI, initializes logging, and dispatches to the
//! command handlers.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use marketsim::cli::{self, CliApp};

fn main() -> Result<()> {
    let app = CliApp::parse();
    init_logging(app.verbose, app.debug);
    cli::execute(app)
}

fn init_logging(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    fmt().with_env_filter(filter).init();
}
