//! CLI adapter.
//!
//! Command-line interface for the marketsim simulator, using clap derive
//! macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, OutputFormat, ReportCmd, RunCmd};

use anyhow::Result;

/// Execute the parsed CLI command
pub fn execute(app: CliApp) -> Result<()> {
    match app.command {
        Command::Run(cmd) => commands::run_command(cmd),
        Command::Report(cmd) => commands::report_command(cmd),
    }
}
