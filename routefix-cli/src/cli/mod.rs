//! Command-line interface orchestration for routefix.
//!
//! `generate` writes a fixture of random connections, `check` verifies one,
//! and `route` answers a fastest-route query over one.

mod commands;

pub use commands::{
    CheckCommand, Cli, CliError, Command, ExecutionSummary, GenerateCommand, RouteCommand,
    render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
