//! Command implementations and argument parsing for the routefix CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use routefix_core::{
    CheckReport, DEFAULT_LOCATION_COUNT, DEFAULT_OUTPUT, DEFAULT_ROW_COUNT, FixtureConfig,
    FixtureError, FixtureGenerator, GenerationSummary, Route, RouteError, RouteGraph,
    check_fixture, load_connections,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "routefix",
    about = "Generate and inspect synthetic route connection fixtures."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Write a fixture of random `loc_start;loc_end;time` connections.
    Generate(GenerateCommand),
    /// Verify that a fixture follows the generator's format rules.
    Check(CheckCommand),
    /// Find the fastest route between two locations of a fixture.
    Route(RouteCommand),
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Number of data rows to write (at least 1).
    #[arg(long, default_value_t = DEFAULT_ROW_COUNT)]
    pub rows: usize,

    /// Number of locations `LOC1..LOC<n>` to draw from (at least 2).
    #[arg(long, default_value_t = DEFAULT_LOCATION_COUNT)]
    pub locations: usize,

    /// Destination file, replaced if it exists.
    #[arg(long, short, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Seed for reproducible output; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Options accepted by the `check` command.
#[derive(Debug, Args, Clone)]
pub struct CheckCommand {
    /// Fixture to verify.
    pub path: PathBuf,

    /// Pool size the locations must fall within.
    #[arg(long)]
    pub locations: Option<usize>,
}

/// Options accepted by the `route` command.
#[derive(Debug, Args, Clone)]
pub struct RouteCommand {
    /// Fixture to load connections from.
    pub path: PathBuf,

    /// Origin location.
    #[arg(long = "from")]
    pub origin: String,

    /// Destination location.
    #[arg(long = "to")]
    pub destination: String,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Fixture configuration or file access failed.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    /// The route query could not be answered.
    #[error(transparent)]
    Route(#[from] RouteError),
}

impl CliError {
    /// Stable machine-readable code of the underlying error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Fixture(err) => err.code().as_str(),
            Self::Route(err) => err.code().as_str(),
        }
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// A fixture was written.
    Generated(GenerationSummary),
    /// A fixture was checked.
    Checked {
        /// Fixture that was checked.
        path: PathBuf,
        /// Findings of the check.
        report: CheckReport,
    },
    /// A route query was answered.
    Routed {
        /// Requested origin.
        origin: String,
        /// Requested destination.
        destination: String,
        /// Fastest route, or `None` when unreachable.
        route: Option<Route>,
    },
}

impl ExecutionSummary {
    /// Returns `false` when the command completed but found a problem that
    /// should fail the process, such as an invalid fixture.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Checked { report, .. } => report.is_valid(),
            Self::Generated(_) | Self::Routed { .. } => true,
        }
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when configuration, file access, or the route query
/// fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use routefix_cli::cli::{Cli, Command, ExecutionSummary, GenerateCommand, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let cli = Cli {
///     command: Command::Generate(GenerateCommand {
///         rows: 5,
///         locations: 3,
///         output: dir.path().join("fixture.csv"),
///         seed: Some(1),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert!(matches!(summary, ExecutionSummary::Generated(ref generated) if generated.rows == 5));
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Generate(command) => {
            span.record("command", "generate");
            run_generate(command)
        }
        Command::Check(command) => {
            span.record("command", "check");
            run_check(command)
        }
        Command::Route(command) => {
            span.record("command", "route");
            run_route(command)
        }
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(
        rows = command.rows,
        locations = command.locations,
        output = %command.output.display(),
        seed = field::Empty,
    ),
)]
pub(super) fn run_generate(command: GenerateCommand) -> Result<ExecutionSummary, CliError> {
    let config = FixtureConfig::builder()
        .with_row_count(command.rows)
        .with_location_count(command.locations)
        .with_output(command.output)
        .with_optional_seed(command.seed)
        .build()?;
    let generator = FixtureGenerator::new(config);
    Span::current().record("seed", generator.seed());

    let summary = generator.generate()?;
    Ok(ExecutionSummary::Generated(summary))
}

#[instrument(
    name = "cli.check",
    err,
    skip(command),
    fields(path = %command.path.display(), locations = ?command.locations),
)]
pub(super) fn run_check(command: CheckCommand) -> Result<ExecutionSummary, CliError> {
    let report = check_fixture(&command.path, command.locations)?;
    if report.is_valid() {
        info!(rows = report.rows, "fixture is valid");
    } else {
        warn!(
            rows = report.rows,
            violations = report.violations.len(),
            "fixture failed validation"
        );
    }
    Ok(ExecutionSummary::Checked {
        path: command.path,
        report,
    })
}

#[instrument(
    name = "cli.route",
    err,
    skip(command),
    fields(
        path = %command.path.display(),
        origin = command.origin.as_str(),
        destination = command.destination.as_str(),
    ),
)]
pub(super) fn run_route(command: RouteCommand) -> Result<ExecutionSummary, CliError> {
    let loaded = load_connections(&command.path)?;
    let skipped = loaded.skipped;
    let graph = RouteGraph::from_connections(loaded.connections);
    info!(
        locations = graph.location_count(),
        connections = graph.connection_count(),
        skipped,
        "connections loaded"
    );
    let route = graph.fastest_route(&command.origin, &command.destination)?;
    Ok(ExecutionSummary::Routed {
        origin: command.origin,
        destination: command.destination,
        route,
    })
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use routefix_cli::cli::{ExecutionSummary, render_summary};
/// # use routefix_core::GenerationSummary;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary::Generated(GenerationSummary {
///     path: "data_grande.csv".into(),
///     rows: 10_000,
///     locations: 1_000,
///     seed: 7,
/// });
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "File 'data_grande.csv' generated with 10000 rows.\n"
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Generated(generated) => writeln!(
            writer,
            "File '{}' generated with {} rows.",
            generated.path.display(),
            generated.rows
        ),
        ExecutionSummary::Checked { path, report } => {
            writeln!(writer, "fixture: {}", path.display())?;
            writeln!(writer, "rows: {}", report.rows)?;
            writeln!(writer, "locations: {}", report.locations)?;
            writeln!(writer, "violations: {}", report.violations.len())?;
            for violation in &report.violations {
                writeln!(writer, "{violation}")?;
            }
            Ok(())
        }
        ExecutionSummary::Routed {
            route: Some(route), ..
        } => {
            writeln!(writer, "route: {route}")?;
            writeln!(writer, "total time: {}", route.total_time)
        }
        ExecutionSummary::Routed {
            origin,
            destination,
            route: None,
        } => writeln!(writer, "no route from {origin} to {destination}"),
    }
}
