//! Benchmark setup error type.
//!
//! Aggregates the errors that may arise while preparing benchmark inputs so
//! that setup functions can propagate failures with `?`.

use std::io;

use routefix_core::{FixtureError, RouteError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Fixture configuration was rejected.
    #[error("fixture configuration failed: {0}")]
    Fixture(#[from] FixtureError),
    /// A route query could not be answered.
    #[error("route query failed: {0}")]
    Route(#[from] RouteError),
    /// Writing or reading the in-memory fixture failed.
    #[error("in-memory fixture I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The generated fixture held no connection to route over.
    #[error("fixture with {rows} rows produced no connections")]
    NoConnections {
        /// Rows requested for the fixture.
        rows: usize,
    },
}
