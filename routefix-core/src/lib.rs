//! Routefix core library.
//!
//! Generates synthetic `loc_start;loc_end;time` connection fixtures for
//! load-testing route-finding services, and provides the consumer side used to
//! verify them: a lenient reader, a strict checker, and a Dijkstra route graph.

mod check;
mod config;
mod error;
mod format;
mod generator;
mod graph;
mod location;
mod reader;
mod sampler;

pub use crate::{
    check::{CheckReport, Violation, ViolationKind, check_fixture, check_reader},
    config::{
        DEFAULT_LOCATION_COUNT, DEFAULT_OUTPUT, DEFAULT_ROW_COUNT, FixtureConfig,
        FixtureConfigBuilder, MIN_LOCATION_COUNT,
    },
    error::{FixtureError, FixtureErrorCode, RouteError, RouteErrorCode},
    format::{DELIMITER, HEADER_LINE, MAX_TIME, MIN_TIME},
    generator::{FixtureGenerator, GenerationSummary, generate},
    graph::{Route, RouteGraph},
    location::{LOCATION_PREFIX, LocationId, LocationPool, ParseLocationError},
    reader::{Connection, LoadedConnections, load_connections, read_connections},
    sampler::{EdgeSampler, SampledEdge},
};
