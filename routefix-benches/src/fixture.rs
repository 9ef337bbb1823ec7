//! In-memory fixture builders shared by the benchmarks.

use std::io::Cursor;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use routefix_core::{FixtureConfig, FixtureGenerator, LocationId, RouteGraph, read_connections};

use crate::{error::BenchSetupError, params::FixtureBenchParams};

/// Builds a seeded generator for `params`.
///
/// # Errors
/// Returns [`BenchSetupError::Fixture`] when `params` describes an invalid
/// fixture, such as a pool of fewer than two locations.
pub fn seeded_generator(
    params: FixtureBenchParams,
    seed: u64,
) -> Result<FixtureGenerator, BenchSetupError> {
    let config = FixtureConfig::builder()
        .with_row_count(params.rows)
        .with_location_count(params.locations)
        .with_seed(seed)
        .build()?;
    Ok(FixtureGenerator::new(config))
}

/// Renders a seeded fixture into memory.
///
/// # Errors
/// Returns [`BenchSetupError`] when the configuration is invalid or the
/// in-memory write fails.
pub fn render_fixture(params: FixtureBenchParams, seed: u64) -> Result<Vec<u8>, BenchSetupError> {
    let generator = seeded_generator(params, seed)?;
    let mut buffer = Vec::new();
    generator.generate_into(&mut buffer)?;
    Ok(buffer)
}

/// Generates a seeded fixture and loads it into a [`RouteGraph`].
///
/// # Errors
/// Returns [`BenchSetupError`] when generation or reading fails, or when the
/// fixture yields no connections.
pub fn route_graph(params: FixtureBenchParams, seed: u64) -> Result<RouteGraph, BenchSetupError> {
    let bytes = render_fixture(params, seed)?;
    let loaded = read_connections(Cursor::new(bytes))?;
    if loaded.connections.is_empty() {
        return Err(BenchSetupError::NoConnections { rows: params.rows });
    }
    Ok(RouteGraph::from_connections(loaded.connections))
}

/// Picks `count` origin/destination label pairs from the pool of `params`.
///
/// Pairs are drawn uniformly and may name locations that ended up with no
/// connections; [`RouteGraph::fastest_route`] reports those as errors, so
/// callers should filter with [`RouteGraph::contains`].
#[must_use]
pub fn query_pairs(params: FixtureBenchParams, count: usize, seed: u64) -> Vec<(String, String)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let upper = params.locations.max(1);
    (0..count)
        .filter_map(|_| {
            let origin = LocationId::new(rng.gen_range(1..=upper))?;
            let destination = LocationId::new(rng.gen_range(1..=upper))?;
            Some((origin.to_string(), destination.to_string()))
        })
        .collect()
}

/// Picks up to `count` query pairs whose locations both exist in `graph`, so
/// every measured query answers without error.
#[must_use]
pub fn routable_pairs(
    graph: &RouteGraph,
    params: FixtureBenchParams,
    count: usize,
    seed: u64,
) -> Vec<(String, String)> {
    query_pairs(params, count, seed)
        .into_iter()
        .filter(|(origin, destination)| graph.contains(origin) && graph.contains(destination))
        .collect()
}
