//! Random connection sampling over a [`LocationPool`].

use std::fmt;

use rand::Rng;

use crate::{
    format::{DELIMITER, MAX_TIME, MIN_TIME},
    location::{LocationId, LocationPool},
};

/// One generated connection. `start` and `end` always differ.
///
/// Displays as a fixture row without a line terminator.
///
/// # Examples
/// ```
/// use routefix_core::{LocationId, SampledEdge};
///
/// let edge = SampledEdge {
///     start: LocationId::new(3).expect("non-zero"),
///     end: LocationId::new(9).expect("non-zero"),
///     time: 27,
/// };
/// assert_eq!(edge.to_string(), "LOC3;LOC9;27");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SampledEdge {
    /// Origin location.
    pub start: LocationId,
    /// Destination location.
    pub end: LocationId,
    /// Travel time in `MIN_TIME..=MAX_TIME`.
    pub time: u32,
}

impl fmt::Display for SampledEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}",
            self.start, self.end, self.time
        )
    }
}

/// Endless iterator of [`SampledEdge`]s drawn from a pool.
///
/// Each edge draws `start` uniformly, `end` uniformly from the remaining
/// locations, and `time` uniformly from `MIN_TIME..=MAX_TIME`.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use routefix_core::{EdgeSampler, LocationPool};
///
/// let pool = LocationPool::new(2).expect("valid pool");
/// let edges: Vec<_> = EdgeSampler::new(pool, SmallRng::seed_from_u64(1)).take(10).collect();
/// assert!(edges.iter().all(|edge| edge.start != edge.end));
/// ```
#[derive(Debug)]
pub struct EdgeSampler<R> {
    pool: LocationPool,
    rng: R,
}

impl<R: Rng> EdgeSampler<R> {
    /// Creates a sampler drawing from `pool` with `rng`.
    pub const fn new(pool: LocationPool, rng: R) -> Self {
        Self { pool, rng }
    }

    /// Draws the next connection.
    pub fn sample(&mut self) -> SampledEdge {
        let start = self.pool.sample(&mut self.rng);
        let end = self.pool.sample_other(&mut self.rng, start);
        let time = self.rng.gen_range(MIN_TIME..=MAX_TIME);
        SampledEdge { start, end, time }
    }
}

impl<R: Rng> Iterator for EdgeSampler<R> {
    type Item = SampledEdge;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.sample())
    }
}
