//! Benchmark parameter types.

use std::fmt;

/// Shape of a generated fixture.
#[derive(Clone, Copy, Debug)]
pub struct FixtureBenchParams {
    /// Number of data rows.
    pub rows: usize,
    /// Size of the location pool.
    pub locations: usize,
}

impl fmt::Display for FixtureBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rows={},locs={}", self.rows, self.locations)
    }
}
