//! Generation parameters and the builder that validates them.
//!
//! Invalid parameters are rejected here, before any file is opened, so a
//! generation run never starts with a pool it cannot sample from.

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use crate::{error::FixtureError, location::LocationPool};

/// Rows written when the caller does not choose a count.
pub const DEFAULT_ROW_COUNT: usize = 10_000;

/// Locations in the pool when the caller does not choose a count.
pub const DEFAULT_LOCATION_COUNT: usize = 1_000;

/// Destination file when the caller does not choose one.
pub const DEFAULT_OUTPUT: &str = "data_grande.csv";

/// Smallest pool that can produce a connection between distinct locations.
pub const MIN_LOCATION_COUNT: usize = 2;

/// Validated parameters for one fixture generation run.
///
/// # Examples
/// ```
/// use routefix_core::FixtureConfig;
///
/// let config = FixtureConfig::builder()
///     .with_row_count(5)
///     .with_location_count(3)
///     .with_seed(42)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(config.row_count().get(), 5);
/// assert_eq!(config.location_pool().len(), 3);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureConfig {
    row_count: NonZeroUsize,
    pool: LocationPool,
    output: PathBuf,
    seed: Option<u64>,
}

impl FixtureConfig {
    /// Starts a builder populated with the default parameters.
    #[must_use]
    pub fn builder() -> FixtureConfigBuilder {
        FixtureConfigBuilder::new()
    }

    /// Number of data rows to write, excluding the header.
    #[must_use]
    pub const fn row_count(&self) -> NonZeroUsize {
        self.row_count
    }

    /// Pool of locations the rows are drawn from.
    #[must_use]
    pub const fn location_pool(&self) -> LocationPool {
        self.pool
    }

    /// Destination path of the fixture.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Explicit RNG seed, if one was requested.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Collects generation parameters and validates them in [`Self::build`].
///
/// # Examples
/// ```
/// use routefix_core::{DEFAULT_LOCATION_COUNT, DEFAULT_OUTPUT, DEFAULT_ROW_COUNT, FixtureConfigBuilder};
///
/// let builder = FixtureConfigBuilder::new();
/// assert_eq!(builder.row_count(), DEFAULT_ROW_COUNT);
/// assert_eq!(builder.location_count(), DEFAULT_LOCATION_COUNT);
/// assert_eq!(builder.output().to_str(), Some(DEFAULT_OUTPUT));
/// ```
#[derive(Clone, Debug)]
pub struct FixtureConfigBuilder {
    row_count: usize,
    location_count: usize,
    output: PathBuf,
    seed: Option<u64>,
}

impl Default for FixtureConfigBuilder {
    fn default() -> Self {
        Self {
            row_count: DEFAULT_ROW_COUNT,
            location_count: DEFAULT_LOCATION_COUNT,
            output: PathBuf::from(DEFAULT_OUTPUT),
            seed: None,
        }
    }
}

impl FixtureConfigBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of data rows.
    #[must_use]
    pub const fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = row_count;
        self
    }

    /// Overrides the number of locations in the pool.
    #[must_use]
    pub const fn with_location_count(mut self, location_count: usize) -> Self {
        self.location_count = location_count;
        self
    }

    /// Overrides the destination path.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Fixes the RNG seed so the fixture content is reproducible.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the RNG seed.
    #[must_use]
    pub const fn with_optional_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured row count.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the configured location count.
    #[must_use]
    pub const fn location_count(&self) -> usize {
        self.location_count
    }

    /// Returns the configured destination path.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Validates the parameters and constructs a [`FixtureConfig`].
    ///
    /// # Errors
    /// Returns [`FixtureError::ZeroRows`] when the row count is zero and
    /// [`FixtureError::TooFewLocations`] when fewer than
    /// [`MIN_LOCATION_COUNT`] locations were requested.
    pub fn build(self) -> Result<FixtureConfig, FixtureError> {
        let row_count = NonZeroUsize::new(self.row_count).ok_or(FixtureError::ZeroRows)?;
        let pool = LocationPool::new(self.location_count)?;
        Ok(FixtureConfig {
            row_count,
            pool,
            output: self.output,
            seed: self.seed,
        })
    }
}
