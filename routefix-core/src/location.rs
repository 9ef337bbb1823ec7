//! Synthetic location identifiers and the pool they are drawn from.
//!
//! Locations are labelled `LOC1`, `LOC2`, ... `LOC<n>`. The pool is the dense,
//! ordered range of those identifiers; labels are rendered on demand rather
//! than stored, so a pool of any size costs the same to build.

use std::{fmt, num::NonZeroUsize, str::FromStr};

use rand::Rng;
use thiserror::Error;

use crate::{config::MIN_LOCATION_COUNT, error::FixtureError};

/// Prefix shared by every generated location label.
pub const LOCATION_PREFIX: &str = "LOC";

/// A one-based synthetic location identifier rendered as `LOC<n>`.
///
/// # Examples
/// ```
/// use routefix_core::LocationId;
///
/// let id: LocationId = "LOC7".parse().expect("canonical label");
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.to_string(), "LOC7");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LocationId(NonZeroUsize);

impl LocationId {
    /// Creates an identifier from its one-based number, rejecting zero.
    #[must_use]
    pub const fn new(number: usize) -> Option<Self> {
        match NonZeroUsize::new(number) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Returns the one-based number of the identifier.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    const fn from_index(index: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(index))
    }

    const fn index(self) -> usize {
        self.0.get() - 1
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LOCATION_PREFIX}{}", self.0)
    }
}

/// Error returned when a label is not a canonical `LOC<n>` identifier.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("`{label}` is not a location label of the form LOC<n> with n >= 1")]
pub struct ParseLocationError {
    /// The rejected label.
    pub label: String,
}

impl FromStr for LocationId {
    type Err = ParseLocationError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let reject = || ParseLocationError {
            label: label.to_owned(),
        };
        let digits = label.strip_prefix(LOCATION_PREFIX).ok_or_else(reject)?;
        // Only canonical labels: no sign, no leading zeros, no whitespace.
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(reject());
        }
        let number = digits.parse::<usize>().map_err(|_| reject())?;
        Self::new(number).ok_or_else(reject)
    }
}

/// The ordered pool of locations `LOC1..=LOC<n>` used by one generation run.
///
/// A pool always holds at least two locations so that a connection between two
/// distinct locations can be drawn.
///
/// # Examples
/// ```
/// use routefix_core::LocationPool;
///
/// let pool = LocationPool::new(3).expect("three locations are enough");
/// let labels: Vec<String> = pool.iter().map(|id| id.to_string()).collect();
/// assert_eq!(labels, ["LOC1", "LOC2", "LOC3"]);
/// assert!(LocationPool::new(1).is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LocationPool {
    count: usize,
}

impl LocationPool {
    /// Creates a pool of `count` locations.
    ///
    /// # Errors
    /// Returns [`FixtureError::TooFewLocations`] when `count` is below
    /// [`MIN_LOCATION_COUNT`].
    pub fn new(count: usize) -> Result<Self, FixtureError> {
        if count < MIN_LOCATION_COUNT {
            return Err(FixtureError::TooFewLocations { got: count });
        }
        Ok(Self { count })
    }

    /// Number of locations in the pool.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Always `false`; a pool holds at least two locations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterates the pool in order, from `LOC1` to `LOC<n>`.
    pub fn iter(&self) -> impl Iterator<Item = LocationId> + use<> {
        (0..self.count).map(LocationId::from_index)
    }

    /// Returns `true` when `id` belongs to the pool.
    #[must_use]
    pub const fn contains(&self, id: LocationId) -> bool {
        id.get() <= self.count
    }

    /// Draws a location uniformly at random.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> LocationId {
        LocationId::from_index(rng.gen_range(0..self.count))
    }

    /// Draws a location uniformly at random from every location except
    /// `excluded`, which must belong to the pool.
    ///
    /// The draw picks one of the `n - 1` remaining slots and shifts it past
    /// the excluded index, so it always completes in a single draw.
    pub fn sample_other<R: Rng + ?Sized>(&self, rng: &mut R, excluded: LocationId) -> LocationId {
        debug_assert!(self.contains(excluded), "excluded location outside pool");
        let slot = rng.gen_range(0..self.count - 1);
        if slot >= excluded.index() {
            LocationId::from_index(slot + 1)
        } else {
            LocationId::from_index(slot)
        }
    }
}
