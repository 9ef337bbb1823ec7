//! Benchmark support crate for routefix.
//!
//! Provides parameter types, setup errors, and in-memory fixture builders
//! used by the Criterion benchmarks for fixture generation and route search.

pub mod error;
pub mod fixture;
pub mod params;
