//! Constants describing the on-disk fixture format.

/// Field separator used by every fixture row.
pub const DELIMITER: char = ';';

/// Exact header written as the first line of every fixture.
pub const HEADER_LINE: &str = "loc_start;loc_end;time";

/// Smallest travel time the generator emits.
pub const MIN_TIME: u32 = 1;

/// Largest travel time the generator emits.
pub const MAX_TIME: u32 = 100;
