//! Lenient fixture loading, matching how route services ingest connection
//! files.
//!
//! Lines without exactly three `;`-separated fields are ignored. Fields are
//! trimmed, and a line whose time is not an unsigned integer is skipped with a
//! warning. The header is recognised and skipped without a warning.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use tracing::{instrument, warn};

use crate::{
    error::FixtureError,
    format::{DELIMITER, HEADER_LINE},
};

/// A connection parsed back from a fixture.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Origin location name.
    pub start: String,
    /// Destination location name.
    pub end: String,
    /// Travel time.
    pub time: u32,
}

/// Connections loaded from a fixture, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadedConnections {
    /// Parsed connections.
    pub connections: Vec<Connection>,
    /// Data lines that were ignored, excluding the header.
    pub skipped: usize,
}

/// Reads connections from `reader`.
///
/// Lines are decoded lossily, so a stray invalid UTF-8 byte only affects the
/// line it appears on.
///
/// # Errors
/// Returns any [`io::Error`] raised by the underlying reader.
///
/// # Examples
/// ```
/// use routefix_core::read_connections;
///
/// let input = "loc_start;loc_end;time\nLOC1;LOC2;7\nbroken\nLOC2;LOC1;x\n";
/// let loaded = read_connections(input.as_bytes()).expect("in-memory read");
/// assert_eq!(loaded.connections.len(), 1);
/// assert_eq!(loaded.skipped, 2);
/// ```
pub fn read_connections<R: BufRead>(mut reader: R) -> io::Result<LoadedConnections> {
    let mut loaded = LoadedConnections::default();
    let mut buffer = Vec::new();
    let mut number = 0_usize;
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        number += 1;
        let raw = String::from_utf8_lossy(&buffer);
        let line = raw.trim_end_matches(['\n', '\r']);
        if number == 1 && line.trim() == HEADER_LINE {
            continue;
        }
        match parse_line(line) {
            ParsedLine::Connection(connection) => loaded.connections.push(connection),
            ParsedLine::WrongFieldCount => loaded.skipped += 1,
            ParsedLine::InvalidTime => {
                warn!(line = number, content = %line, "skipping line with invalid time");
                loaded.skipped += 1;
            }
        }
    }
    Ok(loaded)
}

/// Opens `path` and reads its connections.
///
/// # Errors
/// Returns [`FixtureError::Io`] when the file cannot be opened or read.
#[instrument(name = "fixture.load", err, skip(path), fields(path = %path.display()))]
pub fn load_connections(path: &Path) -> Result<LoadedConnections, FixtureError> {
    let file = File::open(path).map_err(|source| FixtureError::io(path, source))?;
    read_connections(BufReader::new(file)).map_err(|source| FixtureError::io(path, source))
}

enum ParsedLine {
    Connection(Connection),
    WrongFieldCount,
    InvalidTime,
}

fn parse_line(line: &str) -> ParsedLine {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    let [start, end, time] = fields.as_slice() else {
        return ParsedLine::WrongFieldCount;
    };
    match time.trim().parse::<u32>() {
        Ok(time) => ParsedLine::Connection(Connection {
            start: start.trim().to_owned(),
            end: end.trim().to_owned(),
            time,
        }),
        Err(_) => ParsedLine::InvalidTime,
    }
}
