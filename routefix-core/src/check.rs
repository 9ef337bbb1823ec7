//! Strict verification of generated fixtures.
//!
//! Unlike the lenient reader, the checker reports every deviation from the
//! generator's output contract with its line number instead of skipping it.

use std::{
    collections::BTreeSet,
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use tracing::{debug, instrument};

use crate::{
    error::FixtureError,
    format::{DELIMITER, HEADER_LINE, MAX_TIME, MIN_TIME},
    location::LocationId,
};

/// Kind of deviation found in a fixture line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// The fixture has no lines at all.
    MissingHeader,
    /// The first line differs from `loc_start;loc_end;time`.
    BadHeader {
        /// The header found in the file.
        found: String,
    },
    /// A data line does not have exactly three fields.
    FieldCount {
        /// Number of fields found.
        found: usize,
    },
    /// A location is not a `LOC<n>` label inside the expected pool.
    UnknownLocation {
        /// The offending label.
        label: String,
    },
    /// A connection starts and ends at the same location.
    SelfLoop {
        /// The repeated label.
        label: String,
    },
    /// The time field is not an unsigned integer.
    InvalidTime {
        /// The raw time field.
        raw: String,
    },
    /// The time lies outside `MIN_TIME..=MAX_TIME`.
    TimeOutOfRange {
        /// The parsed time.
        time: u32,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "missing header `{HEADER_LINE}`"),
            Self::BadHeader { found } => {
                write!(f, "header `{found}` differs from `{HEADER_LINE}`")
            }
            Self::FieldCount { found } => write!(f, "expected 3 fields, found {found}"),
            Self::UnknownLocation { label } => write!(f, "unknown location `{label}`"),
            Self::SelfLoop { label } => write!(f, "connection from `{label}` to itself"),
            Self::InvalidTime { raw } => write!(f, "time `{raw}` is not an integer"),
            Self::TimeOutOfRange { time } => {
                write!(f, "time {time} outside {MIN_TIME}..={MAX_TIME}")
            }
        }
    }
}

/// A deviation found on a specific, one-based line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// One-based line number.
    pub line: usize,
    /// What is wrong with the line.
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Result of checking a fixture.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Number of data lines, excluding the header.
    pub rows: usize,
    /// Number of distinct valid locations referenced by the data lines.
    pub locations: usize,
    /// Every deviation found, in line order.
    pub violations: Vec<Violation>,
}

impl CheckReport {
    /// Returns `true` when the fixture satisfies every format rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Checks a fixture read from `reader`.
///
/// When `expected_locations` is given, every location must lie in
/// `LOC1..=LOC<expected_locations>`.
///
/// # Errors
/// Returns any [`io::Error`] raised while reading lines.
///
/// # Examples
/// ```
/// use routefix_core::{ViolationKind, check_reader};
///
/// let input = "loc_start;loc_end;time\nLOC1;LOC2;5\nLOC3;LOC3;101\n";
/// let report = check_reader(input.as_bytes(), Some(3)).expect("in-memory read");
/// assert_eq!(report.rows, 2);
/// assert_eq!(report.violations.len(), 2);
/// assert!(matches!(report.violations[0].kind, ViolationKind::SelfLoop { .. }));
/// ```
pub fn check_reader<R: BufRead>(
    reader: R,
    expected_locations: Option<usize>,
) -> io::Result<CheckReport> {
    let mut checker = LineChecker {
        expected_locations,
        seen: BTreeSet::new(),
        report: CheckReport::default(),
    };
    let mut lines = reader.lines();

    match lines.next().transpose()? {
        None => checker.push(1, ViolationKind::MissingHeader),
        Some(header) if header != HEADER_LINE => {
            checker.push(1, ViolationKind::BadHeader { found: header });
        }
        Some(_) => {}
    }

    for (offset, next) in lines.enumerate() {
        let line = next?;
        checker.check_row(offset + 2, &line);
    }

    checker.report.locations = checker.seen.len();
    Ok(checker.report)
}

/// Opens `path` and checks it.
///
/// # Errors
/// Returns [`FixtureError::Io`] when the file cannot be opened or read.
#[instrument(
    name = "fixture.check",
    err,
    skip(path),
    fields(path = %path.display(), expected_locations = ?expected_locations),
)]
pub fn check_fixture(
    path: &Path,
    expected_locations: Option<usize>,
) -> Result<CheckReport, FixtureError> {
    let file = File::open(path).map_err(|source| FixtureError::io(path, source))?;
    let report = check_reader(BufReader::new(file), expected_locations)
        .map_err(|source| FixtureError::io(path, source))?;
    debug!(
        rows = report.rows,
        locations = report.locations,
        violations = report.violations.len(),
        "fixture checked"
    );
    Ok(report)
}

struct LineChecker {
    expected_locations: Option<usize>,
    seen: BTreeSet<LocationId>,
    report: CheckReport,
}

impl LineChecker {
    fn push(&mut self, line: usize, kind: ViolationKind) {
        self.report.violations.push(Violation { line, kind });
    }

    fn check_row(&mut self, line: usize, content: &str) {
        self.report.rows += 1;
        let fields: Vec<&str> = content.split(DELIMITER).collect();
        let [start, end, time] = fields.as_slice() else {
            self.push(
                line,
                ViolationKind::FieldCount {
                    found: fields.len(),
                },
            );
            return;
        };

        let start_known = self.check_location(line, start);
        let end_known = self.check_location(line, end);
        if start_known && end_known && start == end {
            self.push(
                line,
                ViolationKind::SelfLoop {
                    label: (*start).to_owned(),
                },
            );
        }

        match time.parse::<u32>() {
            Ok(value) if (MIN_TIME..=MAX_TIME).contains(&value) => {}
            Ok(value) => self.push(line, ViolationKind::TimeOutOfRange { time: value }),
            Err(_) => self.push(
                line,
                ViolationKind::InvalidTime {
                    raw: (*time).to_owned(),
                },
            ),
        }
    }

    fn check_location(&mut self, line: usize, label: &str) -> bool {
        let in_pool = label.parse::<LocationId>().ok().filter(|id| {
            self.expected_locations
                .is_none_or(|bound| id.get() <= bound)
        });
        match in_pool {
            Some(id) => {
                self.seen.insert(id);
                true
            }
            None => {
                self.push(
                    line,
                    ViolationKind::UnknownLocation {
                        label: label.to_owned(),
                    },
                );
                false
            }
        }
    }
}
