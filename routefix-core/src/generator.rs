//! Fixture generation.
//!
//! Symlinks in the destination are followed first, so the file that actually
//! receives the fixture is the link target. Rows are streamed to a freshly
//! created `<name>.part` sibling of that target, which replaces it only after
//! every row has been written and flushed. A failed run removes the partial
//! file, so callers never observe a truncated fixture under the destination
//! name.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use rand::{SeedableRng, rngs::SmallRng};
use tracing::{Span, debug, field, info, instrument};

use crate::{
    config::FixtureConfig, error::FixtureError, format::HEADER_LINE, sampler::EdgeSampler,
};

/// Symlink hops followed before a destination is considered a loop.
const MAX_LINK_DEPTH: usize = 40;

/// Partial file names tried beside the destination before giving up.
const MAX_PART_ATTEMPTS: usize = 16;

/// Outcome of a successful generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Path the fixture was written to.
    pub path: PathBuf,
    /// Number of data rows written, excluding the header.
    pub rows: usize,
    /// Number of locations in the pool.
    pub locations: usize,
    /// Seed that drove the RNG; pass it back to reproduce the fixture.
    pub seed: u64,
}

/// Writes connection fixtures for a validated [`FixtureConfig`].
///
/// The RNG seed is fixed when the generator is created: either the seed from
/// the configuration or a fresh random one.
///
/// # Examples
/// ```
/// use routefix_core::{FixtureConfig, FixtureGenerator};
///
/// let config = FixtureConfig::builder()
///     .with_row_count(3)
///     .with_location_count(2)
///     .with_seed(5)
///     .build()
///     .expect("configuration is valid");
/// let mut buffer = Vec::new();
/// FixtureGenerator::new(config).generate_into(&mut buffer).expect("in-memory write");
/// let text = String::from_utf8(buffer).expect("fixtures are UTF-8");
/// assert_eq!(text.lines().count(), 4);
/// assert_eq!(text.lines().next(), Some("loc_start;loc_end;time"));
/// ```
#[derive(Clone, Debug)]
pub struct FixtureGenerator {
    config: FixtureConfig,
    seed: u64,
}

impl FixtureGenerator {
    /// Creates a generator, resolving the RNG seed.
    #[must_use]
    pub fn new(config: FixtureConfig) -> Self {
        let seed = config.seed().unwrap_or_else(rand::random);
        Self { config, seed }
    }

    /// Seed used for every fixture this generator writes.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Configuration the generator was created with.
    #[must_use]
    pub const fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Writes the header and every data row to `writer`.
    ///
    /// Output depends only on the configuration and the seed.
    ///
    /// # Errors
    /// Returns any [`io::Error`] raised by `writer`.
    pub fn generate_into<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{HEADER_LINE}")?;
        let sampler = EdgeSampler::new(
            self.config.location_pool(),
            SmallRng::seed_from_u64(self.seed),
        );
        for edge in sampler.take(self.config.row_count().get()) {
            writeln!(writer, "{edge}")?;
        }
        Ok(())
    }

    /// Writes the fixture to the configured output path, replacing any
    /// existing file.
    ///
    /// A symlinked destination is written through: the link is kept and its
    /// target receives the new contents. An existing target keeps its
    /// permissions.
    ///
    /// # Errors
    /// Returns [`FixtureError::Io`] when the destination cannot be written.
    /// On failure the destination is left untouched and the partial file is
    /// removed; pre-existing `.part` files are never opened.
    #[instrument(
        name = "fixture.generate",
        err,
        skip(self),
        fields(
            path = %self.config.output().display(),
            rows = self.config.row_count().get(),
            locations = self.config.location_pool().len(),
            seed = field::Empty,
        ),
    )]
    pub fn generate(&self) -> Result<GenerationSummary, FixtureError> {
        Span::current().record("seed", self.seed);
        let path = self.config.output();
        let target = resolve_destination(path).map_err(|source| FixtureError::io(path, source))?;
        let (part, file) = create_part(&target).map_err(|source| FixtureError::io(path, source))?;

        let written = self
            .write_part(file)
            .and_then(|()| adopt_permissions(&target, &part))
            .and_then(|()| fs::rename(&part, &target));
        if let Err(source) = written {
            discard_part(&part);
            return Err(FixtureError::io(path, source));
        }

        let summary = GenerationSummary {
            path: path.to_path_buf(),
            rows: self.config.row_count().get(),
            locations: self.config.location_pool().len(),
            seed: self.seed,
        };
        info!(
            path = %summary.path.display(),
            target = %target.display(),
            rows = summary.rows,
            seed = summary.seed,
            "fixture generated"
        );
        Ok(summary)
    }

    fn write_part(&self, file: File) -> io::Result<()> {
        let mut writer = BufWriter::new(file);
        self.generate_into(&mut writer)?;
        let flushed = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        flushed.sync_all()
    }
}

/// Generates `row_count` rows over `location_count` locations into `output`
/// with a random seed.
///
/// # Errors
/// Returns a configuration error when `row_count` is zero or
/// `location_count` is below two, and [`FixtureError::Io`] when `output`
/// cannot be written.
pub fn generate(
    row_count: usize,
    location_count: usize,
    output: impl Into<PathBuf>,
) -> Result<GenerationSummary, FixtureError> {
    let config = FixtureConfig::builder()
        .with_row_count(row_count)
        .with_location_count(location_count)
        .with_output(output)
        .build()?;
    FixtureGenerator::new(config).generate()
}

/// Follows symlinks from `path` to the file that should receive the fixture.
///
/// Dangling links resolve to their missing target, which is then created.
fn resolve_destination(path: &Path) -> io::Result<PathBuf> {
    let mut resolved = path.to_path_buf();
    for _ in 0..MAX_LINK_DEPTH {
        match fs::symlink_metadata(&resolved) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                let link = fs::read_link(&resolved)?;
                // `join` keeps absolute link targets as they are.
                resolved = match resolved.parent() {
                    Some(parent) => parent.join(link),
                    None => link,
                };
            }
            Ok(_) => return Ok(resolved),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(resolved),
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::other(format!(
        "more than {MAX_LINK_DEPTH} symbolic links while resolving `{}`",
        path.display()
    )))
}

/// Creates a fresh partial file beside `target`, skipping names already taken.
fn create_part(target: &Path) -> io::Result<(PathBuf, File)> {
    for attempt in 0..MAX_PART_ATTEMPTS {
        let part = part_path(target, attempt);
        match OpenOptions::new().write(true).create_new(true).open(&part) {
            Ok(file) => return Ok((part, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = %part.display(), "partial file name taken");
            }
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!(
            "no free partial file name beside `{}` after {MAX_PART_ATTEMPTS} attempts",
            target.display()
        ),
    ))
}

fn part_path(target: &Path, attempt: usize) -> PathBuf {
    let mut name = target
        .file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_default();
    if attempt == 0 {
        name.push(".part");
    } else {
        name.push(format!(".{attempt}.part"));
    }
    target.with_file_name(name)
}

fn adopt_permissions(target: &Path, part: &Path) -> io::Result<()> {
    match fs::metadata(target) {
        Ok(metadata) => fs::set_permissions(part, metadata.permissions()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

fn discard_part(part: &Path) {
    match fs::remove_file(part) {
        Ok(()) => debug!(path = %part.display(), "removed partial fixture"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => debug!(path = %part.display(), error = %err, "could not remove partial fixture"),
    }
}
