use std::fs;
use std::path::Path;

use rstest::{fixture, rstest};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use routefix_core::{
    FixtureConfig, FixtureError, FixtureGenerator, HEADER_LINE, LocationId, MAX_TIME, MIN_TIME,
    check_fixture, generate,
};
use routefix_test_support::tracing::RecordingLayer;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[fixture]
fn dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

fn seeded(dir: &TempDir, name: &str, rows: usize, locations: usize, seed: u64) -> FixtureGenerator {
    let config = FixtureConfig::builder()
        .with_row_count(rows)
        .with_location_count(locations)
        .with_output(dir.path().join(name))
        .with_seed(seed)
        .build()
        .expect("valid config");
    FixtureGenerator::new(config)
}

/// Splits a data row into its location numbers and time, asserting the
/// textual shape along the way.
fn parse_row(row: &str, locations: usize) -> (usize, usize, u32) {
    let fields: Vec<&str> = row.split(';').collect();
    let [start, end, time] = fields.as_slice() else {
        panic!("row `{row}` must have three fields");
    };
    let start: LocationId = start.parse().expect("start label");
    let end: LocationId = end.parse().expect("end label");
    assert!(start.get() <= locations, "start outside pool in `{row}`");
    assert!(end.get() <= locations, "end outside pool in `{row}`");
    assert!(
        !time.starts_with('0') && time.bytes().all(|b| b.is_ascii_digit()),
        "time `{time}` must be a plain integer"
    );
    (start.get(), end.get(), time.parse().expect("time"))
}

#[rstest]
fn five_rows_over_three_locations(dir: TempDir) -> TestResult {
    let output = dir.path().join("small.csv");
    let summary = generate(5, 3, &output)?;
    assert_eq!(summary.rows, 5);
    assert_eq!(summary.locations, 3);
    assert_eq!(summary.path, output);

    let text = fs::read_to_string(&output)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines.first().copied(), Some("loc_start;loc_end;time"));
    for row in lines.iter().skip(1) {
        let (start, end, time) = parse_row(row, 3);
        assert_ne!(start, end, "self-loop in `{row}`");
        assert!((1..=100).contains(&time));
    }
    Ok(())
}

#[rstest]
#[case::minimum_pool(200, 2)]
#[case::single_row(1, 10)]
#[case::reference_shape(10_000, 1_000)]
fn generated_fixtures_satisfy_format(
    dir: TempDir,
    #[case] rows: usize,
    #[case] locations: usize,
) -> TestResult {
    let summary = seeded(&dir, "fixture.csv", rows, locations, 17).generate()?;
    let text = fs::read_to_string(&summary.path)?;
    assert_eq!(text.lines().count(), rows + 1);
    assert_eq!(text.lines().next(), Some(HEADER_LINE));
    for row in text.lines().skip(1) {
        let (start, end, time) = parse_row(row, locations);
        assert_ne!(start, end);
        assert!((MIN_TIME..=MAX_TIME).contains(&time));
    }

    let report = check_fixture(&summary.path, Some(locations))?;
    assert!(report.is_valid(), "{:?}", report.violations);
    assert_eq!(report.rows, rows);
    Ok(())
}

#[rstest]
fn two_location_pool_uses_both_directions(dir: TempDir) -> TestResult {
    let summary = seeded(&dir, "pair.csv", 100, 2, 99).generate()?;
    let text = fs::read_to_string(&summary.path)?;
    let rows: Vec<&str> = text.lines().skip(1).collect();
    assert!(rows.iter().all(|row| row.starts_with("LOC1;LOC2;") || row.starts_with("LOC2;LOC1;")));
    assert!(rows.iter().any(|row| row.starts_with("LOC1;LOC2;")));
    assert!(rows.iter().any(|row| row.starts_with("LOC2;LOC1;")));
    Ok(())
}

#[rstest]
fn same_seed_reproduces_fixture(dir: TempDir) -> TestResult {
    let first = seeded(&dir, "first.csv", 500, 40, 2024).generate()?;
    let second = seeded(&dir, "second.csv", 500, 40, 2024).generate()?;
    assert_eq!(fs::read(&first.path)?, fs::read(&second.path)?);
    Ok(())
}

#[rstest]
fn unseeded_runs_share_structure(dir: TempDir) -> TestResult {
    let first = generate(50, 20, dir.path().join("a.csv"))?;
    let second = generate(50, 20, dir.path().join("b.csv"))?;
    let first_text = fs::read_to_string(&first.path)?;
    let second_text = fs::read_to_string(&second.path)?;
    assert_eq!(first_text.lines().count(), second_text.lines().count());
    assert_eq!(first_text.lines().next(), second_text.lines().next());
    assert!(check_fixture(&first.path, Some(20))?.is_valid());
    assert!(check_fixture(&second.path, Some(20))?.is_valid());
    Ok(())
}

#[rstest]
fn existing_file_is_truncated(dir: TempDir) -> TestResult {
    let output = dir.path().join("reuse.csv");
    fs::write(&output, "stale\n".repeat(1_000))?;
    generate(3, 4, &output)?;
    let text = fs::read_to_string(&output)?;
    assert_eq!(text.lines().count(), 4);
    assert!(!text.contains("stale"));
    assert!(!output.with_file_name("reuse.csv.part").exists());
    Ok(())
}

#[rstest]
#[case(0)]
#[case(1)]
fn too_few_locations_fail_before_touching_disk(dir: TempDir, #[case] locations: usize) {
    let output = dir.path().join("never.csv");
    let err = generate(10, locations, &output).expect_err("must be rejected");
    assert!(matches!(err, FixtureError::TooFewLocations { got } if got == locations));
    assert!(err.is_configuration());
    assert!(!output.exists());
}

#[rstest]
fn zero_rows_are_rejected(dir: TempDir) {
    let output = dir.path().join("never.csv");
    let err = generate(0, 10, &output).expect_err("must be rejected");
    assert!(matches!(err, FixtureError::ZeroRows));
    assert!(!output.exists());
}

#[rstest]
fn unwritable_destination_leaves_nothing_behind(dir: TempDir) {
    let output = dir.path().join("missing").join("out.csv");
    let err = generate(10, 10, &output).expect_err("missing directory must fail");
    match &err {
        FixtureError::Io { path, .. } => assert_eq!(path, &output),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.is_configuration());
    assert!(!output.exists());
    assert!(!Path::new(&format!("{}.part", output.display())).exists());
}

#[rstest]
fn generate_records_span_fields(dir: TempDir) -> TestResult {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let generator = seeded(&dir, "traced.csv", 7, 5, 31);

    let summary = tracing::subscriber::with_default(subscriber, || generator.generate())?;
    assert_eq!(summary.seed, 31);

    let span = layer
        .span("fixture.generate")
        .expect("fixture.generate span must exist");
    assert_eq!(span.field("rows"), Some("7"));
    assert_eq!(span.field("locations"), Some("5"));
    assert_eq!(span.field("seed"), Some("31"));
    assert!(span.field("path").is_some_and(|path| path.ends_with("traced.csv")));
    assert!(layer.has_event(Level::INFO, "fixture generated"));
    Ok(())
}

#[rstest]
fn existing_part_file_is_left_alone(dir: TempDir) -> TestResult {
    let output = dir.path().join("data.csv");
    let stale_part = dir.path().join("data.csv.part");
    fs::write(&stale_part, "user notes\n")?;

    seeded(&dir, "data.csv", 4, 3, 12).generate()?;

    assert_eq!(fs::read_to_string(&stale_part)?, "user notes\n");
    assert_eq!(fs::read_to_string(&output)?.lines().count(), 5);
    assert!(!dir.path().join("data.csv.1.part").exists());
    Ok(())
}

#[cfg(unix)]
mod unix {
    use super::*;

    use std::os::unix::fs::{PermissionsExt, symlink};

    #[rstest]
    fn symlinked_destination_is_written_through(dir: TempDir) -> TestResult {
        let target = dir.path().join("real.csv");
        let link = dir.path().join("link.csv");
        fs::write(&target, "old\n")?;
        symlink(&target, &link)?;

        let summary = generate(3, 3, &link)?;
        assert_eq!(summary.path, link);

        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        let text = fs::read_to_string(&target)?;
        assert_eq!(text.lines().next(), Some(HEADER_LINE));
        assert_eq!(text.lines().count(), 4);
        assert!(!text.contains("old"));
        assert!(check_fixture(&link, Some(3))?.is_valid());
        Ok(())
    }

    #[rstest]
    fn relative_symlink_resolves_beside_link(dir: TempDir) -> TestResult {
        let nested = dir.path().join("store");
        fs::create_dir(&nested)?;
        let link = dir.path().join("current.csv");
        symlink(Path::new("store").join("fixture.csv"), &link)?;

        generate(2, 2, &link)?;

        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        assert_eq!(fs::read_to_string(nested.join("fixture.csv"))?.lines().count(), 3);
        Ok(())
    }

    #[rstest]
    fn existing_destination_keeps_its_mode(dir: TempDir) -> TestResult {
        let output = dir.path().join("shared.csv");
        fs::write(&output, "old\n")?;
        fs::set_permissions(&output, fs::Permissions::from_mode(0o640))?;

        generate(3, 3, &output)?;

        let mode = fs::metadata(&output)?.permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        Ok(())
    }
}
