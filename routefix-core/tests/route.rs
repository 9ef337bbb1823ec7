use std::fs;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use routefix_core::{
    FixtureConfig, FixtureGenerator, RouteError, RouteGraph, load_connections, read_connections,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
fn generated_fixture_loads_every_row() -> TestResult {
    let dir = TempDir::new()?;
    let config = FixtureConfig::builder()
        .with_row_count(2_000)
        .with_location_count(100)
        .with_output(dir.path().join("load.csv"))
        .with_seed(5)
        .build()?;
    let summary = FixtureGenerator::new(config).generate()?;

    let loaded = load_connections(&summary.path)?;
    assert_eq!(loaded.connections.len(), 2_000);
    assert_eq!(loaded.skipped, 0);
    assert!(loaded.connections.iter().all(|c| c.start != c.end));

    let graph = RouteGraph::from_connections(loaded.connections);
    assert_eq!(graph.connection_count(), 2_000);
    assert!(graph.location_count() <= 100);
    Ok(())
}

#[rstest]
fn route_over_handwritten_fixture() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("routes.csv");
    fs::write(
        &path,
        "loc_start;loc_end;time\n\
         LOC1;LOC2;10\n\
         LOC2;LOC3;10\n\
         LOC1;LOC3;30\n\
         LOC3;LOC4;1\n\
         not;a;number\n\
         LOC5;LOC1;2\n",
    )?;
    let loaded = load_connections(&path)?;
    assert_eq!(loaded.skipped, 1);

    let graph = RouteGraph::from_connections(loaded.connections);
    let route = graph
        .fastest_route("LOC1", "LOC4")?
        .expect("LOC4 is reachable from LOC1");
    assert_eq!(route.locations, ["LOC1", "LOC2", "LOC3", "LOC4"]);
    assert_eq!(route.total_time, 21);

    assert_eq!(graph.fastest_route("LOC4", "LOC5")?, None);
    assert!(matches!(
        graph.fastest_route("LOC1", "LOC6"),
        Err(RouteError::UnknownLocation { name }) if name == "LOC6"
    ));
    Ok(())
}

#[rstest]
fn missing_fixture_reports_path() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.csv");
    let err = load_connections(&path).expect_err("missing file must fail");
    assert!(err.to_string().contains("absent.csv"));
}

const CHECKPOINTS: &str = "loc_start;loc_end;time\n\
    R11;R12;20\n\
    R12;R13;9\n\
    R13;R12;11\n\
    R13;R20;9\n\
    R20;R13;11\n\
    CP1;R11;84\n\
    R11;CP1;92\n\
    CP1;CP2;7\n\
    CP2;CP1;10\n\
    CP2;R20;67\n\
    R20;CP2;60";

fn graph_from(text: &str) -> RouteGraph {
    let loaded = read_connections(text.as_bytes()).expect("in-memory read");
    RouteGraph::from_connections(loaded.connections)
}

#[fixture]
fn checkpoints() -> RouteGraph {
    graph_from(CHECKPOINTS)
}

#[rstest]
#[case::direct_detour("CP1", "R20", &["CP1", "CP2", "R20"], 74)]
#[case::through_cycle("CP1", "R13", &["CP1", "CP2", "R20", "R13"], 85)]
#[case::to_self("CP1", "CP1", &["CP1"], 0)]
#[case::back_to_start("R13", "CP1", &["R13", "R20", "CP2", "CP1"], 79)]
#[case::chain("R11", "R20", &["R11", "R12", "R13", "R20"], 38)]
fn checkpoint_routes(
    checkpoints: RouteGraph,
    #[case] origin: &str,
    #[case] destination: &str,
    #[case] expected: &[&str],
    #[case] total: u64,
) -> TestResult {
    let route = checkpoints
        .fastest_route(origin, destination)?
        .expect("checkpoint graph is strongly connected");
    assert_eq!(route.locations, expected);
    assert_eq!(route.total_time, total);
    Ok(())
}

#[rstest]
fn checkpoint_graph_rejects_unknown_destination(checkpoints: RouteGraph) {
    assert_eq!(
        checkpoints.fastest_route("CP1", "NonExistent"),
        Err(RouteError::UnknownLocation {
            name: "NonExistent".to_owned()
        })
    );
}

#[rstest]
#[case::with_header(
    "loc_start;loc_end;time\nCP1;R11;84\nR11;R12;20\nR12;R13;9",
    "CP1",
    "R13",
    Some(113)
)]
#[case::invalid_line_ignored("CP1;R11;84\nInvalidLine\nR11;R12;20", "CP1", "R12", Some(104))]
#[case::disconnected("loc_start;loc_end;time\nA;B;10\nC;D;20", "A", "C", None)]
fn small_fixture_totals(
    #[case] text: &str,
    #[case] origin: &str,
    #[case] destination: &str,
    #[case] total: Option<u64>,
) -> TestResult {
    let route = graph_from(text).fastest_route(origin, destination)?;
    assert_eq!(route.map(|route| route.total_time), total);
    Ok(())
}
