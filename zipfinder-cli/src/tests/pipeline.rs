//! End-to-end coverage for the import and search commands.

use super::helpers::{Dataset, output};
use crate::import::{ImportArgs, run_import};
use crate::search::{SearchArgs, run_search};
use crate::*;
use rstest::{fixture, rstest};
use rusqlite::Connection;
use zipfinder_core::SearchResult;

#[fixture]
fn imported() -> Dataset {
    let dataset = Dataset::new();
    let args = ImportArgs {
        source: Some(dataset.source()),
        database_dir: Some(dataset.database_dir()),
        ..ImportArgs::default()
    };
    run_import(args, Vec::new()).expect("import succeeds");
    dataset
}

fn search_args(dataset: &Dataset, query: &str) -> SearchArgs {
    SearchArgs {
        query: Some(query.into()),
        database: Some(dataset.database_dir().join("zipcodes.sqlite")),
        ..SearchArgs::default()
    }
}

#[rstest]
fn import_prints_progress_and_summary() {
    let dataset = Dataset::new();
    let args = ImportArgs {
        source: Some(dataset.source()),
        database_dir: Some(dataset.database_dir()),
        database_name: Some("pt".into()),
        ..ImportArgs::default()
    };
    let mut out = Vec::new();

    let report = run_import(args, &mut out).expect("import succeeds");

    assert_eq!(report.zipcodes, 1);
    let printed = output(out);
    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(lines.first(), Some(&"Creating database tables"));
    assert_eq!(
        lines.last(),
        Some(&"[OK] Import completed: 1 districts, 1 municipalities, 1 zipcodes, 0 failed")
    );
    assert!(lines.contains(&"[OK] All data imported successfully"));
    let connection =
        Connection::open(dataset.database_dir().join("pt.sqlite")).expect("open database");
    let zipcodes: i64 = connection
        .query_row("SELECT COUNT(*) FROM zipcodes", [], |row| row.get(0))
        .expect("count zipcodes");
    assert_eq!(zipcodes, 1);
}

#[rstest]
fn import_surfaces_pipeline_failure() {
    let dataset = Dataset::new();
    dataset.write_source(
        "zipcodes.csv",
        "99;0101;35;Lisboa;;;;;;Orphan;;;;;4000;001;PORTO\n",
    );
    let args = ImportArgs {
        source: Some(dataset.source()),
        database_dir: Some(dataset.database_dir()),
        ..ImportArgs::default()
    };
    let mut out = Vec::new();

    let err = run_import(args, &mut out).expect_err("foreign key failure");

    assert!(matches!(err, CliError::Import { .. }));
    let printed = output(out);
    assert!(
        printed
            .lines()
            .any(|line| line.starts_with("[ERROR] Error importing data:")),
        "missing error line in {printed}"
    );
}

#[rstest]
fn search_prints_formatted_lines(imported: Dataset) {
    let mut out = Vec::new();

    run_search(search_args(&imported, "augusta"), &mut out).expect("search succeeds");

    assert_eq!(
        output(out),
        "1000-001  LISBOA  Rua Augusta  Lisboa, Lisboa, Lisboa\n"
    );
}

#[rstest]
fn search_prints_json(imported: Dataset) {
    let args = SearchArgs {
        json: true,
        by: Some("code".into()),
        ..search_args(&imported, "1000-001")
    };
    let mut out = Vec::new();

    run_search(args, &mut out).expect("search succeeds");

    let results: Vec<SearchResult> =
        serde_json::from_slice(&out).expect("valid JSON results");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].district_name(), "Lisboa");
    assert_eq!(results[0].full_zipcode(), "1000-001");
}

#[rstest]
fn search_prints_nothing_without_matches(imported: Dataset) {
    let mut out = Vec::new();

    run_search(search_args(&imported, "Porto"), &mut out).expect("search succeeds");

    assert!(out.is_empty());
}

#[rstest]
fn search_reports_missing_database() {
    let dataset = Dataset::new();

    let err = run_search(search_args(&dataset, "Lisboa"), Vec::new()).expect_err("no database");

    assert!(matches!(err, CliError::Search(_)));
}

#[rstest]
fn dispatch_routes_subcommands(imported: Dataset) {
    let mut out = Vec::new();

    dispatch(
        Command::Search(search_args(&imported, "1000")),
        &mut out,
    )
    .expect("dispatch search");

    assert_eq!(output(out).lines().count(), 1);
}
