//! Behavioural tests for searching a database produced by the importer.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::{cell::RefCell, collections::BTreeSet};
use zipfinder_core::{AddressLookup, DEFAULT_SEARCH_LIMIT, SearchField, SearchResult};
use zipfinder_data::{ZipcodeFinder, ZipcodeImporter};

mod support;

use support::{DISTRICTS, Workspace, lines, zipcode_line};

struct SearchWorld {
    workspace: Workspace,
    results: RefCell<Vec<SearchResult>>,
}

impl SearchWorld {
    fn search(&self, field: SearchField, query: &str, limit: usize) {
        let finder = ZipcodeFinder::open(&self.workspace.database()).expect("open finder");
        let results = finder.search(field, query, limit).expect("search");
        self.results.replace(results);
    }
}

#[fixture]
fn world() -> SearchWorld {
    SearchWorld {
        workspace: Workspace::new(),
        results: RefCell::new(Vec::new()),
    }
}

#[given("an imported database with Lisboa and Porto addresses")]
fn imported_database(#[from(world)] world: &SearchWorld) {
    let workspace = &world.workspace;
    let porto = "13;1312;50;Porto;;Rua;de;;;Santa Catarina;;;;;4000;001;PORTO";
    let rows = [
        zipcode_line("Augusta", "1000", "001"),
        zipcode_line("Aurea", "1000", "002"),
        zipcode_line("Prata", "1100", "053"),
        porto.to_owned(),
    ];
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let districts = [DISTRICTS, b"13;Porto\n".as_slice()].concat();
    workspace.write_sources(
        &districts,
        &lines(&["01;0101;Lisboa", "13;1312;Porto"]),
        &lines(&rows),
    );
    workspace.create_database();

    let report = ZipcodeImporter::new().import(&workspace.source_dir(), &workspace.database());
    assert!(report.is_success(), "import failed: {:?}", report.failure());
    assert_eq!(report.zipcodes, 4);
}

#[when("I search codes for {query}")]
fn search_codes(#[from(world)] world: &SearchWorld, query: String) {
    world.search(SearchField::Code, query.trim_matches('"'), DEFAULT_SEARCH_LIMIT);
}

#[when("I search localities for {query}")]
fn search_localities(#[from(world)] world: &SearchWorld, query: String) {
    world.search(
        SearchField::Locality,
        query.trim_matches('"'),
        DEFAULT_SEARCH_LIMIT,
    );
}

#[when("I search everything for {query} with a limit of {limit}")]
fn search_everything(#[from(world)] world: &SearchWorld, query: String, limit: usize) {
    world.search(SearchField::All, query.trim_matches('"'), limit);
}

#[then("I get the zipcodes {codes}")]
fn expect_codes(#[from(world)] world: &SearchWorld, codes: String) {
    let expected: BTreeSet<&str> = codes.trim_matches('"').split(',').collect();
    let found: Vec<String> = world
        .results
        .borrow()
        .iter()
        .map(SearchResult::full_zipcode)
        .collect();
    let found: BTreeSet<&str> = found.iter().map(String::as_str).collect();
    assert_eq!(found, expected);
}

#[then("I get {count} results")]
fn expect_count(#[from(world)] world: &SearchWorld, count: usize) {
    assert_eq!(world.results.borrow().len(), count);
}

#[scenario(path = "tests/features/search.feature", index = 0)]
fn code_with_and_without_extension(world: SearchWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/search.feature", index = 1)]
fn locality_case_insensitive(world: SearchWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/search.feature", index = 2)]
fn limit_caps_results(world: SearchWorld) {
    let _ = world;
}
