use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::Connection;
use std::fs;
use tempfile::TempDir;

/// One district, Lisboa.
pub const DISTRICTS: &[u8] = b"01;Lisboa\n";

/// One municipality in district 01, listed district first.
pub const MUNICIPALITIES: &[u8] = b"01;0101;Lisboa\n";

/// A zipcode on Rua Augusta with most descriptors left blank.
pub const AUGUSTA: &str = "01;0101;35;Lisboa;;Rua;;;;Augusta;;;;;1000;001;LISBOA";

/// Build a zipcode line for district 01, municipality 0101.
pub fn zipcode_line(street: &str, zipcode: &str, extension: &str) -> String {
    format!("01;0101;35;Lisboa;;Rua;;;;{street};;;;;{zipcode};{extension};LISBOA")
}

/// Scratch directory holding a source folder and a target database path.
pub struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .unwrap_or_else(|path| panic!("temp dir {path:?} is not UTF-8"));
        fs::create_dir(root.join("source")).expect("create source dir");
        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn source_dir(&self) -> Utf8PathBuf {
        self.root.join("source")
    }

    pub fn database(&self) -> Utf8PathBuf {
        self.root.join("zipcodes.sqlite")
    }

    pub fn write_source(&self, file_name: &str, contents: &[u8]) {
        fs::write(self.source_dir().join(file_name), contents).expect("write source file");
    }

    /// Write all three source files.
    pub fn write_sources(&self, districts: &[u8], municipalities: &[u8], zipcodes: &[u8]) {
        self.write_source("districts.csv", districts);
        self.write_source("municipalities.csv", municipalities);
        self.write_source("zipcodes.csv", zipcodes);
    }

    /// Allocate the empty database file the importer expects.
    pub fn create_database(&self) {
        fs::write(self.database(), b"").expect("create database file");
    }

    pub fn connection(&self) -> Connection {
        Connection::open(self.database()).expect("open database")
    }

    pub fn count(&self, sql: &str) -> i64 {
        self.connection()
            .query_row(sql, [], |row| row.get(0))
            .unwrap_or_else(|err| panic!("query {sql:?} failed: {err}"))
    }
}

/// Join lines with `\n` and terminate the last one.
pub fn lines(rows: &[&str]) -> Vec<u8> {
    let mut joined = rows.join("\n");
    joined.push('\n');
    joined.into_bytes()
}
