//! Test helpers for laying out source directories and database targets.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

pub(super) const DISTRICTS: &str = "01;Lisboa\n";
pub(super) const MUNICIPALITIES: &str = "01;0101;Lisboa\n";
pub(super) const ZIPCODES: &str =
    "01;0101;35;Lisboa;;Rua;;;;Augusta;;;;;1000;001;LISBOA\n";

/// Temporary `source/` and `db/` directories.
pub(super) struct Dataset {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Dataset {
    /// Create both directories and write all three source files.
    pub(super) fn new() -> Self {
        let dataset = Self::empty();
        for (name, contents) in [
            ("districts.csv", DISTRICTS),
            ("municipalities.csv", MUNICIPALITIES),
            ("zipcodes.csv", ZIPCODES),
        ] {
            dataset.write_source(name, contents);
        }
        dataset
    }

    /// Create both directories without any source files.
    pub(super) fn empty() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .unwrap_or_else(|path| panic!("temp dir {path:?} is not UTF-8"));
        fs::create_dir(root.join("source")).expect("create source dir");
        fs::create_dir(root.join("db")).expect("create db dir");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn source(&self) -> Utf8PathBuf {
        self.root.join("source")
    }

    pub(super) fn database_dir(&self) -> Utf8PathBuf {
        self.root.join("db")
    }

    pub(super) fn write_source(&self, name: &str, contents: &str) {
        fs::write(self.source().join(name), contents).expect("write source file");
    }

    pub(super) fn remove_source(&self, name: &str) {
        fs::remove_file(self.source().join(name)).expect("remove source file");
    }
}

/// Capture output written by a command as a `String`.
pub(super) fn output(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).expect("utf-8 output")
}
