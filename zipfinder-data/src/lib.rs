//! Persistence and search for imported postal reference data.
//!
//! Responsibilities:
//! - Create the SQLite schema for districts, municipalities and zipcodes.
//! - Stream the three source files into that schema ([`import`]).
//! - Answer substring searches over a populated database ([`store`]).
//!
//! Boundaries:
//! - Parsing and encoding rules live in `zipfinder-core`.
//! - Creating the target database file is the caller's job.
//!
//! Invariants:
//! - Foreign keys are enforced on every connection used for writing.
//! - No global mutable state; each import run owns its counters.
#![forbid(unsafe_code)]

pub mod import;
pub mod store;

pub use import::{
    DEFAULT_BATCH_SIZE, ImportError, ImportReport, ImportSink, ImportStage, LogSink, Severity,
    ZipcodeImporter,
};
pub use store::{FinderError, SchemaError, ZipcodeFinder};
