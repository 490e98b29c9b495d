//! Facade crate for the zipfinder postal reference tools.
//!
//! This crate re-exports the core domain types and exposes the SQLite import
//! pipeline and search facade behind the `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use zipfinder_core::{
    AddressLookup, DEFAULT_SEARCH_LIMIT, District, EncodingError, Municipality, RecordError,
    RecordKind, SearchField, SearchResult, SourceEncoding, Zipcode, normalise_line, parse_record,
};

#[cfg(feature = "store-sqlite")]
pub use zipfinder_data::{
    DEFAULT_BATCH_SIZE, FinderError, ImportError, ImportReport, ImportSink, ImportStage, LogSink,
    SchemaError, Severity, ZipcodeFinder, ZipcodeImporter,
};

#[cfg(feature = "test-support")]
pub use zipfinder_core::test_support::MemoryLookup;
