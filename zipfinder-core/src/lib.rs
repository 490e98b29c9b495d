//! Core domain types for the zipfinder postal data tools.
//!
//! The crate holds the pieces that need no I/O: the reference entities, the
//! per-line encoding normaliser, the delimited record parser and the read
//! trait implemented by search backends. Persistence lives in
//! `zipfinder-data`.
#![forbid(unsafe_code)]

pub mod encoding;
pub mod lookup;
pub mod model;
pub mod record;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use encoding::{
    DETECTION_ORDER, EncodingError, NormalisedLine, SourceEncoding, detect_encoding,
    normalise_line,
};
pub use lookup::{AddressLookup, DEFAULT_SEARCH_LIMIT, ParseSearchFieldError, SearchField};
pub use model::{District, Municipality, SearchResult, Zipcode};
pub use record::{FIELD_DELIMITER, Record, RecordError, RecordKind, parse_record, split_fields};
