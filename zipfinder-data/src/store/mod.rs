//! SQLite storage for imported postal reference data.
//!
//! The module is split into two focused submodules:
//! - [`schema`] materialises the tables, keys and indexes.
//! - [`finder`] answers substring searches against a populated database.
#![forbid(unsafe_code)]

mod finder;
mod schema;

pub use finder::{FinderError, ZipcodeFinder};
pub use schema::{INDEXES, SchemaError, TABLES, initialise_schema};
