//! Error types emitted by the zipfinder CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use zipfinder_core::ParseSearchFieldError;
use zipfinder_data::{FinderError, ImportError};

/// Errors emitted by the zipfinder CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The `--by` value names no known search field.
    #[error(transparent)]
    InvalidSearchField(#[from] ParseSearchFieldError),
    /// The batch size was configured as zero.
    #[error("--batch-size must be greater than zero")]
    ZeroBatchSize,
    /// The source directory does not exist.
    #[error("The directory \"{path}\" does not exist")]
    SourceDirectoryNotFound { path: Utf8PathBuf },
    /// A source file is missing from the source directory.
    #[error("Unable to find {file_name} file")]
    MissingSourceFile { file_name: &'static str },
    /// The database directory does not exist or is not a directory.
    #[error("The directory \"{path}\" does not exist")]
    DatabaseDirectoryNotFound { path: Utf8PathBuf },
    /// A path could not be inspected due to an IO error.
    #[error("failed to inspect {path}: {source}")]
    InspectPath {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The target database already exists.
    #[error("Database file {file_name} already exists! Delete it first")]
    DatabaseExists { file_name: String },
    /// Creating the empty database file failed.
    #[error("Unable to create database file {path}: {source}")]
    CreateDatabase {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The import pipeline reported a failure.
    #[error("import into {path} failed: {source}")]
    Import {
        path: Utf8PathBuf,
        #[source]
        source: ImportError,
    },
    /// Opening or querying the database failed.
    #[error(transparent)]
    Search(#[from] FinderError),
    /// Serializing search results failed.
    #[error("failed to serialize search results: {0}")]
    SerializeResults(#[source] serde_json::Error),
    /// Writing to the console failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
