//! Import command implementation for the zipfinder CLI.

use std::{io::Write, num::NonZeroUsize};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use zipfinder_core::RecordKind;
use zipfinder_data::{DEFAULT_BATCH_SIZE, ImportReport, ImportSink, Severity, ZipcodeImporter};

use crate::{
    ARG_BATCH_SIZE, ARG_DATABASE_DIR, ARG_DATABASE_NAME, ARG_SOURCE, CliError, ENV_DATABASE_DIR,
    ENV_SOURCE, console::ConsoleSink,
};

pub(crate) const DEFAULT_DATABASE_NAME: &str = "zipcodes";
const DATABASE_EXTENSION: &str = "sqlite";

/// Files checked before anything is created, in the order they are reported.
const REQUIRED_SOURCES: [RecordKind; 3] = [
    RecordKind::Municipality,
    RecordKind::District,
    RecordKind::Zipcode,
];

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Import districts.csv, municipalities.csv and zipcodes.csv \
                 from a source directory into a new SQLite database. Paths \
                 can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Import postal source files into a new SQLite database"
)]
#[ortho_config(prefix = "ZIPFINDER")]
pub(crate) struct ImportArgs {
    /// Directory containing the three CSV source files.
    #[arg(long = ARG_SOURCE, value_name = "dir")]
    #[serde(default)]
    pub(crate) source: Option<Utf8PathBuf>,
    /// Directory in which the SQLite database is created.
    #[arg(long = ARG_DATABASE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) database_dir: Option<Utf8PathBuf>,
    /// Database name, without the `.sqlite` extension.
    #[arg(long = ARG_DATABASE_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) database_name: Option<String>,
    /// Zipcode rows committed per transaction.
    #[arg(long = ARG_BATCH_SIZE, value_name = "rows")]
    #[serde(default)]
    pub(crate) batch_size: Option<usize>,
}

impl ImportArgs {
    pub(crate) fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    pub(crate) source: Utf8PathBuf,
    pub(crate) database_dir: Utf8PathBuf,
    pub(crate) database_name: String,
    pub(crate) batch_size: NonZeroUsize,
}

impl ImportConfig {
    /// File name of the database, e.g. `zipcodes.sqlite`.
    pub(crate) fn database_file_name(&self) -> String {
        format!("{}.{DATABASE_EXTENSION}", self.database_name)
    }

    pub(crate) fn database_path(&self) -> Utf8PathBuf {
        self.database_dir.join(self.database_file_name())
    }

    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        if !inspect(&self.source, zipfinder_fs::dir_is_dir)? {
            return Err(CliError::SourceDirectoryNotFound {
                path: self.source.clone(),
            });
        }
        for kind in REQUIRED_SOURCES {
            let path = self.source.join(kind.file_name());
            if !inspect(&path, zipfinder_fs::file_is_file)? {
                return Err(CliError::MissingSourceFile {
                    file_name: kind.file_name(),
                });
            }
        }
        if !inspect(&self.database_dir, zipfinder_fs::dir_is_dir)? {
            return Err(CliError::DatabaseDirectoryNotFound {
                path: self.database_dir.clone(),
            });
        }
        Ok(())
    }

    /// Allocate the empty database file, refusing to reuse an existing one.
    pub(crate) fn create_database(&self) -> Result<Utf8PathBuf, CliError> {
        let path = self.database_path();
        match zipfinder_fs::create_empty_file(&path) {
            Ok(()) => Ok(path),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(CliError::DatabaseExists {
                    file_name: self.database_file_name(),
                })
            }
            Err(source) => Err(CliError::CreateDatabase { path, source }),
        }
    }
}

fn inspect(
    path: &Utf8Path,
    probe: fn(&Utf8Path) -> std::io::Result<bool>,
) -> Result<bool, CliError> {
    probe(path).map_err(|source| CliError::InspectPath {
        path: path.to_path_buf(),
        source,
    })
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let source = args.source.ok_or(CliError::MissingArgument {
            field: ARG_SOURCE,
            env: ENV_SOURCE,
        })?;
        let database_dir = args.database_dir.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE_DIR,
            env: ENV_DATABASE_DIR,
        })?;
        let database_name = args
            .database_name
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_owned());
        let batch_size = match args.batch_size {
            None => DEFAULT_BATCH_SIZE,
            Some(rows) => NonZeroUsize::new(rows).ok_or(CliError::ZeroBatchSize)?,
        };
        Ok(Self {
            source,
            database_dir,
            database_name,
            batch_size,
        })
    }
}

/// Validate inputs, create the database and run the importer, rendering
/// progress to `out`.
pub(crate) fn run_import<W: Write>(args: ImportArgs, out: W) -> Result<ImportReport, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let database = config.create_database()?;

    let console = ConsoleSink::new(out);
    let mut report = ZipcodeImporter::new()
        .with_sink(&console)
        .with_batch_size(config.batch_size)
        .import(&config.source, &database);
    if let Some(source) = report.take_failure() {
        console.finish()?;
        return Err(CliError::Import {
            path: database,
            source,
        });
    }
    console.emit(
        &format!(
            "Import completed: {} districts, {} municipalities, {} zipcodes, {} failed",
            report.districts, report.municipalities, report.zipcodes, report.failed_rows
        ),
        Severity::Success,
    );
    console.finish()?;
    Ok(report)
}
