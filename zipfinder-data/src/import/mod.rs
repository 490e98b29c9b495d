//! Bulk import of the postal source files into a SQLite database.
//!
//! A run checks that the source directory holds `districts.csv`,
//! `municipalities.csv` and `zipcodes.csv`, initialises the schema inside an
//! existing database file, then streams the three files in dependency order.
//! Lines that cannot be decoded or have the wrong field count are skipped and
//! counted. Store failures abort the run.
//!
//! Districts and municipalities are written in autocommit mode. Zipcodes are
//! written in batched transactions; a failed insert rolls back the batch in
//! flight while earlier batches stay committed.
#![forbid(unsafe_code)]

mod lines;
mod report;
mod sink;

use std::{io, num::NonZeroUsize};

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, OpenFlags, Statement, Transaction, params};
use thiserror::Error;
use zipfinder_core::{
    District, Municipality, Record, RecordKind, SourceEncoding, Zipcode, normalise_line,
    parse_record,
};

use crate::store::{SchemaError, initialise_schema};

use lines::SourceLines;
pub use report::{ImportReport, ImportStage};
pub use sink::{ImportSink, LogSink, Severity};

/// Zipcode rows committed per transaction unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Errors that abort an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The source directory does not exist.
    #[error("source directory {path} does not exist")]
    SourceNotFound { path: Utf8PathBuf },
    /// One of the three source files is missing.
    #[error("unable to find {} file at {path}", .kind.file_name())]
    MissingSourceFile { kind: RecordKind, path: Utf8PathBuf },
    /// A source or target path could not be inspected.
    #[error("failed to inspect {path}: {source}")]
    InspectPath {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// The target database file has not been created.
    #[error("database file {path} does not exist")]
    StoreNotFound { path: Utf8PathBuf },
    /// Opening the target database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenStore {
        path: Utf8PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the schema failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Opening a source file failed.
    #[error("failed to open {path}: {source}")]
    OpenSource {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// Reading a source file failed part way through.
    #[error("failed to read line {line} of {path}: {source}")]
    ReadSource {
        path: Utf8PathBuf,
        line: usize,
        #[source]
        source: io::Error,
    },
    /// The store rejected a record, typically on a foreign key.
    #[error("failed to insert {kind} from line {line}: {source}")]
    Insert {
        kind: RecordKind,
        line: usize,
        #[source]
        source: rusqlite::Error,
    },
    /// A statement or transaction operation failed.
    #[error("failed to {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

/// Imports the three postal source files into an existing database file.
///
/// Each call to [`import`](Self::import) starts from fresh counters, so one
/// importer can be reused for several targets.
///
/// # Examples
/// ```no_run
/// use std::num::NonZeroUsize;
///
/// use camino::Utf8Path;
/// use zipfinder_data::{LogSink, ZipcodeImporter};
///
/// let sink = LogSink;
/// let importer = ZipcodeImporter::new()
///     .with_sink(&sink)
///     .with_batch_size(NonZeroUsize::new(500).expect("non-zero"));
/// let report = importer.import(Utf8Path::new("data"), Utf8Path::new("zipcodes.sqlite"));
/// if let Some(err) = report.failure() {
///     eprintln!("import failed: {err}");
/// }
/// ```
#[derive(Clone, Copy)]
pub struct ZipcodeImporter<'s> {
    sink: Option<&'s dyn ImportSink>,
    batch_size: NonZeroUsize,
}

impl std::fmt::Debug for ZipcodeImporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipcodeImporter")
            .field("has_sink", &self.sink.is_some())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Default for ZipcodeImporter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s> ZipcodeImporter<'s> {
    /// Importer without a sink, committing [`DEFAULT_BATCH_SIZE`] zipcodes per
    /// transaction.
    pub const fn new() -> Self {
        Self {
            sink: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Route progress messages to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: &'s dyn ImportSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Commit zipcodes every `batch_size` inserted rows.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Zipcode rows committed per transaction.
    pub const fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// Import `source_dir` into the database file at `database`.
    ///
    /// The file must already exist; an empty file is fine. Failures are
    /// reported through [`ImportReport::failure`] and never returned as `Err`.
    pub fn import(&self, source_dir: &Utf8Path, database: &Utf8Path) -> ImportReport {
        let mut report = ImportReport::default();
        match self.run(source_dir, database, &mut report) {
            Ok(()) => {
                report.advance(ImportStage::Completed);
                self.emit("All data imported successfully", Severity::Success);
            }
            Err(err) => {
                self.emit(&format!("Error importing data: {err}"), Severity::Error);
                report.fail(err);
            }
        }
        report
    }

    fn run(
        &self,
        source_dir: &Utf8Path,
        database: &Utf8Path,
        report: &mut ImportReport,
    ) -> Result<(), ImportError> {
        let sources = SourceFiles::locate(source_dir)?;
        let mut connection = self.open_store(database)?;
        report.advance(ImportStage::SchemaReady);

        self.import_autocommit::<District>(&connection, &sources.districts, report)?;
        self.import_autocommit::<Municipality>(&connection, &sources.municipalities, report)?;
        self.import_zipcodes(&mut connection, &sources.zipcodes, report)
    }

    fn open_store(&self, database: &Utf8Path) -> Result<Connection, ImportError> {
        match zipfinder_fs::file_is_file(database) {
            Ok(true) => {}
            Ok(false) => {
                return Err(ImportError::StoreNotFound {
                    path: database.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(ImportError::InspectPath {
                    path: database.to_path_buf(),
                    source,
                });
            }
        }
        let mut connection = Connection::open_with_flags(database, OpenFlags::SQLITE_OPEN_READ_WRITE)
            .map_err(|source| ImportError::OpenStore {
                path: database.to_path_buf(),
                source,
            })?;

        self.emit("Creating database tables", Severity::Info);
        initialise_schema(&mut connection)?;
        self.emit("Database tables created successfully", Severity::Success);
        Ok(connection)
    }

    fn import_autocommit<R: Persist>(
        &self,
        connection: &Connection,
        path: &Utf8Path,
        report: &mut ImportReport,
    ) -> Result<(), ImportError> {
        report.advance(ImportStage::importing(R::KIND));
        self.emit(&format!("Importing {}", R::KIND.plural()), Severity::Info);

        let mut lines = SourceLines::open(path)?;
        let mut insert = connection
            .prepare_cached(R::INSERT)
            .map_err(|source| ImportError::Store {
                operation: "prepare insert",
                source,
            })?;
        while let Some(record) = self.next_record::<R>(&mut lines, report)? {
            record
                .insert(&mut insert)
                .map_err(|source| ImportError::Insert {
                    kind: R::KIND,
                    line: lines.line_number(),
                    source,
                })?;
            report.add_imported(R::KIND, 1);
        }

        self.emit(
            &format!("Imported {} {}", report.imported(R::KIND), R::KIND.plural()),
            Severity::Success,
        );
        Ok(())
    }

    fn import_zipcodes(
        &self,
        connection: &mut Connection,
        path: &Utf8Path,
        report: &mut ImportReport,
    ) -> Result<(), ImportError> {
        report.advance(ImportStage::ImportingZipcodes);
        self.emit("Importing zipcodes", Severity::Info);

        let mut lines = SourceLines::open(path)?;
        loop {
            let transaction = connection
                .transaction()
                .map_err(|source| ImportError::Store {
                    operation: "begin zipcode batch",
                    source,
                })?;
            let batch = match self.fill_batch(&transaction, &mut lines, report) {
                Ok(batch) => batch,
                Err(err) => {
                    match transaction.rollback() {
                        Ok(()) => log::warn!("rolled back in-flight zipcode batch"),
                        Err(rollback) => log::warn!("failed to roll back zipcode batch: {rollback}"),
                    }
                    return Err(err);
                }
            };
            transaction.commit().map_err(|source| ImportError::Store {
                operation: "commit zipcode batch",
                source,
            })?;
            report.add_imported(RecordKind::Zipcode, batch.inserted);
            log::debug!("committed batch of {} zipcodes", batch.inserted);

            if batch.exhausted {
                break;
            }
            self.emit(
                &format!("Imported {} zipcodes so far", report.zipcodes),
                Severity::Info,
            );
        }

        self.emit(
            &format!("Imported {} zipcodes", report.zipcodes),
            Severity::Success,
        );
        Ok(())
    }

    /// Insert zipcodes until the batch is full or the file ends.
    fn fill_batch(
        &self,
        transaction: &Transaction<'_>,
        lines: &mut SourceLines,
        report: &mut ImportReport,
    ) -> Result<Batch, ImportError> {
        let mut insert = transaction
            .prepare_cached(Zipcode::INSERT)
            .map_err(|source| ImportError::Store {
                operation: "prepare insert",
                source,
            })?;
        let mut inserted = 0;
        while inserted < self.batch_size.get() {
            let Some(record) = self.next_record::<Zipcode>(lines, report)? else {
                return Ok(Batch {
                    inserted,
                    exhausted: true,
                });
            };
            record
                .insert(&mut insert)
                .map_err(|source| ImportError::Insert {
                    kind: RecordKind::Zipcode,
                    line: lines.line_number(),
                    source,
                })?;
            inserted += 1;
        }
        Ok(Batch {
            inserted,
            exhausted: false,
        })
    }

    /// Next well-formed record, skipping and counting lines that fail
    /// decoding or arity checks.
    fn next_record<R: Record>(
        &self,
        lines: &mut SourceLines,
        report: &mut ImportReport,
    ) -> Result<Option<R>, ImportError> {
        loop {
            let Some(raw) = lines.next_line()? else {
                return Ok(None);
            };
            let outcome: Result<(R, SourceEncoding), String> = match normalise_line(raw) {
                Ok(line) => parse_record::<R>(&line.text)
                    .map(|record| (record, line.encoding))
                    .map_err(|err| err.to_string()),
                Err(err) => Err(err.to_string()),
            };
            match outcome {
                Ok((record, encoding)) => {
                    log::debug!(
                        "{}:{} decoded as {encoding}",
                        lines.path(),
                        lines.line_number()
                    );
                    return Ok(Some(record));
                }
                Err(reason) => {
                    report.failed_rows += 1;
                    self.emit(
                        &format!(
                            "Skipping line {} of {}: {reason}",
                            lines.line_number(),
                            R::KIND.file_name()
                        ),
                        Severity::Warning,
                    );
                }
            }
        }
    }

    fn emit(&self, message: &str, severity: Severity) {
        if let Some(sink) = self.sink {
            sink.emit(message, severity);
        }
    }
}

struct Batch {
    inserted: usize,
    exhausted: bool,
}

/// Paths of the three source files, checked before the store is touched.
struct SourceFiles {
    districts: Utf8PathBuf,
    municipalities: Utf8PathBuf,
    zipcodes: Utf8PathBuf,
}

impl SourceFiles {
    fn locate(dir: &Utf8Path) -> Result<Self, ImportError> {
        match zipfinder_fs::dir_is_dir(dir) {
            Ok(true) => {}
            Ok(false) => {
                return Err(ImportError::SourceNotFound {
                    path: dir.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(ImportError::InspectPath {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        }
        Ok(Self {
            districts: Self::require(dir, RecordKind::District)?,
            municipalities: Self::require(dir, RecordKind::Municipality)?,
            zipcodes: Self::require(dir, RecordKind::Zipcode)?,
        })
    }

    fn require(dir: &Utf8Path, kind: RecordKind) -> Result<Utf8PathBuf, ImportError> {
        let path = dir.join(kind.file_name());
        match zipfinder_fs::file_is_file(&path) {
            Ok(true) => Ok(path),
            Ok(false) => Err(ImportError::MissingSourceFile { kind, path }),
            Err(source) => Err(ImportError::InspectPath { path, source }),
        }
    }
}

/// Binds a parsed record to its `INSERT` statement.
trait Persist: Record {
    const INSERT: &'static str;

    fn insert(&self, statement: &mut Statement<'_>) -> rusqlite::Result<usize>;
}

impl Persist for District {
    const INSERT: &'static str = "INSERT INTO districts (id, name) VALUES (?1, ?2)";

    fn insert(&self, statement: &mut Statement<'_>) -> rusqlite::Result<usize> {
        statement.execute((self.id.as_str(), self.name.as_str()))
    }
}

impl Persist for Municipality {
    const INSERT: &'static str =
        "INSERT INTO municipalities (id, district_id, name) VALUES (?1, ?2, ?3)";

    fn insert(&self, statement: &mut Statement<'_>) -> rusqlite::Result<usize> {
        statement.execute((
            self.id.as_str(),
            self.district_id.as_str(),
            self.name.as_str(),
        ))
    }
}

impl Persist for Zipcode {
    const INSERT: &'static str = "INSERT INTO zipcodes (
            district_id, municipality_id, locality_id, locality_name,
            street_code, street_type, first_prep, street_title, second_prep,
            street_name, street_location, section, door, client,
            zipcode, extension, postal_designation
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)";

    fn insert(&self, statement: &mut Statement<'_>) -> rusqlite::Result<usize> {
        statement.execute(params![
            self.district_id,
            self.municipality_id,
            self.locality_id,
            self.locality_name,
            self.street_code,
            self.street_type,
            self.first_prep,
            self.street_title,
            self.second_prep,
            self.street_name,
            self.street_location,
            self.section,
            self.door,
            self.client,
            self.zipcode,
            self.extension,
            self.postal_designation,
        ])
    }
}
