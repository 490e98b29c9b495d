#![forbid(unsafe_code)]

use rusqlite::{Connection, Error as SqliteError, Transaction};
use thiserror::Error;

/// Tables created by [`initialise_schema`], in dependency order.
pub const TABLES: [&str; 3] = ["districts", "municipalities", "zipcodes"];

/// Secondary indexes backing the search query shapes.
pub const INDEXES: [&str; 4] = ["idx_zipcode", "idx_locality", "idx_street", "idx_zip_full"];

/// Initialise the postal reference schema inside an existing SQLite database.
///
/// The function enables foreign keys on the connection, then creates the
/// tables and their indexes in one transaction. Every statement is guarded
/// with `IF NOT EXISTS`, so calling it on an initialised database is a no-op.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use zipfinder_data::store::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
///
/// let tables: i64 = conn
///     .query_row(
///         "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
///             AND name IN ('districts', 'municipalities', 'zipcodes')",
///         [],
///         |row| row.get(0),
///     )
///     .expect("count tables");
/// assert_eq!(tables, 3);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| SchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    create_indexes(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })?;

    Ok(())
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create districts",
        "CREATE TABLE IF NOT EXISTS districts (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "create municipalities",
        "CREATE TABLE IF NOT EXISTS municipalities (
            id TEXT NOT NULL,
            district_id TEXT NOT NULL,
            name TEXT NOT NULL,
            PRIMARY KEY (id, district_id),
            FOREIGN KEY (district_id) REFERENCES districts(id)
        )",
    )?;
    run_migration_step(
        transaction,
        "create zipcodes",
        "CREATE TABLE IF NOT EXISTS zipcodes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            district_id TEXT NOT NULL,
            municipality_id TEXT NOT NULL,
            locality_id TEXT NOT NULL,
            locality_name TEXT NOT NULL,
            street_code TEXT,
            street_type TEXT,
            first_prep TEXT,
            street_title TEXT,
            second_prep TEXT,
            street_name TEXT,
            street_location TEXT,
            section TEXT,
            door TEXT,
            client TEXT,
            zipcode TEXT NOT NULL,
            extension TEXT NOT NULL,
            postal_designation TEXT NOT NULL,
            FOREIGN KEY (district_id) REFERENCES districts(id),
            FOREIGN KEY (municipality_id, district_id)
                REFERENCES municipalities(id, district_id)
        )",
    )
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index zipcodes by code",
        "CREATE INDEX IF NOT EXISTS idx_zipcode ON zipcodes(zipcode)",
    )?;
    run_migration_step(
        transaction,
        "index zipcodes by locality",
        "CREATE INDEX IF NOT EXISTS idx_locality ON zipcodes(locality_name)",
    )?;
    run_migration_step(
        transaction,
        "index zipcodes by street",
        "CREATE INDEX IF NOT EXISTS idx_street ON zipcodes(street_name)",
    )?;
    run_migration_step(
        transaction,
        "index zipcodes by code and extension",
        "CREATE INDEX IF NOT EXISTS idx_zip_full ON zipcodes(zipcode, extension)",
    )
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised when initialising the postal reference schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to enable SQLite foreign keys: {source}")]
    ForeignKeys {
        #[source]
        source: SqliteError,
    },
    #[error("failed to execute migration step '{step}': {source}")]
    Migration {
        step: &'static str,
        #[source]
        source: SqliteError,
    },
}
