//! SQLite-backed search over an imported postal database.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};
use thiserror::Error;
use zipfinder_core::{AddressLookup, District, Municipality, SearchField, SearchResult, Zipcode};

/// Column order is relied upon by [`joined_row`].
const SELECT_JOINED: &str = "SELECT
        z.district_id, z.municipality_id, z.locality_id, z.locality_name,
        z.street_code, z.street_type, z.first_prep, z.street_title,
        z.second_prep, z.street_name, z.street_location, z.section,
        z.door, z.client, z.zipcode, z.extension, z.postal_designation,
        d.name AS district_name,
        m.name AS municipality_name
    FROM zipcodes z
    JOIN districts d ON z.district_id = d.id
    JOIN municipalities m ON z.municipality_id = m.id AND z.district_id = m.district_id";

/// Error raised when opening or querying the postal database.
#[derive(Debug, Error)]
pub enum FinderError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        path: Utf8PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    /// The database does not hold an imported postal schema.
    #[error("database at {path} has no zipcodes table; run an import first")]
    MissingSchema { path: Utf8PathBuf },
    /// A search statement failed.
    #[error("failed to search by {field}: {source}")]
    Query {
        field: SearchField,
        #[source]
        source: rusqlite::Error,
    },
}

/// Read-only search facade over an imported database.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use zipfinder_core::AddressLookup;
/// use zipfinder_data::ZipcodeFinder;
///
/// # fn main() -> Result<(), zipfinder_data::FinderError> {
/// let finder = ZipcodeFinder::open(Utf8Path::new("zipcodes.sqlite"))?;
/// for result in finder.search_by_code("1000-001", 10)? {
///     println!("{} {}", result.full_zipcode(), result.zipcode.postal_designation);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ZipcodeFinder {
    connection: Connection,
}

impl fmt::Debug for ZipcodeFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipcodeFinder")
            .field("path", &self.connection.path())
            .finish_non_exhaustive()
    }
}

impl ZipcodeFinder {
    /// Open an existing database for reading.
    pub fn open(path: &Utf8Path) -> Result<Self, FinderError> {
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| FinderError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        let has_schema = connection
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'zipcodes'",
                [],
                |_| Ok(()),
            )
            .optional()
            .map_err(|source| FinderError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?
            .is_some();
        if !has_schema {
            return Err(FinderError::MissingSchema {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { connection })
    }

    /// Wrap a connection whose schema is already initialised.
    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }
}

impl AddressLookup for ZipcodeFinder {
    type Error = FinderError;

    fn search(
        &self,
        field: SearchField,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, Self::Error> {
        let sql = format!("{SELECT_JOINED} WHERE {} LIMIT ?2", where_clause(field));
        let pattern = format!("%{query}%");
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let map_err = |source: rusqlite::Error| FinderError::Query { field, source };

        let mut statement = self.connection.prepare_cached(&sql).map_err(map_err)?;
        let rows = statement
            .query_map((pattern, limit), joined_row)
            .map_err(map_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
    }
}

fn where_clause(field: SearchField) -> &'static str {
    match field {
        SearchField::Code => {
            "z.zipcode LIKE ?1 COLLATE NOCASE
                OR z.zipcode || '-' || z.extension LIKE ?1 COLLATE NOCASE"
        }
        SearchField::Locality => "z.locality_name LIKE ?1 COLLATE NOCASE",
        SearchField::Street => "z.street_name LIKE ?1 COLLATE NOCASE",
        SearchField::All => {
            "z.zipcode LIKE ?1 COLLATE NOCASE
                OR z.zipcode || '-' || z.extension LIKE ?1 COLLATE NOCASE
                OR z.locality_name LIKE ?1 COLLATE NOCASE
                OR z.street_name LIKE ?1 COLLATE NOCASE
                OR z.postal_designation LIKE ?1 COLLATE NOCASE"
        }
    }
}

fn joined_row(row: &Row<'_>) -> rusqlite::Result<SearchResult> {
    let zipcode = Zipcode {
        district_id: row.get(0)?,
        municipality_id: row.get(1)?,
        locality_id: row.get(2)?,
        locality_name: row.get(3)?,
        street_code: row.get(4)?,
        street_type: row.get(5)?,
        first_prep: row.get(6)?,
        street_title: row.get(7)?,
        second_prep: row.get(8)?,
        street_name: row.get(9)?,
        street_location: row.get(10)?,
        section: row.get(11)?,
        door: row.get(12)?,
        client: row.get(13)?,
        zipcode: row.get(14)?,
        extension: row.get(15)?,
        postal_designation: row.get(16)?,
    };
    let district_name: String = row.get(17)?;
    let municipality_name: String = row.get(18)?;
    let district = District::new(zipcode.district_id.clone(), district_name);
    let municipality = Municipality::new(
        zipcode.municipality_id.clone(),
        zipcode.district_id.clone(),
        municipality_name,
    );
    Ok(SearchResult {
        zipcode,
        district,
        municipality,
    })
}
