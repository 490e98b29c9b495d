//! Test-only, in-memory `AddressLookup` implementation used by unit and
//! behaviour tests.

use std::convert::Infallible;

use crate::{AddressLookup, District, Municipality, SearchField, SearchResult, Zipcode};

/// In-memory `AddressLookup` implementation used in tests.
///
/// The lookup performs a linear scan with ASCII case folding, matching the
/// behaviour of the SQLite-backed finder on small datasets.
#[derive(Default, Debug)]
pub struct MemoryLookup {
    rows: Vec<SearchResult>,
}

impl MemoryLookup {
    /// Create a lookup from already-joined rows.
    pub fn with_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = SearchResult>,
    {
        Self {
            rows: rows.into_iter().collect(),
        }
    }

    /// Join zipcode records to their owners, dropping orphans the way an
    /// inner join would.
    pub fn from_parts(
        districts: &[District],
        municipalities: &[Municipality],
        zipcodes: &[Zipcode],
    ) -> Self {
        let rows = zipcodes.iter().filter_map(|zipcode| {
            let district = districts
                .iter()
                .find(|district| district.id == zipcode.district_id)?;
            let municipality = municipalities.iter().find(|municipality| {
                municipality.id == zipcode.municipality_id
                    && municipality.district_id == zipcode.district_id
            })?;
            Some(SearchResult {
                zipcode: zipcode.clone(),
                district: district.clone(),
                municipality: municipality.clone(),
            })
        });
        Self::with_rows(rows)
    }
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

fn row_matches(field: SearchField, zipcode: &Zipcode, query: &str) -> bool {
    let full = zipcode.full_zipcode();
    let street = zipcode.street_name.as_deref();
    let mut candidates: Vec<Option<&str>> = Vec::new();
    if matches!(field, SearchField::Code | SearchField::All) {
        candidates.extend([Some(zipcode.zipcode.as_str()), Some(full.as_str())]);
    }
    if matches!(field, SearchField::Locality | SearchField::All) {
        candidates.push(Some(zipcode.locality_name.as_str()));
    }
    if matches!(field, SearchField::Street | SearchField::All) {
        candidates.push(street);
    }
    if field == SearchField::All {
        candidates.push(Some(zipcode.postal_designation.as_str()));
    }
    candidates
        .into_iter()
        .flatten()
        .any(|value| contains_ignore_ascii_case(value, query))
}

impl AddressLookup for MemoryLookup {
    type Error = Infallible;

    fn search(
        &self,
        field: SearchField,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, Self::Error> {
        Ok(self
            .rows
            .iter()
            .filter(|row| row_matches(field, &row.zipcode, query))
            .take(limit)
            .cloned()
            .collect())
    }
}
