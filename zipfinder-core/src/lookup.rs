//! Read access to imported postal data.
//!
//! [`AddressLookup`] is the seam between search consumers and the store that
//! answers them. Matching is a case-insensitive substring test; no accent
//! folding takes place, so `Evora` does not match `Évora`.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::SearchResult;

/// Row cap applied when the caller does not choose one.
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// Which columns a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchField {
    /// The base code, or `code-extension`.
    Code,
    /// The locality name.
    Locality,
    /// The street name.
    Street,
    /// Code, `code-extension`, locality, street and postal designation.
    #[default]
    All,
}

impl SearchField {
    /// Every query shape, in declaration order.
    pub const ALL: [Self; 4] = [Self::Code, Self::Locality, Self::Street, Self::All];

    /// Lower-case name used on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Locality => "locality",
            Self::Street => "street",
            Self::All => "all",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an unknown [`SearchField`] name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown search field '{0}' (expected code, locality, street or all)")]
pub struct ParseSearchFieldError(pub String);

impl FromStr for SearchField {
    type Err = ParseSearchFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| ParseSearchFieldError(value.to_owned()))
    }
}

/// Read-only substring search over imported zipcode records.
///
/// Implementers return at most `limit` rows in whatever order the backing
/// store produces; callers must not rely on ordering.
///
/// # Examples
///
/// ```rust
/// use std::convert::Infallible;
/// use zipfinder_core::{AddressLookup, SearchField, SearchResult};
///
/// struct Empty;
///
/// impl AddressLookup for Empty {
///     type Error = Infallible;
///
///     fn search(
///         &self,
///         _field: SearchField,
///         _query: &str,
///         _limit: usize,
///     ) -> Result<Vec<SearchResult>, Self::Error> {
///         Ok(Vec::new())
///     }
/// }
///
/// assert!(Empty.search_by_code("1000", 10).unwrap().is_empty());
/// ```
pub trait AddressLookup {
    /// Failure raised by the backing store.
    type Error;

    /// Return up to `limit` records whose `field` columns contain `query`.
    fn search(
        &self,
        field: SearchField,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, Self::Error>;

    /// Match the base code or `code-extension`.
    fn search_by_code(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, Self::Error> {
        self.search(SearchField::Code, query, limit)
    }

    /// Match the locality name.
    fn search_by_locality(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, Self::Error> {
        self.search(SearchField::Locality, query, limit)
    }

    /// Match the street name.
    fn search_by_street(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, Self::Error> {
        self.search(SearchField::Street, query, limit)
    }

    /// Match any searchable text column.
    fn search_all(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, Self::Error> {
        self.search(SearchField::All, query, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("code", SearchField::Code)]
    #[case("Locality", SearchField::Locality)]
    #[case("STREET", SearchField::Street)]
    #[case("all", SearchField::All)]
    fn parses_field_names(#[case] raw: &str, #[case] expected: SearchField) {
        assert_eq!(raw.parse::<SearchField>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_field() {
        let err = "postcode".parse::<SearchField>().expect_err("unknown field");

        assert_eq!(err, ParseSearchFieldError("postcode".into()));
    }
}
