//! Postal reference entities.
//!
//! Districts, municipalities and zipcode records are independent value types
//! related only through their identifiers. [`SearchResult`] is the read-model
//! projection assembled when a zipcode row is joined with its owners.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Top-level administrative region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct District {
    /// Short district code, unique across the country.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl District {
    /// Construct a district from its code and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Sub-region of a [`District`]. Codes are only unique within a district.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Municipality {
    /// Municipality code, scoped by `district_id`.
    pub id: String,
    /// Owning district code.
    pub district_id: String,
    /// Display name.
    pub name: String,
}

impl Municipality {
    /// Construct a municipality scoped to `district_id`.
    pub fn new(
        id: impl Into<String>,
        district_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            district_id: district_id.into(),
            name: name.into(),
        }
    }
}

/// One street or address segment carrying a postal code.
///
/// The street descriptor block is optional; an absent value is always `None`
/// and never an empty string.
///
/// # Examples
///
/// ```
/// use zipfinder_core::Zipcode;
///
/// let record = Zipcode::new("01", "0106", "1234", "Lisboa", "1000", "001", "LISBOA");
/// assert_eq!(record.full_zipcode(), "1000-001");
/// assert!(record.street_name.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Zipcode {
    /// Owning district code.
    pub district_id: String,
    /// Owning municipality code, unique within the district.
    pub municipality_id: String,
    /// Locality code within the municipality.
    pub locality_id: String,
    /// Locality name.
    pub locality_name: String,
    /// Street code assigned by the postal operator.
    pub street_code: Option<String>,
    /// Street type, such as `Rua` or `Avenida`.
    pub street_type: Option<String>,
    /// Preposition between the type and the title.
    pub first_prep: Option<String>,
    /// Honorific or title, such as `Dom`.
    pub street_title: Option<String>,
    /// Preposition between the title and the name.
    pub second_prep: Option<String>,
    /// Street name.
    pub street_name: Option<String>,
    /// Neighbourhood or place the street belongs to.
    pub street_location: Option<String>,
    /// Stretch of the street the code covers.
    pub section: Option<String>,
    /// Door numbers the code covers.
    pub door: Option<String>,
    /// Large client with its own code.
    pub client: Option<String>,
    /// Four-digit base code.
    pub zipcode: String,
    /// Three-digit suffix.
    pub extension: String,
    /// Canonical place name for the code and extension pair.
    pub postal_designation: String,
}

impl Zipcode {
    /// Construct a record with the mandatory fields and no street descriptors.
    pub fn new(
        district_id: impl Into<String>,
        municipality_id: impl Into<String>,
        locality_id: impl Into<String>,
        locality_name: impl Into<String>,
        zipcode: impl Into<String>,
        extension: impl Into<String>,
        postal_designation: impl Into<String>,
    ) -> Self {
        Self {
            district_id: district_id.into(),
            municipality_id: municipality_id.into(),
            locality_id: locality_id.into(),
            locality_name: locality_name.into(),
            street_code: None,
            street_type: None,
            first_prep: None,
            street_title: None,
            second_prep: None,
            street_name: None,
            street_location: None,
            section: None,
            door: None,
            client: None,
            zipcode: zipcode.into(),
            extension: extension.into(),
            postal_designation: postal_designation.into(),
        }
    }

    /// Set the street name.
    #[must_use]
    pub fn with_street_name(mut self, street_name: impl Into<String>) -> Self {
        self.street_name = Some(street_name.into());
        self
    }

    /// The addressable postal unit, formatted as `zipcode-extension`.
    pub fn full_zipcode(&self) -> String {
        format!("{}-{}", self.zipcode, self.extension)
    }

    /// Human-readable street line assembled from the descriptor block.
    ///
    /// Returns `None` when the record carries no street name.
    pub fn street_line(&self) -> Option<String> {
        let name = self.street_name.as_deref()?;
        let parts: Vec<&str> = [
            self.street_type.as_deref(),
            self.first_prep.as_deref(),
            self.street_title.as_deref(),
            self.second_prep.as_deref(),
            Some(name),
        ]
        .into_iter()
        .flatten()
        .collect();
        Some(parts.join(" "))
    }
}

/// A zipcode record joined with its district and municipality.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchResult {
    /// The matching record.
    pub zipcode: Zipcode,
    /// District named by `zipcode.district_id`.
    pub district: District,
    /// Municipality named by the zipcode's district and municipality codes.
    pub municipality: Municipality,
}

impl SearchResult {
    /// Name of the owning district.
    pub fn district_name(&self) -> &str {
        &self.district.name
    }

    /// Name of the owning municipality.
    pub fn municipality_name(&self) -> &str {
        &self.municipality.name
    }

    /// See [`Zipcode::full_zipcode`].
    pub fn full_zipcode(&self) -> String {
        self.zipcode.full_zipcode()
    }
}
