//! Delimited record parsing for the three postal source files.
//!
//! Lines are split on [`FIELD_DELIMITER`] without any quoting rules. Each
//! record kind has a fixed arity; a line with any other field count is
//! rejected with the raw fields attached so the caller can log and skip it.

use std::fmt;

use thiserror::Error;

use crate::{District, Municipality, Zipcode};

/// Separator used by every source file.
pub const FIELD_DELIMITER: char = ';';

/// Characters trimmed from both ends of a line before splitting. Unicode
/// spaces such as NBSP are field content and survive.
const LINE_PADDING: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0B'];

/// The kinds of record found in the source directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// `districts.csv`: `id;name`.
    District,
    /// `municipalities.csv`: `district_id;id;name`.
    Municipality,
    /// `zipcodes.csv`: seventeen fields ending in the postal designation.
    Zipcode,
}

impl RecordKind {
    /// Number of fields a well-formed line carries.
    pub const fn arity(self) -> usize {
        match self {
            Self::District => 2,
            Self::Municipality => 3,
            Self::Zipcode => 17,
        }
    }

    /// Name of the source file holding records of this kind.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::District => "districts.csv",
            Self::Municipality => "municipalities.csv",
            Self::Zipcode => "zipcodes.csv",
        }
    }

    /// Singular label used in diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            Self::District => "district",
            Self::Municipality => "municipality",
            Self::Zipcode => "zipcode",
        }
    }

    /// Plural label used in progress messages.
    pub const fn plural(self) -> &'static str {
        match self {
            Self::District => "districts",
            Self::Municipality => "municipalities",
            Self::Zipcode => "zipcodes",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised while parsing one source line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("invalid {kind} data: {}", .fields.join(";"))]
    ArityMismatch {
        kind: RecordKind,
        expected: usize,
        found: usize,
        /// The fields as split, for diagnostics.
        fields: Vec<String>,
    },
}

/// A value that can be built from one delimited source line.
pub trait Record: Sized {
    /// Kind of record, which fixes the expected arity.
    const KIND: RecordKind;

    /// Build the record from exactly [`RecordKind::arity`] fields.
    fn from_fields(fields: Vec<String>) -> Result<Self, RecordError>;
}

/// Split a line into fields after trimming surrounding ASCII whitespace, NUL
/// and the line terminator. An empty line yields one empty field.
///
/// # Examples
///
/// ```
/// use zipfinder_core::split_fields;
///
/// assert_eq!(split_fields("01;0101;Lisboa\r\n"), vec!["01", "0101", "Lisboa"]);
/// assert_eq!(split_fields(""), vec![""]);
/// ```
pub fn split_fields(line: &str) -> Vec<String> {
    line.trim_matches(LINE_PADDING)
        .split(FIELD_DELIMITER)
        .map(str::to_owned)
        .collect()
}

/// Split and validate a line as a record of type `R`.
///
/// # Examples
///
/// ```
/// use zipfinder_core::{District, RecordError, parse_record};
///
/// let district: District = parse_record("01;Lisboa\n")?;
/// assert_eq!(district, District::new("01", "Lisboa"));
///
/// let err = parse_record::<District>("bad").unwrap_err();
/// assert!(matches!(err, RecordError::ArityMismatch { found: 1, .. }));
/// # Ok::<(), RecordError>(())
/// ```
pub fn parse_record<R: Record>(line: &str) -> Result<R, RecordError> {
    R::from_fields(split_fields(line))
}

fn exact_fields<const N: usize>(
    kind: RecordKind,
    fields: Vec<String>,
) -> Result<[String; N], RecordError> {
    <[String; N]>::try_from(fields).map_err(|fields| RecordError::ArityMismatch {
        kind,
        expected: N,
        found: fields.len(),
        fields,
    })
}

/// Map the empty string to `None`; both mean "not provided".
fn optional(field: String) -> Option<String> {
    (!field.is_empty()).then_some(field)
}

impl Record for District {
    const KIND: RecordKind = RecordKind::District;

    fn from_fields(fields: Vec<String>) -> Result<Self, RecordError> {
        let [id, name] = exact_fields::<2>(Self::KIND, fields)?;
        Ok(Self { id, name })
    }
}

impl Record for Municipality {
    const KIND: RecordKind = RecordKind::Municipality;

    /// Source lines list the district first: `district_id;id;name`.
    fn from_fields(fields: Vec<String>) -> Result<Self, RecordError> {
        let [district_id, id, name] = exact_fields::<3>(Self::KIND, fields)?;
        Ok(Self {
            id,
            district_id,
            name,
        })
    }
}

impl Record for Zipcode {
    const KIND: RecordKind = RecordKind::Zipcode;

    fn from_fields(fields: Vec<String>) -> Result<Self, RecordError> {
        let [
            district_id,
            municipality_id,
            locality_id,
            locality_name,
            street_code,
            street_type,
            first_prep,
            street_title,
            second_prep,
            street_name,
            street_location,
            section,
            door,
            client,
            zipcode,
            extension,
            postal_designation,
        ] = exact_fields::<17>(Self::KIND, fields)?;
        Ok(Self {
            district_id,
            municipality_id,
            locality_id,
            locality_name,
            street_code: optional(street_code),
            street_type: optional(street_type),
            first_prep: optional(first_prep),
            street_title: optional(street_title),
            second_prep: optional(second_prep),
            street_name: optional(street_name),
            street_location: optional(street_location),
            section: optional(section),
            door: optional(door),
            client: optional(client),
            zipcode,
            extension,
            postal_designation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const AUGUSTA: &str =
        "01;0106;35;Lisboa;1234;Rua;da;;;Augusta;;;;;1100;053;LISBOA";

    #[rstest]
    #[case(RecordKind::District, 2, "districts.csv")]
    #[case(RecordKind::Municipality, 3, "municipalities.csv")]
    #[case(RecordKind::Zipcode, 17, "zipcodes.csv")]
    fn kinds_describe_their_sources(
        #[case] kind: RecordKind,
        #[case] arity: usize,
        #[case] file_name: &str,
    ) {
        assert_eq!(kind.arity(), arity);
        assert_eq!(kind.file_name(), file_name);
    }

    #[rstest]
    fn municipality_reads_district_first() {
        let municipality: Municipality = parse_record("01;0106;Lisboa").expect("municipality");

        assert_eq!(municipality, Municipality::new("0106", "01", "Lisboa"));
    }

    #[rstest]
    fn zipcode_blanks_empty_descriptors() {
        let record: Zipcode = parse_record(AUGUSTA).expect("zipcode");

        assert_eq!(record.street_code.as_deref(), Some("1234"));
        assert_eq!(record.street_type.as_deref(), Some("Rua"));
        assert_eq!(record.first_prep.as_deref(), Some("da"));
        assert_eq!(record.street_name.as_deref(), Some("Augusta"));
        for absent in [
            &record.street_title,
            &record.second_prep,
            &record.street_location,
            &record.section,
            &record.door,
            &record.client,
        ] {
            assert_eq!(absent, &None);
        }
        assert_eq!(record.full_zipcode(), "1100-053");
        assert_eq!(record.postal_designation, "LISBOA");
    }

    #[rstest]
    fn mandatory_fields_are_kept_even_when_empty() {
        let record: Zipcode =
            parse_record("01;0106;35;;;;;;;;;;;;1100;053;LISBOA").expect("zipcode");

        assert_eq!(record.locality_name, "");
    }

    #[rstest]
    #[case::too_few("01")]
    #[case::too_many("01;Lisboa;extra")]
    #[case::empty("")]
    fn district_arity_mismatch_keeps_fields(#[case] line: &str) {
        let err = parse_record::<District>(line).expect_err("arity mismatch");

        let RecordError::ArityMismatch {
            kind,
            expected,
            found,
            fields,
        } = err;
        assert_eq!(kind, RecordKind::District);
        assert_eq!(expected, 2);
        assert_eq!(found, fields.len());
        assert_eq!(fields.join(";"), line);
    }

    #[rstest]
    fn arity_error_message_lists_fields() {
        let err = parse_record::<Municipality>("bad").expect_err("arity mismatch");

        assert_eq!(err.to_string(), "invalid municipality data: bad");
    }

    #[rstest]
    fn fields_are_not_trimmed_individually() {
        assert_eq!(split_fields("  01 ; Lisboa \n"), vec!["01 ", " Lisboa"]);
    }

    #[rstest]
    #[case::nbsp("07;\u{c9}vora\u{a0}\n", "\u{c9}vora\u{a0}")]
    #[case::ideographic_space("08;Faro\u{3000}\r\n", "Faro\u{3000}")]
    #[case::em_space("\u{2003}09;Guarda\t\0", "Guarda")]
    fn unicode_spaces_are_field_content(#[case] line: &str, #[case] name: &str) {
        let fields = split_fields(line);

        assert_eq!(fields.last().map(String::as_str), Some(name));
    }
}
