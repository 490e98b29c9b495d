//! Per-line character encoding detection and transcoding.
//!
//! Source files mix UTF-8 with the legacy single-byte encodings used by older
//! exports. Each line is classified on its own; candidates are tried in
//! [`DETECTION_ORDER`] and the first one that accepts the bytes wins.

use std::{borrow::Cow, fmt};

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use thiserror::Error;

/// Encodings recognised in source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceEncoding {
    /// Valid UTF-8, passed through unchanged.
    Utf8,
    /// Latin-1; chosen when the line holds no C1 control bytes.
    Iso8859_1,
    /// Windows-1252; chosen when C1 bytes map to printable characters.
    Windows1252,
}

/// Tie-break precedence used when a line is valid in more than one encoding.
pub const DETECTION_ORDER: [SourceEncoding; 3] = [
    SourceEncoding::Utf8,
    SourceEncoding::Iso8859_1,
    SourceEncoding::Windows1252,
];

/// Bytes Windows-1252 leaves unassigned.
const WINDOWS_1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

impl SourceEncoding {
    /// Canonical label.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Iso8859_1 => "ISO-8859-1",
            Self::Windows1252 => "Windows-1252",
        }
    }

    fn accepts(self, bytes: &[u8]) -> bool {
        match self {
            Self::Utf8 => Encoding::utf8_valid_up_to(bytes) == bytes.len(),
            // C1 controls never appear in Latin-1 text.
            Self::Iso8859_1 => !bytes.iter().any(|byte| (0x80..=0x9F).contains(byte)),
            Self::Windows1252 => !bytes
                .iter()
                .any(|byte| WINDOWS_1252_UNDEFINED.contains(byte)),
        }
    }

    fn decode(self, bytes: &[u8]) -> Cow<'_, str> {
        match self {
            Self::Utf8 => UTF_8.decode_with_bom_removal(bytes).0,
            Self::Iso8859_1 => encoding_rs::mem::decode_latin1(bytes),
            Self::Windows1252 => WINDOWS_1252.decode_without_bom_handling(bytes).0,
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A line transcoded to UTF-8 along with the encoding it was read as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalisedLine<'a> {
    /// Decoded line, borrowed when the input was already UTF-8.
    pub text: Cow<'a, str>,
    /// Encoding the line was decoded from.
    pub encoding: SourceEncoding,
}

/// Raised when no candidate encoding accepts a line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("unable to detect encoding for line: {line}")]
    DetectionFailed {
        /// Lossy rendering of the rejected bytes for diagnostics.
        line: String,
    },
}

/// Return the first encoding in [`DETECTION_ORDER`] that accepts `bytes`.
pub fn detect_encoding(bytes: &[u8]) -> Option<SourceEncoding> {
    DETECTION_ORDER
        .into_iter()
        .find(|encoding| encoding.accepts(bytes))
}

/// Detect the encoding of one raw line and transcode it to UTF-8.
///
/// UTF-8 input is borrowed unchanged apart from a leading byte order mark.
///
/// # Examples
///
/// ```
/// use zipfinder_core::{SourceEncoding, normalise_line};
///
/// let latin1 = b"01;\xC9vora";
/// let line = normalise_line(latin1)?;
/// assert_eq!(line.text, "01;Évora");
/// assert_eq!(line.encoding, SourceEncoding::Iso8859_1);
/// # Ok::<(), zipfinder_core::EncodingError>(())
/// ```
pub fn normalise_line(bytes: &[u8]) -> Result<NormalisedLine<'_>, EncodingError> {
    let encoding = detect_encoding(bytes).ok_or_else(|| EncodingError::DetectionFailed {
        line: String::from_utf8_lossy(bytes).into_owned(),
    })?;
    Ok(NormalisedLine {
        text: encoding.decode(bytes),
        encoding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::ascii(b"01;Lisboa".as_slice(), SourceEncoding::Utf8)]
    #[case::utf8(b"07;\xC3\x89vora".as_slice(), SourceEncoding::Utf8)]
    #[case::latin1(b"07;\xC9vora".as_slice(), SourceEncoding::Iso8859_1)]
    #[case::cp1252(b"01;\x93Lisboa\x94".as_slice(), SourceEncoding::Windows1252)]
    #[case::empty(b"".as_slice(), SourceEncoding::Utf8)]
    fn detects_in_precedence_order(#[case] bytes: &[u8], #[case] expected: SourceEncoding) {
        assert_eq!(detect_encoding(bytes), Some(expected));
    }

    #[rstest]
    fn utf8_lines_are_borrowed_unchanged() {
        let raw = "1000;001;S\u{e3}o Jo\u{e3}o".as_bytes();

        let first = normalise_line(raw).expect("utf-8 line");
        assert!(matches!(first.text, Cow::Borrowed(_)));
        let second = normalise_line(first.text.as_bytes()).expect("re-normalise");
        assert_eq!(first.text, second.text);
    }

    #[rstest]
    fn transcodes_windows_1252_punctuation() {
        let line = normalise_line(b"\x93Beira\x94 \x96 Alta").expect("cp1252 line");

        assert_eq!(line.text, "\u{201c}Beira\u{201d} \u{2013} Alta");
        assert_eq!(line.encoding, SourceEncoding::Windows1252);
    }

    #[rstest]
    fn strips_utf8_byte_order_mark() {
        let line = normalise_line(b"\xEF\xBB\xBF01;Aveiro").expect("bom line");

        assert_eq!(line.text, "01;Aveiro");
    }

    #[rstest]
    fn rejects_undefined_bytes() {
        let err = normalise_line(b"01;\x81\xC9").expect_err("undetectable line");

        match err {
            EncodingError::DetectionFailed { line } => assert!(line.starts_with("01;")),
        }
    }
}
