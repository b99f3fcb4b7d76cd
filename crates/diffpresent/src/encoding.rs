//! Text encodings and reconciliation of differently encoded inputs.
//!
//! Diff inputs arrive as [`EncodedText`]: raw bytes labelled with the
//! [`Encoding`] they are written in. Before two inputs can be compared they
//! must share an encoding; [`reconcile`] picks that common encoding and
//! transcodes whichever side needs it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EncodingError, EncodingResult};

/// A text encoding understood by the presenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Encoding {
    /// 7-bit ASCII.
    UsAscii,
    /// UTF-8.
    Utf8,
    /// UTF-16, little endian, no byte order mark.
    Utf16Le,
    /// UTF-16, big endian, no byte order mark.
    Utf16Be,
    /// ISO-8859-1 (Latin-1).
    Latin1,
    /// Raw bytes with no character semantics above 0x7F.
    Binary,
}

impl Encoding {
    /// Every supported encoding, in display order.
    pub const ALL: [Encoding; 6] = [
        Encoding::UsAscii,
        Encoding::Utf8,
        Encoding::Utf16Le,
        Encoding::Utf16Be,
        Encoding::Latin1,
        Encoding::Binary,
    ];

    /// The canonical name of the encoding, e.g. `UTF-8`.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::UsAscii => "US-ASCII",
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Latin1 => "ISO-8859-1",
            Encoding::Binary => "ASCII-8BIT",
        }
    }

    /// Whether ASCII text has the same byte representation in this encoding.
    pub fn is_ascii_compatible(self) -> bool {
        !matches!(self, Encoding::Utf16Le | Encoding::Utf16Be)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown encoding name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown encoding: {0}")]
pub struct UnknownEncoding(pub String);

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let encoding = match normalized.as_str() {
            "us-ascii" | "ascii" => Encoding::UsAscii,
            "utf-8" | "utf8" => Encoding::Utf8,
            "utf-16le" | "utf16le" => Encoding::Utf16Le,
            "utf-16be" | "utf16be" => Encoding::Utf16Be,
            "iso-8859-1" | "latin1" | "latin-1" => Encoding::Latin1,
            "ascii-8bit" | "binary" => Encoding::Binary,
            _ => return Err(UnknownEncoding(s.to_string())),
        };
        Ok(encoding)
    }
}

impl TryFrom<String> for Encoding {
    type Error = UnknownEncoding;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Encoding> for String {
    fn from(value: Encoding) -> Self {
        value.name().to_string()
    }
}

// ---------------------------------------------------------------------------
// EncodedText
// ---------------------------------------------------------------------------

/// A byte string tagged with its text encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedText {
    bytes: Vec<u8>,
    encoding: Encoding,
}

impl EncodedText {
    /// Wrap raw bytes. The bytes are not validated until decoded.
    pub fn new(bytes: impl Into<Vec<u8>>, encoding: Encoding) -> Self {
        Self {
            bytes: bytes.into(),
            encoding,
        }
    }

    /// Wrap a Rust string as UTF-8 text.
    pub fn utf8(text: impl Into<String>) -> Self {
        Self::new(text.into().into_bytes(), Encoding::Utf8)
    }

    /// Encode a Rust string into `encoding`.
    pub fn encode(text: &str, encoding: Encoding) -> EncodingResult<Self> {
        encode_str(text, encoding, Encoding::Utf8)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the text, returning the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The encoding the bytes are written in.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Returns `true` if there are no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns `true` if the text is pure ASCII in an ASCII-compatible encoding.
    pub fn is_ascii_only(&self) -> bool {
        self.encoding.is_ascii_compatible() && self.bytes.is_ascii()
    }

    /// Decode the bytes into a Rust string.
    ///
    /// Bytes above 0x7F in [`Encoding::Binary`] decode to U+0080..U+00FF so
    /// that re-encoding into `Binary` restores them exactly.
    pub fn decode(&self) -> EncodingResult<String> {
        let invalid = || EncodingError::InvalidByteSequence {
            encoding: self.encoding,
        };
        match self.encoding {
            Encoding::UsAscii => {
                if self.bytes.is_ascii() {
                    Ok(self.bytes.iter().map(|&b| b as char).collect())
                } else {
                    Err(invalid())
                }
            }
            Encoding::Utf8 => String::from_utf8(self.bytes.clone()).map_err(|_| invalid()),
            Encoding::Utf16Le | Encoding::Utf16Be => {
                if self.bytes.len() % 2 != 0 {
                    return Err(invalid());
                }
                let little = self.encoding == Encoding::Utf16Le;
                let units = self.bytes.chunks_exact(2).map(|pair| {
                    if little {
                        u16::from_le_bytes([pair[0], pair[1]])
                    } else {
                        u16::from_be_bytes([pair[0], pair[1]])
                    }
                });
                char::decode_utf16(units)
                    .collect::<Result<String, _>>()
                    .map_err(|_| invalid())
            }
            Encoding::Latin1 | Encoding::Binary => {
                Ok(self.bytes.iter().map(|&b| b as char).collect())
            }
        }
    }

    /// Convert the text into another encoding.
    pub fn transcode(&self, to: Encoding) -> EncodingResult<EncodedText> {
        if self.encoding == to {
            return Ok(self.clone());
        }
        let text = self.decode()?;
        encode_str(&text, to, self.encoding)
    }
}

impl From<&str> for EncodedText {
    fn from(value: &str) -> Self {
        Self::utf8(value)
    }
}

impl From<String> for EncodedText {
    fn from(value: String) -> Self {
        Self::utf8(value)
    }
}

/// Encode `text`, which was decoded from `from`, into `to`.
///
/// Characters above 0x7F only round-trip through [`Encoding::Binary`] when
/// the text itself came from binary data.
pub(crate) fn encode_str(text: &str, to: Encoding, from: Encoding) -> EncodingResult<EncodedText> {
    let undefined = |ch: char| EncodingError::UndefinedConversion { ch, from, to };
    let bytes = match to {
        Encoding::Utf8 => {
            if from == Encoding::Binary {
                if let Some(ch) = text.chars().find(|c| !c.is_ascii()) {
                    return Err(undefined(ch));
                }
            }
            text.as_bytes().to_vec()
        }
        Encoding::Utf16Le | Encoding::Utf16Be => {
            if from == Encoding::Binary {
                if let Some(ch) = text.chars().find(|c| !c.is_ascii()) {
                    return Err(undefined(ch));
                }
            }
            let little = to == Encoding::Utf16Le;
            text.encode_utf16()
                .flat_map(|unit| {
                    if little {
                        unit.to_le_bytes()
                    } else {
                        unit.to_be_bytes()
                    }
                })
                .collect()
        }
        Encoding::UsAscii => single_byte(text, 0x7F, undefined)?,
        Encoding::Latin1 => {
            let limit = if from == Encoding::Binary { 0x7F } else { 0xFF };
            single_byte(text, limit, undefined)?
        }
        Encoding::Binary => {
            let limit = if from == Encoding::Binary { 0xFF } else { 0x7F };
            single_byte(text, limit, undefined)?
        }
    };
    Ok(EncodedText::new(bytes, to))
}

fn single_byte(
    text: &str,
    limit: u32,
    undefined: impl Fn(char) -> EncodingError,
) -> EncodingResult<Vec<u8>> {
    text.chars()
        .map(|ch| {
            let code = ch as u32;
            if code <= limit {
                Ok(code as u8)
            } else {
                Err(undefined(ch))
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Two inputs converted into one shared encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciled {
    pub actual: EncodedText,
    pub expected: EncodedText,
}

impl Reconciled {
    /// The shared encoding of both sides.
    pub fn encoding(&self) -> Encoding {
        self.actual.encoding()
    }
}

/// The encoding two texts can be combined in without transcoding content,
/// if any.
///
/// Identical encodings are trivially compatible. Otherwise an empty side, or
/// an ASCII-only side when both encodings are ASCII-compatible, adopts the
/// other side's encoding.
pub fn compatible_encoding(a: &EncodedText, b: &EncodedText) -> Option<Encoding> {
    if a.encoding == b.encoding {
        return Some(a.encoding);
    }
    if b.is_empty() {
        return Some(a.encoding);
    }
    if a.is_empty() {
        return Some(b.encoding);
    }
    if !a.encoding.is_ascii_compatible() || !b.encoding.is_ascii_compatible() {
        return None;
    }
    if b.is_ascii_only() {
        Some(a.encoding)
    } else if a.is_ascii_only() {
        Some(b.encoding)
    } else {
        None
    }
}

/// Bring `actual` and `expected` into a common encoding.
///
/// Falls back to `default_external` when neither side's encoding can hold
/// the other.
pub fn reconcile(
    actual: &EncodedText,
    expected: &EncodedText,
    default_external: Encoding,
) -> EncodingResult<Reconciled> {
    let target = compatible_encoding(actual, expected).unwrap_or(default_external);
    if actual.encoding != target || expected.encoding != target {
        debug!(
            actual = %actual.encoding,
            expected = %expected.encoding,
            target = %target,
            "reconciling encodings"
        );
    }
    Ok(Reconciled {
        actual: actual.transcode(target)?,
        expected: expected.transcode(target)?,
    })
}
