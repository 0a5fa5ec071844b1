//! # utf8-convert - Encoding Detection and UTF-8 Normalization
//!
//! Detects the character encoding of a byte buffer of unknown origin and
//! transcodes it to UTF-8.
//!
//! ## Features
//!
//! - **Unicode signatures**: UTF-8, UTF-16LE/BE and UTF-32LE/BE byte order marks
//! - **BOM-less Unicode**: null-byte heuristics for UTF-16 and UTF-32
//! - **Legacy Cyrillic code pages**: Windows-1251, KOI8-R, ISO-8859-5 and
//!   MacCyrillic, chosen by a plausibility score
//! - **Lossless pass-through** of input that is already UTF-8
//! - **Never fails on content**: malformed input decodes to U+FFFD
//! - **Atomic in-place file conversion**
//!
//! ## Quick Start
//!
//! ```rust
//! use utf8_convert::{Encoding, convert_to_utf8, detect_encoding};
//!
//! // "Привет" in Windows-1251
//! let legacy = &[0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2];
//! assert_eq!(detect_encoding(legacy), Encoding::WINDOWS_1251);
//!
//! let converted = convert_to_utf8(legacy);
//! assert_eq!(converted.text, "Привет");
//! assert_eq!(converted.encoding.name(), "WINDOWS-1251");
//! ```

#![deny(missing_docs)]

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Serialize, Serializer};

pub mod detection;
pub mod fs;
mod multibyte;
pub mod scoring;
mod tables;

pub use detection::{DetectionMethod, DetectionResult, detect};

use multibyte::ByteOrder;

/// Result type for fallible operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate
///
/// Content never produces an error: undecodable bytes become U+FFFD. Errors
/// come from the file system or from parsing encoding names.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Encoding name not recognized
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),
    /// Input file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Output file could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// File being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Converted file could not be moved over the original
    #[error("Failed to replace {}: {source}", .path.display())]
    Replace {
        /// File being replaced
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Supported character encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Encoding {
    // Unicode encodings
    /// UTF-8 Unicode encoding (variable length, 1-4 bytes)
    UTF8,
    /// UTF-16LE Unicode encoding (little endian)
    UTF16LE,
    /// UTF-16BE Unicode encoding (big endian)
    UTF16BE,
    /// UTF-32LE Unicode encoding (little endian)
    UTF32LE,
    /// UTF-32BE Unicode encoding (big endian)
    UTF32BE,

    // Single-byte Cyrillic code pages
    /// Windows-1251 (Cyrillic)
    WINDOWS_1251,
    /// KOI8-R (Russian)
    KOI8_R,
    /// ISO-8859-5 (Latin/Cyrillic)
    ISO_8859_5,
    /// Macintosh Cyrillic
    MAC_CYRILLIC,
}

impl Encoding {
    /// Every supported encoding, Unicode first
    pub const ALL: [Encoding; 9] = [
        Encoding::UTF8,
        Encoding::UTF16LE,
        Encoding::UTF16BE,
        Encoding::UTF32LE,
        Encoding::UTF32BE,
        Encoding::WINDOWS_1251,
        Encoding::KOI8_R,
        Encoding::ISO_8859_5,
        Encoding::MAC_CYRILLIC,
    ];

    /// Get the canonical name of this encoding
    pub fn name(self) -> &'static str {
        match self {
            Encoding::UTF8 => "UTF-8",
            Encoding::UTF16LE => "UTF-16LE",
            Encoding::UTF16BE => "UTF-16BE",
            Encoding::UTF32LE => "UTF-32LE",
            Encoding::UTF32BE => "UTF-32BE",
            Encoding::WINDOWS_1251 => "WINDOWS-1251",
            Encoding::KOI8_R => "KOI8-R",
            Encoding::ISO_8859_5 => "ISO-8859-5",
            Encoding::MAC_CYRILLIC => "MACCYRILLIC",
        }
    }

    /// Check if this is one of the Unicode encodings
    pub fn is_unicode(self) -> bool {
        self.bom().is_some()
    }

    /// Get the byte order mark (BOM) for this encoding if it has one
    pub fn bom(self) -> Option<&'static [u8]> {
        match self {
            Encoding::UTF8 => Some(&[0xEF, 0xBB, 0xBF]),
            Encoding::UTF16LE => Some(&[0xFF, 0xFE]),
            Encoding::UTF16BE => Some(&[0xFE, 0xFF]),
            Encoding::UTF32LE => Some(&[0xFF, 0xFE, 0x00, 0x00]),
            Encoding::UTF32BE => Some(&[0x00, 0x00, 0xFE, 0xFF]),
            Encoding::WINDOWS_1251
            | Encoding::KOI8_R
            | Encoding::ISO_8859_5
            | Encoding::MAC_CYRILLIC => None,
        }
    }

    pub(crate) fn code_table(self) -> Option<&'static tables::CodeTable> {
        match self {
            Encoding::WINDOWS_1251 => Some(&tables::WINDOWS_1251),
            Encoding::KOI8_R => Some(&tables::KOI8_R),
            Encoding::ISO_8859_5 => Some(&tables::ISO_8859_5),
            Encoding::MAC_CYRILLIC => Some(&tables::MAC_CYRILLIC),
            Encoding::UTF8
            | Encoding::UTF16LE
            | Encoding::UTF16BE
            | Encoding::UTF32LE
            | Encoding::UTF32BE => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    /// Parse a canonical name or a common alias, ignoring case and separators.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let encoding = match key.as_str() {
            "UTF8" => Encoding::UTF8,
            "UTF16LE" => Encoding::UTF16LE,
            "UTF16BE" => Encoding::UTF16BE,
            "UTF32LE" => Encoding::UTF32LE,
            "UTF32BE" => Encoding::UTF32BE,
            "WINDOWS1251" | "WIN1251" | "CP1251" => Encoding::WINDOWS_1251,
            "KOI8R" | "KOI8" => Encoding::KOI8_R,
            "ISO88595" | "ISOIR144" => Encoding::ISO_8859_5,
            "MACCYRILLIC" | "XMACCYRILLIC" | "CP10007" => Encoding::MAC_CYRILLIC,
            _ => return Err(Error::UnknownEncoding(s.to_string())),
        };

        Ok(encoding)
    }
}

impl Serialize for Encoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Input transcoded to UTF-8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion<'a> {
    /// Converted text; borrows the input when it already was UTF-8
    pub text: Cow<'a, str>,
    /// Encoding the input was decoded from
    pub encoding: Encoding,
    /// Length of the byte order mark that was skipped, if any
    pub bom_len: Option<usize>,
}

impl Conversion<'_> {
    /// Converted text as UTF-8 bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Take the converted text as UTF-8 bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_owned().into_bytes()
    }
}

/// Detect the encoding of `input`.
///
/// Always returns an encoding; an empty buffer is reported as UTF-8.
pub fn detect_encoding(input: &[u8]) -> Encoding {
    detect(input).encoding
}

/// Detect the encoding of `input` and transcode it to UTF-8.
///
/// A byte order mark is never part of the output. Input that is already
/// UTF-8 is borrowed, not copied.
pub fn convert_to_utf8(input: &[u8]) -> Conversion<'_> {
    let detection = detect(input);
    Conversion {
        text: decode(detection.encoding, detection.payload(input)),
        encoding: detection.encoding,
        bom_len: detection.bom_len,
    }
}

/// Transcode `input` to UTF-8 from a known encoding.
///
/// A leading byte order mark is skipped when it belongs to `encoding`.
pub fn convert_from(input: &[u8], encoding: Encoding) -> Conversion<'_> {
    let bom_len = encoding
        .bom()
        .filter(|bom| input.starts_with(bom))
        .map(<[u8]>::len);
    Conversion {
        text: decode(encoding, &input[bom_len.unwrap_or(0)..]),
        encoding,
        bom_len,
    }
}

/// Decode `input` as `encoding` into UTF-8.
///
/// Malformed sequences decode to U+FFFD. No byte order mark is stripped.
pub fn decode(encoding: Encoding, input: &[u8]) -> Cow<'_, str> {
    let text = match encoding {
        Encoding::UTF8 => return String::from_utf8_lossy(input),
        Encoding::UTF16LE => multibyte::to_utf8(multibyte::decode_utf16(input, ByteOrder::Little)),
        Encoding::UTF16BE => multibyte::to_utf8(multibyte::decode_utf16(input, ByteOrder::Big)),
        Encoding::UTF32LE => multibyte::to_utf8(multibyte::decode_utf32(input, ByteOrder::Little)),
        Encoding::UTF32BE => multibyte::to_utf8(multibyte::decode_utf32(input, ByteOrder::Big)),
        Encoding::WINDOWS_1251 => single_byte(input, &tables::WINDOWS_1251),
        Encoding::KOI8_R => single_byte(input, &tables::KOI8_R),
        Encoding::ISO_8859_5 => single_byte(input, &tables::ISO_8859_5),
        Encoding::MAC_CYRILLIC => single_byte(input, &tables::MAC_CYRILLIC),
    };
    Cow::Owned(text)
}

fn single_byte(input: &[u8], table: &tables::CodeTable) -> String {
    multibyte::to_utf8(tables::decode(input, table))
}
