//! Encoding detection using byte order marks, byte-pattern heuristics and
//! single-byte scoring
//!
//! Detection runs a fixed pipeline and stops at the first stage that decides:
//!
//! 1. a Unicode byte order mark,
//! 2. the null-byte heuristics for BOM-less UTF-32 and UTF-16,
//! 3. UTF-8 validation,
//! 4. scoring of the single-byte Cyrillic code pages.
//!
//! Detection never fails: every input gets an encoding.

use serde::Serialize;
use tracing::debug;

use crate::Encoding;
use crate::scoring::{self, Candidate};

/// Minimum input length for the UTF-16 heuristics
const MIN_UTF16_LEN: usize = 6;
/// Minimum input length for the UTF-32 heuristics
const MIN_UTF32_LEN: usize = 8;

/// Signatures in match order. The UTF-32LE mark starts with the UTF-16LE one,
/// so the four-byte marks go first.
const BOMS: [(Encoding, &[u8]); 5] = [
    (Encoding::UTF32LE, &[0xFF, 0xFE, 0x00, 0x00]),
    (Encoding::UTF32BE, &[0x00, 0x00, 0xFE, 0xFF]),
    (Encoding::UTF8, &[0xEF, 0xBB, 0xBF]),
    (Encoding::UTF16LE, &[0xFF, 0xFE]),
    (Encoding::UTF16BE, &[0xFE, 0xFF]),
];

/// Pipeline stage that decided the encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMethod {
    /// The input was empty
    Empty,
    /// A byte order mark was found
    Bom,
    /// Null-byte distribution matched a UTF-16 or UTF-32 layout
    Heuristic,
    /// The input is well-formed UTF-8
    Utf8Validation,
    /// Best single-byte code page by score
    Scoring,
}

impl DetectionMethod {
    /// Short lowercase label, as used in JSON output
    pub fn name(self) -> &'static str {
        match self {
            DetectionMethod::Empty => "empty",
            DetectionMethod::Bom => "bom",
            DetectionMethod::Heuristic => "heuristic",
            DetectionMethod::Utf8Validation => "utf8-validation",
            DetectionMethod::Scoring => "scoring",
        }
    }
}

/// Result of encoding detection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    /// Detected encoding
    pub encoding: Encoding,
    /// Length of the byte order mark to skip, if one was found
    pub bom_len: Option<usize>,
    /// Stage that decided
    pub method: DetectionMethod,
    /// Scores of the single-byte candidates; empty unless scoring decided
    pub candidates: Vec<Candidate>,
}

impl DetectionResult {
    fn new(encoding: Encoding, bom_len: Option<usize>, method: DetectionMethod) -> Self {
        Self {
            encoding,
            bom_len,
            method,
            candidates: Vec::new(),
        }
    }

    /// Whether a byte order mark was found
    pub fn bom_detected(&self) -> bool {
        self.bom_len.is_some()
    }

    /// Input with the byte order mark, if any, removed
    pub fn payload<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.bom_len.unwrap_or(0)..]
    }
}

/// Detect the encoding of `input`.
pub fn detect(input: &[u8]) -> DetectionResult {
    if input.is_empty() {
        return DetectionResult::new(Encoding::UTF8, None, DetectionMethod::Empty);
    }

    if let Some((encoding, bom_len)) = detect_bom(input) {
        debug!(encoding = encoding.name(), bom_len, "byte order mark found");
        if encoding == Encoding::UTF8 {
            let payload = &input[bom_len..];
            if !is_valid_utf8(payload) {
                debug!("content after UTF-8 byte order mark is not UTF-8, scoring it");
                let mut result = score_single_byte(payload);
                result.bom_len = Some(bom_len);
                return result;
            }
        }
        return DetectionResult::new(encoding, Some(bom_len), DetectionMethod::Bom);
    }

    if let Some(encoding) = detect_wide(input) {
        debug!(encoding = encoding.name(), "null-byte heuristic matched");
        return DetectionResult::new(encoding, None, DetectionMethod::Heuristic);
    }

    if is_valid_utf8(input) {
        debug!("input is valid UTF-8");
        return DetectionResult::new(Encoding::UTF8, None, DetectionMethod::Utf8Validation);
    }

    score_single_byte(input)
}

fn score_single_byte(input: &[u8]) -> DetectionResult {
    let candidates = scoring::rank(input);
    let encoding = scoring::best(&candidates);
    debug!(encoding = encoding.name(), "single-byte code page selected by score");
    DetectionResult {
        encoding,
        bom_len: None,
        method: DetectionMethod::Scoring,
        candidates,
    }
}

/// Detect a Unicode byte order mark, returning the encoding and mark length.
pub fn detect_bom(input: &[u8]) -> Option<(Encoding, usize)> {
    BOMS.iter()
        .find(|(_, bom)| input.starts_with(bom))
        .map(|&(encoding, bom)| (encoding, bom.len()))
}

/// Guess BOM-less UTF-32 or UTF-16 from where the zero bytes sit.
///
/// Checked in the order UTF-32LE, UTF-32BE, UTF-16LE, UTF-16BE.
pub fn detect_wide(input: &[u8]) -> Option<Encoding> {
    if looks_like_utf32_le(input) {
        Some(Encoding::UTF32LE)
    } else if looks_like_utf32_be(input) {
        Some(Encoding::UTF32BE)
    } else if looks_like_utf16_le(input) {
        Some(Encoding::UTF16LE)
    } else if looks_like_utf16_be(input) {
        Some(Encoding::UTF16BE)
    } else {
        None
    }
}

/// Count zero bytes at the first and second position of each 2-byte unit.
fn utf16_zero_counts(input: &[u8]) -> (usize, usize) {
    input
        .chunks_exact(2)
        .fold((0, 0), |(even, odd), unit| {
            (even + usize::from(unit[0] == 0), odd + usize::from(unit[1] == 0))
        })
}

/// Count 4-byte units whose three high-order bytes are zero.
fn utf32_zero_units(input: &[u8], high: std::ops::Range<usize>) -> usize {
    input
        .chunks_exact(4)
        .filter(|unit| unit[high.clone()].iter().all(|&b| b == 0))
        .count()
}

/// UTF-16LE: ASCII-range text has a zero high byte in second position.
pub(crate) fn looks_like_utf16_le(input: &[u8]) -> bool {
    if input.len() < MIN_UTF16_LEN {
        return false;
    }
    let (even, odd) = utf16_zero_counts(input);
    odd > even * 3 && odd > input.len() / 8
}

/// UTF-16BE: ASCII-range text has a zero high byte in first position.
pub(crate) fn looks_like_utf16_be(input: &[u8]) -> bool {
    if input.len() < MIN_UTF16_LEN {
        return false;
    }
    let (even, odd) = utf16_zero_counts(input);
    even > odd * 3 && even > input.len() / 8
}

/// UTF-32LE: bytes 1..=3 of each unit are zero for most BMP text.
pub(crate) fn looks_like_utf32_le(input: &[u8]) -> bool {
    input.len() >= MIN_UTF32_LEN && utf32_zero_units(input, 1..4) > input.len() / 16
}

/// UTF-32BE: bytes 0..=2 of each unit are zero for most BMP text.
pub(crate) fn looks_like_utf32_be(input: &[u8]) -> bool {
    input.len() >= MIN_UTF32_LEN && utf32_zero_units(input, 0..3) > input.len() / 16
}

/// Validate that `input` is well-formed UTF-8.
///
/// Rejects overlong forms, surrogate code points, values above U+10FFFF and
/// truncated sequences.
pub fn is_valid_utf8(input: &[u8]) -> bool {
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];

        if byte < 0x80 {
            i += 1;
            continue;
        }

        let extra = if (byte & 0xE0) == 0xC0 {
            // 0xC0 and 0xC1 could only encode overlong ASCII
            if byte < 0xC2 {
                return false;
            }
            1
        } else if (byte & 0xF0) == 0xE0 {
            2
        } else if (byte & 0xF8) == 0xF0 {
            if byte > 0xF4 {
                return false;
            }
            3
        } else {
            return false;
        };

        if i + extra >= input.len() {
            return false;
        }
        if !input[i + 1..=i + extra].iter().all(|&b| (b & 0xC0) == 0x80) {
            return false;
        }

        let second = input[i + 1];
        let in_range = match byte {
            0xE0 => second >= 0xA0,
            0xED => second < 0xA0,
            0xF0 => second >= 0x90,
            0xF4 => second < 0x90,
            _ => true,
        };
        if !in_range {
            return false;
        }

        i += extra + 1;
    }

    true
}
