//! Decoders for the multi-byte Unicode encodings (UTF-16 and UTF-32)
//!
//! Both decoders are lossy: malformed code units turn into U+FFFD and decoding
//! carries on. A trailing partial code unit is dropped.

use std::char::REPLACEMENT_CHARACTER;

/// Byte order of a multi-byte code unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ByteOrder {
    /// Least significant byte first
    Little,
    /// Most significant byte first
    Big,
}

impl ByteOrder {
    #[inline]
    fn read_u16(self, unit: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Little => u16::from_le_bytes(unit),
            ByteOrder::Big => u16::from_be_bytes(unit),
        }
    }

    #[inline]
    fn read_u32(self, unit: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(unit),
            ByteOrder::Big => u32::from_be_bytes(unit),
        }
    }
}

/// Decode UTF-16 code units into scalar values.
///
/// A lead surrogate not followed by a trail surrogate yields one U+FFFD and the
/// unit after it is decoded on its own; a lone trail surrogate yields U+FFFD.
pub(crate) fn decode_utf16(input: &[u8], order: ByteOrder) -> impl Iterator<Item = char> + '_ {
    let units = input
        .chunks_exact(2)
        .map(move |chunk| order.read_u16([chunk[0], chunk[1]]));

    char::decode_utf16(units).map(|unit| unit.unwrap_or(REPLACEMENT_CHARACTER))
}

/// Decode UTF-32 code units into scalar values.
///
/// Values above U+10FFFF and surrogate code points yield U+FFFD.
pub(crate) fn decode_utf32(input: &[u8], order: ByteOrder) -> impl Iterator<Item = char> + '_ {
    input.chunks_exact(4).map(move |chunk| {
        let cp = order.read_u32([chunk[0], chunk[1], chunk[2], chunk[3]]);
        char::from_u32(cp).unwrap_or(REPLACEMENT_CHARACTER)
    })
}

/// Re-encode a scalar sequence as UTF-8.
pub(crate) fn to_utf8(chars: impl IntoIterator<Item = char>) -> String {
    let chars = chars.into_iter();
    let mut output = String::with_capacity(chars.size_hint().0);
    let mut buf = [0u8; 4];
    for ch in chars {
        output.push_str(ch.encode_utf8(&mut buf));
    }
    output
}
