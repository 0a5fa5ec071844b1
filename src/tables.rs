//! Code tables for the single-byte Cyrillic encodings.
//!
//! Each table covers the upper half of the byte range (0x80..=0xFF); the lower
//! half is plain ASCII in every supported code page. An entry of `0` marks a
//! byte the code page leaves undefined.

use std::char::REPLACEMENT_CHARACTER;

/// Upper-half mapping of a single-byte code page: `table[byte - 0x80]`.
pub(crate) type CodeTable = [u16; 128];

/// Windows-1251 (Cyrillic). 0x98 is undefined.
pub(crate) const WINDOWS_1251: CodeTable = [
    0x0402, 0x0403, 0x201A, 0x0453, 0x201E, 0x2026, 0x2020, 0x2021, // 0x80
    0x20AC, 0x2030, 0x0409, 0x2039, 0x040A, 0x040C, 0x040B, 0x040F, // 0x88
    0x0452, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, // 0x90
    0x0000, 0x2122, 0x0459, 0x203A, 0x045A, 0x045C, 0x045B, 0x045F, // 0x98
    0x00A0, 0x040E, 0x045E, 0x0408, 0x00A4, 0x0490, 0x00A6, 0x00A7, // 0xA0
    0x0401, 0x00A9, 0x0404, 0x00AB, 0x00AC, 0x00AD, 0x00AE, 0x0407, // 0xA8
    0x00B0, 0x00B1, 0x0406, 0x0456, 0x0491, 0x00B5, 0x00B6, 0x00B7, // 0xB0
    0x0451, 0x2116, 0x0454, 0x00BB, 0x0458, 0x0405, 0x0455, 0x0457, // 0xB8
    0x0410, 0x0411, 0x0412, 0x0413, 0x0414, 0x0415, 0x0416, 0x0417, // 0xC0
    0x0418, 0x0419, 0x041A, 0x041B, 0x041C, 0x041D, 0x041E, 0x041F, // 0xC8
    0x0420, 0x0421, 0x0422, 0x0423, 0x0424, 0x0425, 0x0426, 0x0427, // 0xD0
    0x0428, 0x0429, 0x042A, 0x042B, 0x042C, 0x042D, 0x042E, 0x042F, // 0xD8
    0x0430, 0x0431, 0x0432, 0x0433, 0x0434, 0x0435, 0x0436, 0x0437, // 0xE0
    0x0438, 0x0439, 0x043A, 0x043B, 0x043C, 0x043D, 0x043E, 0x043F, // 0xE8
    0x0440, 0x0441, 0x0442, 0x0443, 0x0444, 0x0445, 0x0446, 0x0447, // 0xF0
    0x0448, 0x0449, 0x044A, 0x044B, 0x044C, 0x044D, 0x044E, 0x044F, // 0xF8
];

/// KOI8-R (Russian). Box drawing in 0x80..=0xBF, letters in 0xC0..=0xFF.
pub(crate) const KOI8_R: CodeTable = [
    0x2500, 0x2502, 0x250C, 0x2510, 0x2514, 0x2518, 0x251C, 0x2524, // 0x80
    0x252C, 0x2534, 0x253C, 0x2580, 0x2584, 0x2588, 0x258C, 0x2590, // 0x88
    0x2591, 0x2592, 0x2593, 0x2320, 0x25A0, 0x2219, 0x221A, 0x2248, // 0x90
    0x2264, 0x2265, 0x00A0, 0x2321, 0x00B0, 0x00B2, 0x00B7, 0x00F7, // 0x98
    0x2550, 0x2551, 0x2552, 0x0451, 0x2553, 0x2554, 0x2555, 0x2556, // 0xA0
    0x2557, 0x2558, 0x2559, 0x255A, 0x255B, 0x255C, 0x255D, 0x255E, // 0xA8
    0x255F, 0x2560, 0x2561, 0x0401, 0x2562, 0x2563, 0x2564, 0x2565, // 0xB0
    0x2566, 0x2567, 0x2568, 0x2569, 0x256A, 0x256B, 0x256C, 0x00A9, // 0xB8
    0x044E, 0x0430, 0x0431, 0x0446, 0x0434, 0x0435, 0x0444, 0x0433, // 0xC0
    0x0445, 0x0438, 0x0439, 0x043A, 0x043B, 0x043C, 0x043D, 0x043E, // 0xC8
    0x043F, 0x044F, 0x0440, 0x0441, 0x0442, 0x0443, 0x0436, 0x0432, // 0xD0
    0x044C, 0x044B, 0x0437, 0x0448, 0x044D, 0x0449, 0x0447, 0x044A, // 0xD8
    0x042E, 0x0410, 0x0411, 0x0426, 0x0414, 0x0415, 0x0424, 0x0413, // 0xE0
    0x0425, 0x0418, 0x0419, 0x041A, 0x041B, 0x041C, 0x041D, 0x041E, // 0xE8
    0x041F, 0x042F, 0x0420, 0x0421, 0x0422, 0x0423, 0x0416, 0x0412, // 0xF0
    0x042C, 0x042B, 0x0417, 0x0428, 0x042D, 0x0429, 0x0427, 0x042A, // 0xF8
];

/// ISO-8859-5 (Latin/Cyrillic). 0x80..=0x9F are the C1 controls.
pub(crate) const ISO_8859_5: CodeTable = [
    0x0080, 0x0081, 0x0082, 0x0083, 0x0084, 0x0085, 0x0086, 0x0087, // 0x80
    0x0088, 0x0089, 0x008A, 0x008B, 0x008C, 0x008D, 0x008E, 0x008F, // 0x88
    0x0090, 0x0091, 0x0092, 0x0093, 0x0094, 0x0095, 0x0096, 0x0097, // 0x90
    0x0098, 0x0099, 0x009A, 0x009B, 0x009C, 0x009D, 0x009E, 0x009F, // 0x98
    0x00A0, 0x0401, 0x0402, 0x0403, 0x0404, 0x0405, 0x0406, 0x0407, // 0xA0
    0x0408, 0x0409, 0x040A, 0x040B, 0x040C, 0x00AD, 0x040E, 0x040F, // 0xA8
    0x0410, 0x0411, 0x0412, 0x0413, 0x0414, 0x0415, 0x0416, 0x0417, // 0xB0
    0x0418, 0x0419, 0x041A, 0x041B, 0x041C, 0x041D, 0x041E, 0x041F, // 0xB8
    0x0420, 0x0421, 0x0422, 0x0423, 0x0424, 0x0425, 0x0426, 0x0427, // 0xC0
    0x0428, 0x0429, 0x042A, 0x042B, 0x042C, 0x042D, 0x042E, 0x042F, // 0xC8
    0x0430, 0x0431, 0x0432, 0x0433, 0x0434, 0x0435, 0x0436, 0x0437, // 0xD0
    0x0438, 0x0439, 0x043A, 0x043B, 0x043C, 0x043D, 0x043E, 0x043F, // 0xD8
    0x0440, 0x0441, 0x0442, 0x0443, 0x0444, 0x0445, 0x0446, 0x0447, // 0xE0
    0x0448, 0x0449, 0x044A, 0x044B, 0x044C, 0x044D, 0x044E, 0x044F, // 0xE8
    0x2116, 0x0451, 0x0452, 0x0453, 0x0454, 0x0455, 0x0456, 0x0457, // 0xF0
    0x0458, 0x0459, 0x045A, 0x045B, 0x045C, 0x00A7, 0x045E, 0x045F, // 0xF8
];

/// MacCyrillic.
///
/// From 0xB4 upwards this layout differs from Apple's `CYRILLIC.TXT`; the
/// single-byte scores are tuned against it as is.
pub(crate) const MAC_CYRILLIC: CodeTable = [
    0x0410, 0x0411, 0x0412, 0x0413, 0x0414, 0x0415, 0x0416, 0x0417, // 0x80
    0x0418, 0x0419, 0x041A, 0x041B, 0x041C, 0x041D, 0x041E, 0x041F, // 0x88
    0x0420, 0x0421, 0x0422, 0x0423, 0x0424, 0x0425, 0x0426, 0x0427, // 0x90
    0x0428, 0x0429, 0x042A, 0x042B, 0x042C, 0x042D, 0x042E, 0x042F, // 0x98
    0x2020, 0x00B0, 0x0490, 0x00A3, 0x00A7, 0x2022, 0x00B6, 0x0406, // 0xA0
    0x00AE, 0x00A9, 0x2122, 0x0402, 0x0452, 0x2260, 0x0403, 0x0453, // 0xA8
    0x221E, 0x00B1, 0x2264, 0x2265, 0x00A5, 0x0491, 0x0408, 0x0404, // 0xB0
    0x0407, 0x0409, 0x040A, 0x040C, 0x0459, 0x045A, 0x045C, 0x045B, // 0xB8
    0x045F, 0x00A4, 0x00AB, 0x00BB, 0x2591, 0x2592, 0x2593, 0x2502, // 0xC0
    0x2524, 0x00A0, 0x044E, 0x0430, 0x0431, 0x0446, 0x0434, 0x0435, // 0xC8
    0x0444, 0x0433, 0x0445, 0x0438, 0x0439, 0x043A, 0x043B, 0x043C, // 0xD0
    0x043D, 0x043E, 0x043F, 0x044F, 0x0440, 0x0441, 0x0442, 0x0443, // 0xD8
    0x0436, 0x0432, 0x044C, 0x044B, 0x0437, 0x0448, 0x044D, 0x0449, // 0xE0
    0x0447, 0x044A, 0x042E, 0x0410, 0x0411, 0x0426, 0x0414, 0x0415, // 0xE8
    0x0424, 0x0413, 0x0425, 0x0418, 0x0419, 0x041A, 0x041B, 0x041C, // 0xF0
    0x041D, 0x041E, 0x041F, 0x042F, 0x0420, 0x0421, 0x0422, 0x0423, // 0xF8
];

/// Map one byte through `table`.
#[inline]
pub(crate) fn lookup(table: &CodeTable, byte: u8) -> char {
    if byte < 0x80 {
        return char::from(byte);
    }
    match table[usize::from(byte - 0x80)] {
        0 => REPLACEMENT_CHARACTER,
        // Every table entry is a BMP scalar outside the surrogate range
        cp => char::from_u32(u32::from(cp)).unwrap_or(REPLACEMENT_CHARACTER),
    }
}

/// Decode `input` byte-by-byte through `table`.
pub(crate) fn decode<'a>(input: &'a [u8], table: &'a CodeTable) -> impl Iterator<Item = char> + 'a {
    input.iter().map(move |&byte| lookup(table, byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_str(input: &[u8], table: &CodeTable) -> String {
        decode(input, table).collect()
    }

    #[test]
    fn test_ascii_passes_through_every_table() {
        for table in [&WINDOWS_1251, &KOI8_R, &ISO_8859_5, &MAC_CYRILLIC] {
            assert_eq!(decode_str(b"Hello, 42!\t\n", table), "Hello, 42!\t\n");
        }
    }

    #[test]
    fn test_windows_1251_letters() {
        // "Привет"
        let input = &[0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2];
        assert_eq!(decode_str(input, &WINDOWS_1251), "Привет");
        assert_eq!(lookup(&WINDOWS_1251, 0xA8), 'Ё');
        assert_eq!(lookup(&WINDOWS_1251, 0xB9), '№');
        assert_eq!(lookup(&WINDOWS_1251, 0x88), '€');
    }

    #[test]
    fn test_undefined_entry_becomes_replacement() {
        assert_eq!(lookup(&WINDOWS_1251, 0x98), REPLACEMENT_CHARACTER);
    }

    #[test]
    fn test_koi8_r_letters() {
        // "Привет" in KOI8-R
        let input = &[0xF0, 0xD2, 0xC9, 0xD7, 0xC5, 0xD4];
        assert_eq!(decode_str(input, &KOI8_R), "Привет");
        assert_eq!(lookup(&KOI8_R, 0x80), '─');
    }

    #[test]
    fn test_iso_8859_5_letters() {
        // "Мир" in ISO-8859-5
        let input = &[0xBC, 0xD8, 0xE0];
        assert_eq!(decode_str(input, &ISO_8859_5), "Мир");
        assert_eq!(lookup(&ISO_8859_5, 0xF0), '№');
        assert_eq!(lookup(&ISO_8859_5, 0x85), '\u{85}');
    }

    #[test]
    fn test_mac_cyrillic_letters() {
        // "Мир" in MacCyrillic
        let input = &[0x8C, 0xD3, 0xDC];
        assert_eq!(decode_str(input, &MAC_CYRILLIC), "Мир");
        assert_eq!(lookup(&MAC_CYRILLIC, 0xA2), 'Ґ');
    }

    #[test]
    fn test_only_windows_1251_has_undefined_entries() {
        let undefined = |table: &CodeTable| table.iter().filter(|&&cp| cp == 0).count();
        assert_eq!(undefined(&WINDOWS_1251), 1);
        assert_eq!(undefined(&KOI8_R), 0);
        assert_eq!(undefined(&ISO_8859_5), 0);
        assert_eq!(undefined(&MAC_CYRILLIC), 0);
    }
}
