//! Plausibility scoring for the single-byte Cyrillic code pages
//!
//! When a buffer carries no Unicode signature and is not valid UTF-8, it is
//! decoded under every candidate table and the decoding that looks most like
//! Cyrillic prose wins. The weights are tuned for Cyrillic text only.

use serde::Serialize;
use tracing::trace;

use crate::{Encoding, tables};

/// Single-byte candidates, in tie-breaking order.
pub const CANDIDATES: [Encoding; 4] = [
    Encoding::WINDOWS_1251,
    Encoding::KOI8_R,
    Encoding::ISO_8859_5,
    Encoding::MAC_CYRILLIC,
];

/// Extra weight per Cyrillic letter, on top of its plain "good" point.
const CYRILLIC_BONUS: f64 = 1.5;

/// A scored single-byte candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    /// Code page the buffer was decoded with
    pub encoding: Encoding,
    /// Normalized score; higher is more plausible
    pub score: f64,
}

/// Score a decoded scalar sequence.
///
/// Returns the per-scalar average, or `0.0` for an empty sequence.
pub fn score(chars: impl IntoIterator<Item = char>) -> f64 {
    let mut total = 0usize;
    let mut good = 0usize;
    let mut bad = 0usize;
    let mut cyrillic = 0usize;

    for ch in chars {
        total += 1;
        match ch {
            '\0' => bad += 3,
            '\t' | '\n' | '\r' => {}
            '\u{01}'..='\u{1F}' => bad += 2,
            '\u{0400}'..='\u{04FF}' => {
                cyrillic += 1;
                good += 1;
            }
            ' '..='~' | '\u{A0}' | '\u{2116}' => good += 1,
            '\u{FFFD}' => bad += 2,
            // General Punctuation: dashes, quotes, ellipsis
            '\u{2000}'..='\u{206F}' => good += 1,
            _ => {}
        }
    }

    if total == 0 {
        return 0.0;
    }
    let raw = good as f64 - bad as f64 + CYRILLIC_BONUS * cyrillic as f64;
    raw / total as f64
}

/// Score `input` under every candidate code page, in [`CANDIDATES`] order.
pub fn rank(input: &[u8]) -> Vec<Candidate> {
    CANDIDATES
        .iter()
        .filter_map(|&encoding| {
            let table = encoding.code_table()?;
            let score = score(tables::decode(input, table));
            trace!(encoding = encoding.name(), score, "scored single-byte candidate");
            Some(Candidate { encoding, score })
        })
        .collect()
}

/// Pick the best candidate; ties go to the earlier one.
pub fn best(candidates: &[Candidate]) -> Encoding {
    let mut best = Encoding::WINDOWS_1251;
    let mut best_score = f64::NEG_INFINITY;
    for candidate in candidates {
        if candidate.score > best_score {
            best = candidate.encoding;
            best_score = candidate.score;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_score_weights() {
        assert_eq!(score("".chars()), 0.0);
        assert_eq!(score("ab".chars()), 1.0);
        assert_eq!(score("\0".chars()), -3.0);
        assert_eq!(score("\u{7}".chars()), -2.0);
        assert_eq!(score("\u{FFFD}".chars()), -2.0);
        assert_eq!(score("\t\n\r".chars()), 0.0);
        assert_eq!(score("Ж".chars()), 2.5);
        assert_eq!(score("\u{A0}\u{2116}".chars()), 1.0);
        assert_eq!(score("\u{2014}".chars()), 1.0);
        // Box drawing and C1 controls are neutral
        assert_eq!(score("\u{2500}\u{85}".chars()), 0.0);
    }

    #[test]
    fn test_score_is_normalized_by_length() {
        // 2.5 + 1 - 3 over four scalars
        assert_eq!(score("Жa\0\u{2500}".chars()), 0.125);
    }

    #[test]
    fn test_rank_keeps_candidate_order() {
        let ranked = rank(b"plain");
        let order: Vec<Encoding> = ranked.iter().map(|c| c.encoding).collect();
        assert_eq!(order, CANDIDATES);
        assert!(ranked.iter().all(|c| c.score == 1.0));
    }

    #[test]
    fn test_tie_goes_to_windows_1251() {
        // Every table decodes these bytes to Cyrillic letters only
        let ranked = rank(&[0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2]);
        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(best(&ranked), Encoding::WINDOWS_1251);
    }

    #[test]
    fn test_koi8_r_text_prefers_koi8_r() {
        // "Привет, мама ≤ 5" in KOI8-R. The letters tie with Windows-1251;
        // 0x98 is undefined there.
        let koi8 = [
            0xF0, 0xD2, 0xC9, 0xD7, 0xC5, 0xD4, b',', b' ', 0xCD, 0xC1, 0xCD, 0xC1, b' ', 0x98,
            b' ', b'5',
        ];
        let ranked = rank(&koi8);
        assert!(ranked[1].score > ranked[0].score);
        assert_eq!(best(&ranked), Encoding::KOI8_R);
    }

    #[test]
    fn test_iso_8859_5_text_prefers_iso_8859_5() {
        // "ЛЕС ЛЕС" in ISO-8859-5; 0xBB and 0xB5 are symbols in Windows-1251
        let iso = [0xBB, 0xB5, 0xC1, b' ', 0xBB, 0xB5, 0xC1];
        assert_eq!(best(&rank(&iso)), Encoding::ISO_8859_5);
    }

    #[test]
    fn test_best_of_nothing_is_windows_1251() {
        assert_eq!(best(&[]), Encoding::WINDOWS_1251);
    }

    proptest! {
        #[test]
        fn ranking_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 1..256)) {
            let first = rank(&bytes);
            let second = rank(&bytes);
            prop_assert_eq!(best(&first), best(&second));
            prop_assert_eq!(first, second);
        }
    }
}
