//! End-to-end conversion of files on disk through the public API.

use std::fs;

use tempfile::TempDir;
use utf8_convert::fs::{convert_file, convert_file_in_place, convert_file_to, detect_file};
use utf8_convert::{DetectionMethod, Encoding, detect};

const PANGRAM: &str = "Съешь же ещё этих мягких французских булок, да выпей чаю.";

fn utf16(text: &str, little_endian: bool, bom: bool) -> Vec<u8> {
    let mut bytes = Vec::new();
    let units: Vec<u16> = if bom {
        std::iter::once(0xFEFF).chain(text.encode_utf16()).collect()
    } else {
        text.encode_utf16().collect()
    };
    for unit in units {
        if little_endian {
            bytes.extend_from_slice(&unit.to_le_bytes());
        } else {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
    }
    bytes
}

fn windows_1251(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            'ё' => 0xB8,
            'Ё' => 0xA8,
            'А'..='я' => (u32::from(c) - 0x0410 + 0xC0) as u8,
            _ => c as u8,
        })
        .collect()
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn file(&self, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

#[test]
fn test_mixed_directory_normalizes_to_utf8() {
    let fixture = Fixture::new();
    let cases = [
        ("plain.txt", PANGRAM.as_bytes().to_vec(), Encoding::UTF8),
        ("bom16le.txt", utf16(PANGRAM, true, true), Encoding::UTF16LE),
        ("bom16be.txt", utf16(PANGRAM, false, true), Encoding::UTF16BE),
        ("legacy.txt", windows_1251(PANGRAM), Encoding::WINDOWS_1251),
    ];

    for (name, contents, expected) in cases {
        let path = fixture.file(name, &contents);
        assert_eq!(detect_file(&path).unwrap(), expected, "{name}");

        assert_eq!(convert_file_in_place(&path).unwrap(), expected, "{name}");
        assert_eq!(fs::read_to_string(&path).unwrap(), PANGRAM, "{name}");

        // Converting again is a no-op
        assert_eq!(convert_file_in_place(&path).unwrap(), Encoding::UTF8, "{name}");
        assert_eq!(fs::read_to_string(&path).unwrap(), PANGRAM, "{name}");
    }

    let leftovers: Vec<_> = fs::read_dir(fixture.dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .filter(|name| name.to_string_lossy().ends_with(".utf8.tmp"))
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}

#[test]
fn test_utf8_bom_is_dropped_on_disk() {
    let fixture = Fixture::new();
    let mut contents = vec![0xEF, 0xBB, 0xBF];
    contents.extend_from_slice(PANGRAM.as_bytes());
    let input = fixture.file("bom8.txt", &contents);
    let output = fixture.dir.path().join("out.txt");

    assert_eq!(convert_file_to(&input, &output).unwrap(), Encoding::UTF8);
    assert_eq!(fs::read(&output).unwrap(), PANGRAM.as_bytes());
    assert_eq!(fs::read(&input).unwrap(), contents);
}

#[test]
fn test_convert_file_reports_encoding_and_bytes() {
    let fixture = Fixture::new();
    let path = fixture.file("ascii16.txt", &utf16("Hello, world", true, false));

    let (bytes, encoding) = convert_file(&path).unwrap();
    assert_eq!(encoding, Encoding::UTF16LE);
    assert_eq!(bytes, b"Hello, world");
}

#[test]
fn test_detection_result_serializes() {
    let result = detect(&windows_1251("Привет"));
    assert_eq!(result.method, DetectionMethod::Scoring);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["encoding"], "WINDOWS-1251");
    assert_eq!(json["method"], "scoring");
    assert_eq!(json["bom_len"], serde_json::Value::Null);
    assert_eq!(json["candidates"].as_array().unwrap().len(), 4);
    assert_eq!(json["candidates"][1]["encoding"], "KOI8-R");
}

#[test]
fn test_missing_file_is_an_error() {
    let fixture = Fixture::new();
    let missing = fixture.dir.path().join("nope.txt");

    let err = convert_file_in_place(&missing).unwrap_err();
    assert!(err.to_string().contains("nope.txt"));
    assert!(std::error::Error::source(&err).is_some());
}
