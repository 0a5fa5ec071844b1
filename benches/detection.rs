//! Detection and conversion throughput.
//!
//! Each input kind exercises a different pipeline stage: valid UTF-8 stops at
//! validation, BOM-less UTF-16 at the null-byte heuristics, and legacy
//! Cyrillic text runs the full single-byte scorer.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use utf8_convert::{Encoding, convert_to_utf8, decode, detect_encoding};

const SAMPLE: &str = "Съешь же ещё этих мягких французских булок, да выпей чаю. ";

fn utf8_input(repeat: usize) -> Vec<u8> {
    SAMPLE.repeat(repeat).into_bytes()
}

fn utf16le_input(repeat: usize) -> Vec<u8> {
    SAMPLE.repeat(repeat).encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Windows-1251 bytes for the sample: Cyrillic letters map to 0xC0..=0xFF.
fn windows_1251_input(repeat: usize) -> Vec<u8> {
    SAMPLE
        .repeat(repeat)
        .chars()
        .map(|c| match c {
            'ё' => 0xB8,
            'Ё' => 0xA8,
            'А'..='я' => (u32::from(c) - 0x0410 + 0xC0) as u8,
            _ => c as u8,
        })
        .collect()
}

fn inputs(repeat: usize) -> [(&'static str, Vec<u8>); 3] {
    [
        ("utf8", utf8_input(repeat)),
        ("utf16le", utf16le_input(repeat)),
        ("windows-1251", windows_1251_input(repeat)),
    ]
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");

    for repeat in [1, 64, 1024] {
        for (kind, input) in inputs(repeat) {
            group.throughput(Throughput::Bytes(input.len() as u64));
            group.bench_with_input(BenchmarkId::new(kind, repeat), &input, |b, input| {
                b.iter(|| detect_encoding(black_box(input)));
            });
        }
    }

    group.finish();
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    for (kind, input) in inputs(256) {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(kind), &input, |b, input| {
            b.iter(|| black_box(convert_to_utf8(black_box(input)).into_bytes()));
        });
    }

    group.finish();
}

fn bench_decode_forced(c: &mut Criterion) {
    let input = windows_1251_input(256);
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(input.len() as u64));

    for encoding in [Encoding::WINDOWS_1251, Encoding::KOI8_R, Encoding::MAC_CYRILLIC] {
        group.bench_with_input(BenchmarkId::from_parameter(encoding), &input, |b, input| {
            b.iter(|| decode(encoding, black_box(input)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detect, bench_convert, bench_decode_forced);
criterion_main!(benches);
