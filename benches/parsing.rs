//! Benchmarks for whatsarchive parsing and archive naming.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench parsing -- parse_str`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use whatsarchive::archive::archive_name;
use whatsarchive::config::ParserConfig;
use whatsarchive::parser::ChatParser;
use whatsarchive::parsing::{classify_line, repair_mojibake};

// =============================================================================
// Test Data Generators
// =============================================================================

fn generate_export(count: usize) -> String {
    let mut lines = Vec::with_capacity(count);
    for i in 0..count {
        let sender = if i % 2 == 0 { "Khalid Elm" } else { "Mourad" };
        let hour = i % 24;
        let minute = i % 60;
        let line = match i % 10 {
            0 => format!("[3/30/24, {hour}:{minute:02}:00] {sender}: <attached: 000{i}-PHOTO.jpg>"),
            1 => format!("[3/30/24, {hour}:{minute:02}] {sender}: \u{200e}image omitted"),
            2 => "continuation line without a header".to_string(),
            3 => String::new(),
            _ => format!("[3/30/24, {hour:02}:{minute:02}:00] {sender}: Message number {i}"),
        };
        lines.push(line);
    }
    lines.join("\n")
}

// =============================================================================
// Parsing Benchmarks
// =============================================================================

fn bench_parse_str(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_str");
    let parser = ChatParser::new();

    for size in [100_usize, 1_000, 10_000, 50_000] {
        let txt = generate_export(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txt, |b, txt| {
            b.iter(|| black_box(parser.parse_str(black_box(txt))));
        });
    }
    group.finish();
}

fn bench_parse_str_fix_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_str_fix_encoding");
    let parser = ChatParser::with_config(ParserConfig::new().with_fix_encoding(true));

    for size in [1_000_usize, 10_000] {
        let txt = generate_export(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txt, |b, txt| {
            b.iter(|| black_box(parser.parse_str(black_box(txt))));
        });
    }
    group.finish();
}

fn bench_classify_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_line");
    let cases = [
        ("with_seconds", "[3/30/24, 15:23:34] Khalid Elm: Salam Mourad hanya wella ?"),
        ("without_seconds", "[3/30/24, 15:23] Khalid Elm: Salam"),
        ("unrecognized", "just a continuation line of some earlier message"),
    ];

    for (name, line) in cases {
        group.bench_function(name, |b| b.iter(|| black_box(classify_line(black_box(line)))));
    }
    group.finish();
}

fn bench_repair_mojibake(c: &mut Criterion) {
    let mut group = c.benchmark_group("repair_mojibake");
    let cases = [
        ("ascii", "[3/30/24, 15:23:34] Ann: plain text"),
        ("broken", "[3/30/24, 15:23:34] Ann: cafÃ© Ã  la carte"),
    ];

    for (name, line) in cases {
        group.bench_function(name, |b| b.iter(|| black_box(repair_mojibake(black_box(line)))));
    }
    group.finish();
}

// =============================================================================
// Archive Benchmarks
// =============================================================================

fn bench_archive_name(c: &mut Criterion) {
    let long = "Khalid Elm & Mourad & Иван & 村上 & a very long group title".repeat(4);
    c.bench_function("archive_name", |b| {
        b.iter(|| black_box(archive_name(black_box(&long))));
    });
}

criterion_group!(
    parsing,
    bench_parse_str,
    bench_parse_str_fix_encoding,
    bench_classify_line,
    bench_repair_mojibake
);
criterion_group!(archive, bench_archive_name);
criterion_main!(parsing, archive);
