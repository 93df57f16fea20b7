//! Criterion benchmarks comparing flato against flate2.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io::{Read, Write};

/// Compressible numbered-line text; the counter keeps every repetition
/// shorter than its distance, which the encoder requires.
fn numbered_text(at_least: usize) -> Vec<u8> {
    let mut text = Vec::with_capacity(at_least + 80);
    let mut line = 0u32;
    while text.len() < at_least {
        text.extend_from_slice(
            format!("line {line} of the corpus repeats this sentence about sliding windows\n")
                .as_bytes(),
        );
        line += 1;
    }
    text
}

/// Near-random bytes without runs or short-period repeats.
fn incompressible(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data: Vec<u8> = Vec::with_capacity(len);
    while data.len() < len {
        let byte: u8 = rng.gen();
        let filled = data.len();
        if filled >= 1 && data[filled - 1] == byte {
            continue;
        }
        if filled >= 2 && data[filled - 2] == byte {
            continue;
        }
        data.push(byte);
    }
    data
}

fn corpora() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("text-48k", numbered_text(48 * 1024)),
        ("random-64k", incompressible(64 * 1024, 99)),
    ]
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("gzip-compress");
    for (name, data) in corpora() {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("flato", name), &data, |b, input| {
            b.iter(|| flato::gzip_compress(input).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("flate2", name), &data, |b, input| {
            b.iter(|| {
                let mut encoder =
                    flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::new(6));
                encoder.write_all(input).unwrap();
                encoder.finish().unwrap()
            });
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("gzip-decompress");
    for (name, data) in corpora() {
        let framed = flato::gzip_compress(&data).unwrap();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("flato", name), &framed, |b, input| {
            b.iter(|| flato::gzip_decompress(input).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("flate2", name), &framed, |b, input| {
            b.iter(|| {
                let mut decoder = flate2::read::GzDecoder::new(input.as_slice());
                let mut out = Vec::new();
                decoder.read_to_end(&mut out).unwrap();
                out
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
