use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nbtfile::{decode_root, encode_root, resolve, TagPath};
use nbtfile_benchmark::{chunk_like, nested, nested_path};

// ============================================================================
// Encode / decode
// ============================================================================

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_root");
    for sections in [1usize, 8, 24] {
        let root = chunk_like(sections, 42);
        let size = encode_root("", &root).unwrap().len();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &root, |b, root| {
            b.iter(|| encode_root(black_box(""), black_box(root)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_root");
    for sections in [1usize, 8, 24] {
        let bytes = encode_root("", &chunk_like(sections, 42)).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(sections),
            &bytes,
            |b, bytes| b.iter(|| decode_root(black_box(bytes)).unwrap()),
        );
    }
    group.finish();
}

fn bench_nested_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_nested");
    for depth in [16usize, 128, 500] {
        let bytes = encode_root("", &nested(depth)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &bytes, |b, bytes| {
            b.iter(|| decode_root(black_box(bytes)).unwrap())
        });
    }
    group.finish();
}

// ============================================================================
// Query
// ============================================================================

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    let chunk = chunk_like(8, 7);
    let path = TagPath::parse("Entities[17].Pos[1]").unwrap();
    group.bench_function("parse", |b| {
        b.iter(|| TagPath::parse(black_box("Entities[17].Pos[1]")).unwrap())
    });
    group.bench_function("resolve_shallow", |b| {
        b.iter(|| resolve(black_box(&chunk), black_box(&path)).unwrap())
    });

    let deep = nested(256);
    let deep_path = TagPath::parse(&nested_path(256)).unwrap();
    group.bench_function("resolve_deep_256", |b| {
        b.iter(|| resolve(black_box(&deep), black_box(&deep_path)).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_nested_decode,
    bench_query
);
criterion_main!(benches);
