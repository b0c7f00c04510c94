use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nbtfile::{
    codec::{compress_block, decompress_block, GzipCodec, Lz4Codec, ZlibCodec, ZstdCodec},
    encode_root, BlockCodec, Compression, NbtFile,
};
use nbtfile_benchmark::chunk_like;
use tempfile::tempdir;

const MODES: [Compression; 5] = [
    Compression::None,
    Compression::Zstd,
    Compression::Gzip,
    Compression::Zlib,
    Compression::Lz4,
];

fn bench_compress_modes(c: &mut Criterion) {
    let raw = encode_root("", &chunk_like(16, 1)).unwrap();
    let mut group = c.benchmark_group("compress");
    group.throughput(Throughput::Bytes(raw.len() as u64));
    for mode in MODES {
        group.bench_with_input(BenchmarkId::from_parameter(mode), &raw, |b, raw| {
            b.iter(|| compress_block(black_box(raw), mode).unwrap())
        });
    }
    group.finish();
}

fn bench_decompress_modes(c: &mut Criterion) {
    let raw = encode_root("", &chunk_like(16, 1)).unwrap();
    let mut group = c.benchmark_group("decompress");
    group.throughput(Throughput::Bytes(raw.len() as u64));
    for mode in MODES {
        let packed = compress_block(&raw, mode).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(mode), &packed, |b, packed| {
            b.iter(|| decompress_block(black_box(packed), mode).unwrap())
        });
    }
    group.finish();
}

/// Размер и скорость при разных уровнях сжатия.
fn bench_levels(c: &mut Criterion) {
    let raw = encode_root("", &chunk_like(16, 1)).unwrap();
    let mut group = c.benchmark_group("levels");
    group.throughput(Throughput::Bytes(raw.len() as u64));

    let codecs: Vec<(String, Box<dyn BlockCodec>)> = vec![
        ("zstd-1".to_string(), Box::new(ZstdCodec { level: 1 }) as Box<dyn BlockCodec>),
        ("zstd-3".to_string(), Box::new(ZstdCodec { level: 3 }) as Box<dyn BlockCodec>),
        ("zstd-19".to_string(), Box::new(ZstdCodec { level: 19 }) as Box<dyn BlockCodec>),
        ("gzip-1".to_string(), Box::new(GzipCodec { level: 1 }) as Box<dyn BlockCodec>),
        ("gzip-9".to_string(), Box::new(GzipCodec { level: 9 }) as Box<dyn BlockCodec>),
        ("zlib-6".to_string(), Box::new(ZlibCodec { level: 6 }) as Box<dyn BlockCodec>),
        ("lz4".to_string(), Box::new(Lz4Codec) as Box<dyn BlockCodec>),
    ];
    for (label, codec) in &codecs {
        group.bench_with_input(BenchmarkId::from_parameter(label), &raw, |b, raw| {
            b.iter(|| codec.compress(black_box(raw)).unwrap())
        });
    }
    group.finish();
}

fn bench_atomic_save(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chunk.dat");
    let mut doc = NbtFile::new("", chunk_like(8, 3));

    let mut group = c.benchmark_group("save");
    group.sample_size(20);
    for mode in [Compression::None, Compression::Zstd] {
        group.bench_function(BenchmarkId::from_parameter(mode), |b| {
            b.iter(|| doc.save_with(black_box(&path), mode).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_compress_modes,
    bench_decompress_modes,
    bench_levels,
    bench_atomic_save
);
criterion_main!(benches);
