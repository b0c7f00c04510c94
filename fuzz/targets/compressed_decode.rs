#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nbtfile::{Compression, NbtFile};

#[derive(Debug, Arbitrary)]
enum FuzzMode {
    None,
    Zstd,
    Gzip,
    Zlib,
    Lz4,
}

impl From<FuzzMode> for Compression {
    fn from(m: FuzzMode) -> Self {
        match m {
            FuzzMode::None => Compression::None,
            FuzzMode::Zstd => Compression::Zstd,
            FuzzMode::Gzip => Compression::Gzip,
            FuzzMode::Zlib => Compression::Zlib,
            FuzzMode::Lz4 => Compression::Lz4,
        }
    }
}

#[derive(Debug, Arbitrary)]
struct CompressedFuzzInput {
    mode: FuzzMode,
    /// Повреждённый или случайный сжатый блок
    payload: Vec<u8>,
}

fuzz_target!(|input: CompressedFuzzInput| {
    let mode: Compression = input.mode.into();
    // Ошибки ожидаемы, паники нет
    if let Ok(doc) = NbtFile::from_bytes(&input.payload, mode) {
        let bytes = doc.to_bytes().expect("loaded document must re-encode");
        NbtFile::from_bytes(&bytes, mode).expect("re-encoded document must load");
    }
});
