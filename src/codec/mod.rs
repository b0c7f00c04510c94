//! Бинарный кодек NBT.
//!
//! Формат потока (big-endian):
//!
//! ```text
//! named tag := [type: u8] [name_len: u16] [name: UTF-8] [payload]
//! String    := [len: u16] [UTF-8]
//! *Array    := [count: i32] [elements...]
//! List      := [element type: u8] [count: i32] [payload * count]
//! Compound  := [named tag ...] [TAG_End]
//! ```
//!
//! Корень документа всегда `TAG_Compound`. Ошибки разбора содержат смещение
//! в байтах (от начала распакованного потока) и путь до тега.

pub mod compression;
pub mod decode;
pub mod encode;

pub use compression::{
    compress_block, decompress_block, BlockCodec, Compression, GzipCodec, Lz4Codec, ZlibCodec,
    ZstdCodec,
};
pub use decode::{decode_root, read_root, read_root_with, DecodeOptions, Decoder};
pub use encode::{encode_root, write_named_tag, write_payload, write_root, Encoder};

/// Максимальная глубина вложенности контейнеров по умолчанию.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Максимальное число элементов массива или списка по умолчанию (64 Mi).
pub const DEFAULT_MAX_ARRAY_LEN: usize = 64 * 1024 * 1024;

/// Предел длины строки и имени тега в байтах.
pub const MAX_STRING_LEN: usize = u16::MAX as usize;
