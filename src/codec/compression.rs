//! Сжатие файла целиком.
//!
//! Сжатый контейнер состоит из одного непрозрачного блока выбранного
//! кодека. Режим сжатия всегда задаёт вызывающий код: содержимое не
//! анализируется для угадывания формата.
//!
//! Ошибка распаковки никогда не превращается в усечённый результат: поток,
//! оборвавшийся до конца кадра, даёт [`NbtError::Decompression`].

use std::io::{Read, Write};

use flate2::{read::GzDecoder, write::GzEncoder, write::ZlibEncoder, Decompress, FlushDecompress};
use lz4_flex::frame::{FrameDecoder, FrameEncoder};
use nbtfile_error::{NbtError, NbtResult};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Уровень ZSTD по умолчанию: баланс между скоростью и размером.
pub const DEFAULT_ZSTD_LEVEL: i32 = 3;

/// Уровень deflate по умолчанию (как у `flate2::Compression::default()`).
pub const DEFAULT_DEFLATE_LEVEL: u32 = 6;

/// Алгоритм сжатия блока байтов.
pub trait BlockCodec: Send + Sync {
    /// Короткое имя кодека для логов и ошибок.
    fn name(&self) -> &'static str;

    fn compress(
        &self,
        data: &[u8],
    ) -> NbtResult<Vec<u8>>;

    fn decompress(
        &self,
        data: &[u8],
    ) -> NbtResult<Vec<u8>>;
}

/// Режим сжатия файла.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Zstd,
    Gzip,
    Zlib,
    Lz4,
}

impl Compression {
    pub fn is_compressed(self) -> bool {
        self != Compression::None
    }

    /// Кодек с уровнем по умолчанию; `None` для несжатого режима.
    pub fn codec(self) -> Option<Box<dyn BlockCodec>> {
        self.codec_with_level(None)
    }

    /// Кодек с заданным уровнем.
    ///
    /// Для gzip/zlib уровень приводится к диапазону `0..=9`; у LZ4 уровня
    /// нет.
    pub fn codec_with_level(
        self,
        level: Option<i32>,
    ) -> Option<Box<dyn BlockCodec>> {
        let deflate = level
            .map(|l| l.clamp(0, 9) as u32)
            .unwrap_or(DEFAULT_DEFLATE_LEVEL);
        match self {
            Compression::None => None,
            Compression::Zstd => Some(Box::new(ZstdCodec {
                level: level.unwrap_or(DEFAULT_ZSTD_LEVEL),
            })),
            Compression::Gzip => Some(Box::new(GzipCodec { level: deflate })),
            Compression::Zlib => Some(Box::new(ZlibCodec { level: deflate })),
            Compression::Lz4 => Some(Box::new(Lz4Codec)),
        }
    }
}

/// ZSTD через `zstd::stream`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZstdCodec {
    pub level: i32,
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self {
            level: DEFAULT_ZSTD_LEVEL,
        }
    }
}

impl BlockCodec for ZstdCodec {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress(
        &self,
        data: &[u8],
    ) -> NbtResult<Vec<u8>> {
        Ok(zstd::stream::encode_all(data, self.level)?)
    }

    fn decompress(
        &self,
        data: &[u8],
    ) -> NbtResult<Vec<u8>> {
        zstd::stream::decode_all(data).map_err(|e| decompression_error(self.name(), e, data))
    }
}

/// Gzip-контейнер (`flate2`). Трейлер CRC32 проверяется при распаковке.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GzipCodec {
    pub level: u32,
}

impl Default for GzipCodec {
    fn default() -> Self {
        Self {
            level: DEFAULT_DEFLATE_LEVEL,
        }
    }
}

impl BlockCodec for GzipCodec {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn compress(
        &self,
        data: &[u8],
    ) -> NbtResult<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::new(self.level));
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    fn decompress(
        &self,
        data: &[u8],
    ) -> NbtResult<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len().saturating_mul(2));
        GzDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|e| decompression_error(self.name(), e, data))?;
        Ok(out)
    }
}

/// Zlib-поток (`flate2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZlibCodec {
    pub level: u32,
}

impl Default for ZlibCodec {
    fn default() -> Self {
        Self {
            level: DEFAULT_DEFLATE_LEVEL,
        }
    }
}

impl BlockCodec for ZlibCodec {
    fn name(&self) -> &'static str {
        "zlib"
    }

    fn compress(
        &self,
        data: &[u8],
    ) -> NbtResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::new(self.level));
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    /// Распаковывает поток до `StreamEnd`.
    ///
    /// Потоковый `ZlibDecoder` на обрезанном входе просто заканчивает
    /// чтение, поэтому конец потока проверяется явно.
    fn decompress(
        &self,
        data: &[u8],
    ) -> NbtResult<Vec<u8>> {
        let mut inflater = Decompress::new(true);
        let mut out = Vec::with_capacity(data.len().saturating_mul(2).max(64));
        loop {
            if out.len() == out.capacity() {
                out.reserve(out.capacity());
            }
            let consumed = inflater.total_in() as usize;
            let status = inflater
                .decompress_vec(&data[consumed..], &mut out, FlushDecompress::Finish)
                .map_err(|e| decompression_error(self.name(), e, data))?;
            match status {
                flate2::Status::StreamEnd => return Ok(out),
                flate2::Status::Ok | flate2::Status::BufError => {
                    let input_done = inflater.total_in() as usize == data.len();
                    if input_done && out.len() < out.capacity() {
                        return Err(NbtError::Decompression {
                            codec: self.name().to_string(),
                            reason: "stream ended before the end of the zlib frame".to_string(),
                            compressed_size: Some(data.len() as u64),
                        });
                    }
                }
            }
        }
    }
}

/// LZ4 в кадровом формате (`lz4_flex::frame`).
///
/// Кадр завершается маркером конца, поэтому обрезанный поток не принимается
/// за короткий.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lz4Codec;

impl BlockCodec for Lz4Codec {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn compress(
        &self,
        data: &[u8],
    ) -> NbtResult<Vec<u8>> {
        let mut encoder = FrameEncoder::new(Vec::with_capacity(data.len() / 2 + 64));
        encoder.write_all(data)?;
        Ok(encoder.finish().map_err(std::io::Error::from)?)
    }

    fn decompress(
        &self,
        data: &[u8],
    ) -> NbtResult<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len().saturating_mul(2));
        FrameDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|e| decompression_error(self.name(), e, data))?;
        Ok(out)
    }
}

fn decompression_error(
    codec: &str,
    err: impl std::fmt::Display,
    data: &[u8],
) -> NbtError {
    NbtError::Decompression {
        codec: codec.to_string(),
        reason: err.to_string(),
        compressed_size: Some(data.len() as u64),
    }
}

/// Сжимает буфер выбранным режимом; `Compression::None` копирует байты.
pub fn compress_block(
    data: &[u8],
    compression: Compression,
) -> NbtResult<Vec<u8>> {
    match compression.codec() {
        Some(codec) => codec.compress(data),
        None => Ok(data.to_vec()),
    }
}

/// Распаковывает буфер выбранным режимом; `Compression::None` копирует
/// байты.
pub fn decompress_block(
    data: &[u8],
    compression: Compression,
) -> NbtResult<Vec<u8>> {
    match compression.codec() {
        Some(codec) => codec.decompress(data),
        None => Ok(data.to_vec()),
    }
}
