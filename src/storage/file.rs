use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use nbtfile_error::{NbtError, NbtResult};
use tracing::{debug, info};

use super::write_atomic;
use crate::{
    codec::{read_root_with, Compression, DecodeOptions, Encoder},
    query::{self, TagPath},
    tag::{Compound, Tag, TagPayload},
};

/// NBT-документ: именованный корневой compound и параметры хранения.
///
/// Документ помнит путь и режим сжатия, с которыми был загружен или
/// сохранён, поэтому `reload` и `save_in_place` не требуют аргументов.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtFile {
    root_name: String,
    root: Compound,
    path: Option<PathBuf>,
    compression: Compression,
    compression_level: Option<i32>,
    options: DecodeOptions,
}

impl Default for NbtFile {
    fn default() -> Self {
        Self::new("", Compound::new())
    }
}

impl NbtFile {
    /// Новый документ в памяти, без пути и без сжатия.
    pub fn new(
        root_name: impl Into<String>,
        root: Compound,
    ) -> Self {
        Self {
            root_name: root_name.into(),
            root,
            path: None,
            compression: Compression::None,
            compression_level: None,
            options: DecodeOptions::default(),
        }
    }

    /// Загружает документ с ограничениями разбора по умолчанию.
    pub fn load(
        path: impl AsRef<Path>,
        compression: Compression,
    ) -> NbtResult<Self> {
        Self::load_with(path, compression, DecodeOptions::default())
    }

    /// Загружает документ.
    ///
    /// Ошибки: `NotFound`, если файла нет; `Decompression`, если сжатый
    /// блок повреждён; `Format`, если поток некорректен.
    pub fn load_with(
        path: impl AsRef<Path>,
        compression: Compression,
        options: DecodeOptions,
    ) -> NbtResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => NbtError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => NbtError::io_at(e, path.display().to_string()),
        })?;

        let mut file = Self::from_bytes_with(&bytes, compression, options)?;
        file.path = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            bytes = bytes.len(),
            compression = %compression,
            entries = file.root.len(),
            "loaded NBT file"
        );
        Ok(file)
    }

    /// Читает документ из потока целиком.
    pub fn read_from<R: Read>(
        mut reader: R,
        compression: Compression,
    ) -> NbtResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes, compression)
    }

    pub fn from_bytes(
        bytes: &[u8],
        compression: Compression,
    ) -> NbtResult<Self> {
        Self::from_bytes_with(bytes, compression, DecodeOptions::default())
    }

    /// Распаковывает (если задано сжатие) и декодирует буфер.
    pub fn from_bytes_with(
        bytes: &[u8],
        compression: Compression,
        options: DecodeOptions,
    ) -> NbtResult<Self> {
        let (root_name, root) = match compression.codec() {
            Some(codec) => {
                let raw = codec.decompress(bytes)?;
                debug!(
                    codec = codec.name(),
                    compressed = bytes.len(),
                    raw = raw.len(),
                    "decompressed NBT payload"
                );
                read_root_with(raw.as_slice(), options)?
            }
            None => read_root_with(bytes, options)?,
        };
        Ok(Self {
            root_name,
            root,
            path: None,
            compression,
            compression_level: None,
            options,
        })
    }

    /// Кодирует документ и сжимает его текущим режимом.
    pub fn to_bytes(&self) -> NbtResult<Vec<u8>> {
        self.encode_with(self.compression)
    }

    fn encode_with(
        &self,
        compression: Compression,
    ) -> NbtResult<Vec<u8>> {
        let mut raw = Vec::new();
        Encoder::with_max_depth(&mut raw, self.options.max_depth)
            .write_root(&self.root_name, &self.root)?;
        match compression.codec_with_level(self.compression_level) {
            Some(codec) => codec.compress(&raw),
            None => Ok(raw),
        }
    }

    /// Пишет закодированный документ в поток (без атомарности).
    pub fn write_to<W: Write>(
        &self,
        mut writer: W,
    ) -> NbtResult<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Атомарно сохраняет документ текущим режимом сжатия.
    pub fn save(
        &mut self,
        path: impl AsRef<Path>,
    ) -> NbtResult<()> {
        self.save_with(path, self.compression)
    }

    /// Атомарно сохраняет документ заданным режимом и запоминает путь и
    /// режим. При ошибке документ сохраняет прежние путь и режим.
    pub fn save_with(
        &mut self,
        path: impl AsRef<Path>,
        compression: Compression,
    ) -> NbtResult<()> {
        let path = path.as_ref();
        let bytes = self.encode_with(compression)?;
        write_atomic(path, &bytes)?;
        self.compression = compression;
        self.path = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            bytes = bytes.len(),
            compression = %compression,
            "saved NBT file"
        );
        Ok(())
    }

    /// Сохраняет документ туда, откуда он был загружен.
    pub fn save_in_place(&mut self) -> NbtResult<()> {
        let path = self.require_path()?;
        self.save_with(path, self.compression)
    }

    /// Перечитывает документ с диска, отбрасывая изменения в памяти.
    pub fn reload(&mut self) -> NbtResult<()> {
        let path = self.require_path()?;
        let fresh = Self::load_with(&path, self.compression, self.options)?;
        self.root_name = fresh.root_name;
        self.root = fresh.root;
        Ok(())
    }

    pub fn root(&self) -> &Compound {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Compound {
        &mut self.root
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn set_root_name(
        &mut self,
        name: impl Into<String>,
    ) {
        self.root_name = name.into();
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn set_compression(
        &mut self,
        compression: Compression,
    ) {
        self.compression = compression;
    }

    /// Уровень сжатия; `None` означает уровень кодека по умолчанию.
    pub fn set_compression_level(
        &mut self,
        level: Option<i32>,
    ) {
        self.compression_level = level;
    }

    pub fn decode_options(&self) -> DecodeOptions {
        self.options
    }

    pub fn set_decode_options(
        &mut self,
        options: DecodeOptions,
    ) {
        self.options = options;
    }

    /// Забирает имя и корень документа.
    pub fn into_root(self) -> (String, Compound) {
        (self.root_name, self.root)
    }

    /// Находит тег по строке пути (`inventory.items[2].name`).
    pub fn query(
        &self,
        path: &str,
    ) -> NbtResult<&Tag> {
        query::resolve(&self.root, &TagPath::parse(path)?)
    }

    pub fn query_mut(
        &mut self,
        path: &str,
    ) -> NbtResult<&mut Tag> {
        query::resolve_mut(&mut self.root, &TagPath::parse(path)?)
    }

    /// Находит тег и сужает его до `T`.
    pub fn query_as<T: TagPayload>(
        &self,
        path: &str,
    ) -> NbtResult<&T> {
        query::resolve_as(&self.root, &TagPath::parse(path)?)
    }

    fn require_path(&self) -> NbtResult<PathBuf> {
        self.path.clone().ok_or_else(|| NbtError::Io {
            kind: io::ErrorKind::InvalidInput,
            message: "document has no associated file path".to_string(),
            path: None,
        })
    }
}
