//! Разбор бинарного потока NBT в дерево тегов.
//!
//! Разбор полностью материализует дерево. Объявленные длины проверяются
//! против [`DecodeOptions`] до выделения памяти, а чтение массивов идёт
//! через `Read::take`, поэтому обрезанный поток не приводит к выделению
//! буфера на всю объявленную длину.
//!
//! Каждая ошибка формата несёт смещение начала проблемного элемента и путь
//! до тега (`inventory.items[2].name`).

use std::io::{self, Read};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use nbtfile_error::{NbtError, NbtResult};
use tracing::trace;

use super::{DEFAULT_MAX_ARRAY_LEN, DEFAULT_MAX_DEPTH};
use crate::tag::{Compound, Tag, TagKind, TagList, TAG_ROOT};

/// Ограничения разбора.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Максимальная глубина вложенности контейнеров (корень = 1).
    pub max_depth: usize,
    /// Максимальное число элементов в массиве или списке.
    pub max_array_len: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_len: DEFAULT_MAX_ARRAY_LEN,
        }
    }
}

/// Reader, считающий прочитанные байты.
pub struct OffsetReader<R: Read> {
    inner: R,
    bytes_read: u64,
}

impl<R: Read> OffsetReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_read: 0,
        }
    }

    /// Текущее смещение от начала потока.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for OffsetReader<R> {
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes_read += n as u64;
        Ok(n)
    }
}

/// Декодер NBT поверх произвольного `Read`.
pub struct Decoder<R: Read> {
    reader: OffsetReader<R>,
    options: DecodeOptions,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecodeOptions::default())
    }

    pub fn with_options(
        reader: R,
        options: DecodeOptions,
    ) -> Self {
        Self {
            reader: OffsetReader::new(reader),
            options,
        }
    }

    /// Смещение следующего непрочитанного байта.
    pub fn offset(&self) -> u64 {
        self.reader.bytes_read()
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Читает корневой compound и его имя.
    ///
    /// Поток обязан начинаться с байта `TAG_Compound`; иначе
    /// [`NbtError::InvalidRoot`]. Байты после завершающего `TAG_End` корня
    /// не читаются.
    pub fn read_root(&mut self) -> NbtResult<(String, Compound)> {
        let found = self.read_u8("root tag type")?;
        if found != TAG_ROOT {
            return Err(NbtError::InvalidRoot { found });
        }
        let name = self.read_string("root name")?;
        let root = self.read_compound(1)?;
        trace!(
            name = %name,
            entries = root.len(),
            bytes = self.offset(),
            "decoded root compound"
        );
        Ok((name, root))
    }

    /// Читает один именованный тег.
    ///
    /// Возвращает `None`, если прочитан `TAG_End` (у него нет имени).
    pub fn read_named_tag(&mut self) -> NbtResult<Option<(String, Tag)>> {
        let kind = self.read_kind()?;
        if kind == TagKind::End {
            return Ok(None);
        }
        let name = self.read_string("tag name")?;
        let tag = self
            .read_payload(kind, 0)
            .map_err(|e| e.within(&name))?;
        Ok(Some((name, tag)))
    }

    /// Читает полезную нагрузку тега известного типа.
    pub fn read_payload_of(
        &mut self,
        kind: TagKind,
    ) -> NbtResult<Tag> {
        self.read_payload(kind, 0)
    }

    // `depth`: глубина контейнера, которому принадлежит читаемый тег.
    fn read_payload(
        &mut self,
        kind: TagKind,
        depth: usize,
    ) -> NbtResult<Tag> {
        let start = self.offset();
        let tag = match kind {
            TagKind::End => Tag::End,
            TagKind::Byte => Tag::Byte(
                self.reader
                    .read_i8()
                    .map_err(|e| eof(e, "TAG_Byte", start, 1))?,
            ),
            TagKind::Short => Tag::Short(
                self.reader
                    .read_i16::<BigEndian>()
                    .map_err(|e| eof(e, "TAG_Short", start, 2))?,
            ),
            TagKind::Int => Tag::Int(
                self.reader
                    .read_i32::<BigEndian>()
                    .map_err(|e| eof(e, "TAG_Int", start, 4))?,
            ),
            TagKind::Long => Tag::Long(
                self.reader
                    .read_i64::<BigEndian>()
                    .map_err(|e| eof(e, "TAG_Long", start, 8))?,
            ),
            TagKind::Float => Tag::Float(
                self.reader
                    .read_f32::<BigEndian>()
                    .map_err(|e| eof(e, "TAG_Float", start, 4))?,
            ),
            TagKind::Double => Tag::Double(
                self.reader
                    .read_f64::<BigEndian>()
                    .map_err(|e| eof(e, "TAG_Double", start, 8))?,
            ),
            TagKind::ByteArray => {
                let count = self.read_count(TagKind::ByteArray)?;
                Tag::ByteArray(self.read_exact_vec(TagKind::ByteArray.name(), count)?)
            }
            TagKind::String => Tag::String(self.read_string("TAG_String")?),
            TagKind::List => Tag::List(self.read_list(depth + 1)?),
            TagKind::Compound => Tag::Compound(self.read_compound(depth + 1)?),
            TagKind::IntArray => {
                let count = self.read_count(TagKind::IntArray)?;
                let raw = self.read_exact_vec(TagKind::IntArray.name(), count * 4)?;
                let mut values = vec![0i32; count];
                BigEndian::read_i32_into(&raw, &mut values);
                Tag::IntArray(values)
            }
            TagKind::LongArray => {
                let count = self.read_count(TagKind::LongArray)?;
                let raw = self.read_exact_vec(TagKind::LongArray.name(), count * 8)?;
                let mut values = vec![0i64; count];
                BigEndian::read_i64_into(&raw, &mut values);
                Tag::LongArray(values)
            }
        };
        Ok(tag)
    }

    fn read_list(
        &mut self,
        depth: usize,
    ) -> NbtResult<TagList> {
        let start = self.offset();
        self.check_depth(depth, start)?;
        let element_kind = self.read_kind()?;
        let count = self.read_count(TagKind::List)?;
        if element_kind == TagKind::End && count > 0 {
            return Err(NbtError::InvalidList {
                reason: format!("TAG_End list declares {count} entries"),
                offset: Some(start),
                path: None,
            });
        }

        // Ёмкость ограничена: счётчик ещё не подтверждён данными.
        let mut items = Vec::with_capacity(count.min(1024));
        for i in 0..count {
            let item = self
                .read_payload(element_kind, depth)
                .map_err(|e| e.within(&format!("[{i}]")))?;
            items.push(item);
        }
        Ok(TagList::from_parts_unchecked(element_kind, items))
    }

    fn read_compound(
        &mut self,
        depth: usize,
    ) -> NbtResult<Compound> {
        self.check_depth(depth, self.offset())?;
        let mut compound = Compound::new();
        loop {
            let kind = self.read_kind()?;
            if kind == TagKind::End {
                break;
            }
            let name = self.read_string("tag name")?;
            let tag = self
                .read_payload(kind, depth)
                .map_err(|e| e.within(&name))?;
            // повторное имя заменяет предыдущее значение
            compound.insert(name, tag);
        }
        Ok(compound)
    }

    fn read_kind(&mut self) -> NbtResult<TagKind> {
        let start = self.offset();
        let id = self.read_u8("tag type")?;
        TagKind::try_from(id).map_err(|_| NbtError::InvalidTag {
            tag: id,
            offset: Some(start),
            path: None,
        })
    }

    /// i32-счётчик элементов: отрицательный запрещён, больший лимита тоже.
    fn read_count(
        &mut self,
        kind: TagKind,
    ) -> NbtResult<usize> {
        let start = self.offset();
        let what = kind.name();
        let count = self
            .reader
            .read_i32::<BigEndian>()
            .map_err(|e| eof(e, &format!("{what} length"), start, 4))?;
        if count < 0 {
            return Err(NbtError::NegativeLength {
                what: what.to_string(),
                length: count,
                offset: Some(start),
                path: None,
            });
        }
        let count = count as usize;
        if count > self.options.max_array_len {
            return Err(NbtError::SizeLimit {
                what: what.to_string(),
                size: count as u64,
                limit: self.options.max_array_len as u64,
                offset: Some(start),
                path: None,
            });
        }
        Ok(count)
    }

    fn read_string(
        &mut self,
        what: &str,
    ) -> NbtResult<String> {
        let start = self.offset();
        let len = self
            .reader
            .read_u16::<BigEndian>()
            .map_err(|e| eof(e, &format!("{what} length"), start, 2))?;
        let bytes = self.read_exact_vec(what, len as usize)?;
        String::from_utf8(bytes).map_err(|_| NbtError::InvalidUtf8 {
            what: what.to_string(),
            offset: Some(start),
            path: None,
        })
    }

    /// Читает ровно `len` байт, не выделяя память под непришедшие данные.
    fn read_exact_vec(
        &mut self,
        what: &str,
        len: usize,
    ) -> NbtResult<Vec<u8>> {
        let start = self.offset();
        let mut buf = Vec::new();
        (&mut self.reader)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| eof(e, what, start, len as u64))?;
        if buf.len() < len {
            return Err(NbtError::UnexpectedEof {
                context: what.to_string(),
                offset: Some(start),
                path: None,
                expected_bytes: Some(len as u64),
            });
        }
        Ok(buf)
    }

    fn read_u8(
        &mut self,
        what: &str,
    ) -> NbtResult<u8> {
        let start = self.offset();
        self.reader
            .read_u8()
            .map_err(|e| eof(e, what, start, 1))
    }

    fn check_depth(
        &self,
        depth: usize,
        offset: u64,
    ) -> NbtResult<()> {
        if depth > self.options.max_depth {
            return Err(NbtError::DepthLimit {
                limit: self.options.max_depth,
                offset: Some(offset),
                path: None,
            });
        }
        Ok(())
    }
}

/// Переводит ошибку чтения в `NbtError` со смещением начала элемента.
fn eof(
    e: io::Error,
    context: &str,
    offset: u64,
    expected_bytes: u64,
) -> NbtError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => NbtError::UnexpectedEof {
            context: context.to_string(),
            offset: Some(offset),
            path: None,
            expected_bytes: Some(expected_bytes),
        },
        _ => NbtError::from(e),
    }
}

/// Читает корневой compound из `r` с ограничениями по умолчанию.
pub fn read_root<R: Read>(r: R) -> NbtResult<(String, Compound)> {
    Decoder::new(r).read_root()
}

/// Читает корневой compound из `r` с заданными ограничениями.
pub fn read_root_with<R: Read>(
    r: R,
    options: DecodeOptions,
) -> NbtResult<(String, Compound)> {
    Decoder::with_options(r, options).read_root()
}

/// Декодирует корневой compound из буфера в памяти.
pub fn decode_root(bytes: &[u8]) -> NbtResult<(String, Compound)> {
    read_root(bytes)
}
