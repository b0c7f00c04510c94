//! Сериализация дерева тегов в бинарный поток NBT.
//!
//! Кодировщик проверяет представимость дерева до записи каждого тега:
//! длину строк и имён (u16), длину коллекций (i32), глубину вложенности и
//! однородность списков. Нарушения возвращаются как ошибки формата.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use nbtfile_error::{NbtError, NbtResult};
use tracing::trace;

use super::{DEFAULT_MAX_DEPTH, MAX_STRING_LEN};
use crate::tag::{Compound, Tag, TagKind, TagList, TAG_ROOT};

/// Кодировщик NBT поверх произвольного `Write`.
pub struct Encoder<W: Write> {
    writer: W,
    max_depth: usize,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self::with_max_depth(writer, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(
        writer: W,
        max_depth: usize,
    ) -> Self {
        Self { writer, max_depth }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Записывает корневой compound: `[0x0A][имя][payload][TAG_End]`.
    pub fn write_root(
        &mut self,
        name: &str,
        root: &Compound,
    ) -> NbtResult<()> {
        self.writer.write_u8(TAG_ROOT)?;
        self.write_string("root name", name)?;
        self.write_compound(root, 1)
    }

    /// Записывает именованный тег. `TAG_End` записывается одним байтом без
    /// имени.
    pub fn write_named_tag(
        &mut self,
        name: &str,
        tag: &Tag,
    ) -> NbtResult<()> {
        let kind = tag.kind();
        self.writer.write_u8(kind.id())?;
        if kind == TagKind::End {
            return Ok(());
        }
        self.write_string("tag name", name)
            .map_err(|e| e.within(name))?;
        self.write_payload_at(tag, 0).map_err(|e| e.within(name))
    }

    /// Записывает только полезную нагрузку тега, без байта типа и имени.
    pub fn write_payload(
        &mut self,
        tag: &Tag,
    ) -> NbtResult<()> {
        self.write_payload_at(tag, 0)
    }

    // `depth`: глубина контейнера, которому принадлежит `tag`.
    fn write_payload_at(
        &mut self,
        tag: &Tag,
        depth: usize,
    ) -> NbtResult<()> {
        match tag {
            Tag::End => {}
            Tag::Byte(v) => self.writer.write_i8(*v)?,
            Tag::Short(v) => self.writer.write_i16::<BigEndian>(*v)?,
            Tag::Int(v) => self.writer.write_i32::<BigEndian>(*v)?,
            Tag::Long(v) => self.writer.write_i64::<BigEndian>(*v)?,
            Tag::Float(v) => self.writer.write_f32::<BigEndian>(*v)?,
            Tag::Double(v) => self.writer.write_f64::<BigEndian>(*v)?,
            Tag::ByteArray(bytes) => {
                self.write_len(TagKind::ByteArray, bytes.len())?;
                self.writer.write_all(bytes)?;
            }
            Tag::String(s) => self.write_string("TAG_String", s)?,
            Tag::List(list) => self.write_list(list, depth + 1)?,
            Tag::Compound(compound) => self.write_compound(compound, depth + 1)?,
            Tag::IntArray(values) => {
                self.write_len(TagKind::IntArray, values.len())?;
                for v in values {
                    self.writer.write_i32::<BigEndian>(*v)?;
                }
            }
            Tag::LongArray(values) => {
                self.write_len(TagKind::LongArray, values.len())?;
                for v in values {
                    self.writer.write_i64::<BigEndian>(*v)?;
                }
            }
        }
        Ok(())
    }

    fn write_list(
        &mut self,
        list: &TagList,
        depth: usize,
    ) -> NbtResult<()> {
        self.check_depth(depth)?;
        let kind = list.element_kind();
        if kind == TagKind::End && !list.is_empty() {
            return Err(NbtError::InvalidList {
                reason: format!("TAG_End list with {} entries", list.len()),
                offset: None,
                path: None,
            });
        }
        // элементы меняются через get_mut/query_mut в обход TagList::set,
        // поэтому однородность проверяется до первого записанного байта
        if let Some((i, item)) = list
            .iter()
            .enumerate()
            .find(|(_, item)| item.kind() != kind)
        {
            return Err(NbtError::InvalidList {
                reason: format!("element is {} in a list of {}", item.kind(), kind),
                offset: None,
                path: Some(format!("[{i}]")),
            });
        }
        self.writer.write_u8(kind.id())?;
        self.write_len(TagKind::List, list.len())?;
        for (i, item) in list.iter().enumerate() {
            self.write_payload_at(item, depth)
                .map_err(|e| e.within(&format!("[{i}]")))?;
        }
        Ok(())
    }

    fn write_compound(
        &mut self,
        compound: &Compound,
        depth: usize,
    ) -> NbtResult<()> {
        self.check_depth(depth)?;
        for (name, tag) in compound.iter() {
            let kind = tag.kind();
            // байт 0 внутри compound-а читается как его конец
            if kind == TagKind::End {
                return Err(NbtError::InvalidTag {
                    tag: kind.id(),
                    offset: None,
                    path: Some(name.to_string()),
                });
            }
            self.writer.write_u8(kind.id())?;
            self.write_string("tag name", name)
                .map_err(|e| e.within(name))?;
            self.write_payload_at(tag, depth)
                .map_err(|e| e.within(name))?;
        }
        self.writer.write_u8(TagKind::End.id())?;
        Ok(())
    }

    fn write_string(
        &mut self,
        what: &str,
        s: &str,
    ) -> NbtResult<()> {
        if s.len() > MAX_STRING_LEN {
            return Err(NbtError::SizeLimit {
                what: what.to_string(),
                size: s.len() as u64,
                limit: MAX_STRING_LEN as u64,
                offset: None,
                path: None,
            });
        }
        self.writer.write_u16::<BigEndian>(s.len() as u16)?;
        self.writer.write_all(s.as_bytes())?;
        Ok(())
    }

    fn write_len(
        &mut self,
        kind: TagKind,
        len: usize,
    ) -> NbtResult<()> {
        let len = i32::try_from(len).map_err(|_| NbtError::SizeLimit {
            what: kind.name().to_string(),
            size: len as u64,
            limit: i32::MAX as u64,
            offset: None,
            path: None,
        })?;
        self.writer.write_i32::<BigEndian>(len)?;
        Ok(())
    }

    fn check_depth(
        &self,
        depth: usize,
    ) -> NbtResult<()> {
        if depth > self.max_depth {
            return Err(NbtError::DepthLimit {
                limit: self.max_depth,
                offset: None,
                path: None,
            });
        }
        Ok(())
    }
}

/// Записывает корневой compound в `w`.
pub fn write_root<W: Write>(
    w: &mut W,
    name: &str,
    root: &Compound,
) -> NbtResult<()> {
    Encoder::new(w).write_root(name, root)
}

/// Записывает именованный тег в `w`.
pub fn write_named_tag<W: Write>(
    w: &mut W,
    name: &str,
    tag: &Tag,
) -> NbtResult<()> {
    Encoder::new(w).write_named_tag(name, tag)
}

/// Записывает полезную нагрузку тега в `w`.
pub fn write_payload<W: Write>(
    w: &mut W,
    tag: &Tag,
) -> NbtResult<()> {
    Encoder::new(w).write_payload(tag)
}

/// Кодирует корневой compound в новый буфер.
pub fn encode_root(
    name: &str,
    root: &Compound,
) -> NbtResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_root(&mut buf, name, root)?;
    trace!(bytes = buf.len(), entries = root.len(), "encoded root compound");
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет точную раскладку байтов для `{value: Int 42}`.
    #[test]
    fn test_encode_single_int_layout() {
        let mut root = Compound::new();
        root.insert("value", 42i32);

        let bytes = encode_root("", &root).unwrap();
        let mut expected = vec![0x0A, 0x00, 0x00, 0x03, 0x00, 0x05];
        expected.extend_from_slice(b"value");
        expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x2A, 0x00]);
        assert_eq!(bytes, expected);
    }

    /// Тест проверяет раскладку списка: тип элементов, i32-счётчик и
    /// безымянные элементы.
    #[test]
    fn test_encode_list_payload() {
        let list = TagList::from_values([1i16, 2]);
        let mut buf = Vec::new();
        write_payload(&mut buf, &Tag::List(list)).unwrap();
        assert_eq!(buf, vec![0x02, 0, 0, 0, 2, 0, 1, 0, 2]);
    }

    /// Тест проверяет, что пустой список без типа пишется как `TAG_End`
    /// с нулевой длиной.
    #[test]
    fn test_encode_empty_list_defaults_to_end() {
        let mut buf = Vec::new();
        write_payload(&mut buf, &Tag::List(TagList::new())).unwrap();
        assert_eq!(buf, vec![0x00, 0, 0, 0, 0]);
    }

    #[test]
    fn test_named_tag_and_end() {
        let mut buf = Vec::new();
        write_named_tag(&mut buf, "s", &Tag::from("hi")).unwrap();
        assert_eq!(buf, vec![0x08, 0, 1, b's', 0, 2, b'h', b'i']);

        let mut buf = Vec::new();
        write_named_tag(&mut buf, "ignored", &Tag::End).unwrap();
        assert_eq!(buf, vec![0x00]);
    }

    /// Тест проверяет, что слишком длинная строка даёт SizeLimit с путём.
    #[test]
    fn test_string_too_long() {
        let mut inner = Compound::new();
        inner.insert("text", "x".repeat(MAX_STRING_LEN + 1));
        let mut root = Compound::new();
        root.insert("meta", inner);

        let err = encode_root("", &root).unwrap_err();
        assert!(err.is_format());
        assert!(matches!(err, NbtError::SizeLimit { .. }));
        assert_eq!(err.path(), Some("meta.text"));
    }

    /// Тест проверяет, что `TAG_End` не может быть членом compound-а.
    #[test]
    fn test_end_member_rejected() {
        let mut root = Compound::new();
        root.insert("bad", Tag::End);
        let err = encode_root("", &root).unwrap_err();
        assert!(matches!(err, NbtError::InvalidTag { tag: 0, .. }));
    }

    /// Тест проверяет, что непустой список `TAG_End` не кодируется.
    #[test]
    fn test_end_list_with_entries_rejected() {
        let mut list = TagList::new();
        list.push(Tag::End).unwrap();
        let mut root = Compound::new();
        root.insert("l", list);

        let err = encode_root("", &root).unwrap_err();
        assert!(matches!(err, NbtError::InvalidList { .. }));
        assert_eq!(err.path(), Some("l"));
    }

    /// Тест проверяет, что список, ставший разнородным через `get_mut`, не
    /// кодируется: ошибка формата указывает на элемент, а в буфер не
    /// попадает ни одного байта списка.
    #[test]
    fn test_heterogeneous_list_rejected() {
        let mut list = TagList::from_values([1i32, 2]);
        *list.get_mut(1).unwrap() = Tag::Long(5);
        let mut root = Compound::new();
        root.insert("l", list.clone());

        let err = encode_root("", &root).unwrap_err();
        assert!(err.is_format());
        assert!(matches!(err, NbtError::InvalidList { .. }));
        assert_eq!(err.path(), Some("l[1]"));

        let mut buf = Vec::new();
        let err = write_payload(&mut buf, &Tag::List(list)).unwrap_err();
        assert_eq!(err.path(), Some("[1]"));
        assert!(buf.is_empty());
    }

    /// Тест проверяет лимит глубины и путь до места нарушения.
    #[test]
    fn test_depth_limit() {
        let mut c3 = Compound::new();
        c3.insert("leaf", 1i8);
        let mut c2 = Compound::new();
        c2.insert("c3", c3);
        let mut root = Compound::new();
        root.insert("c2", c2);

        let mut buf = Vec::new();
        let err = Encoder::with_max_depth(&mut buf, 2)
            .write_root("", &root)
            .unwrap_err();
        assert!(matches!(err, NbtError::DepthLimit { limit: 2, .. }));
        assert_eq!(err.path(), Some("c2.c3"));

        let mut buf = Vec::new();
        Encoder::with_max_depth(&mut buf, 3)
            .write_root("", &root)
            .unwrap();
    }

    /// Тест проверяет путь ошибки внутри элемента списка.
    #[test]
    fn test_error_path_through_list() {
        let mut item = Compound::new();
        item.insert("name", "y".repeat(MAX_STRING_LEN + 1));
        let mut items = TagList::new();
        items.push(Tag::Compound(Compound::new())).unwrap();
        items.push(Tag::Compound(item)).unwrap();
        let mut root = Compound::new();
        root.insert("items", items);

        let err = encode_root("", &root).unwrap_err();
        assert_eq!(err.path(), Some("items[1].name"));
    }
}
