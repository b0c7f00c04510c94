use nbtfile_error::{NbtError, NbtResult};

use super::{Tag, TagKind};

/// Однородный упорядоченный список безымянных тегов.
///
/// Тип элементов объявлен явно и совпадает с типом каждого элемента, даже
/// если список пуст (по умолчанию `TAG_End`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagList {
    element_kind: TagKind,
    items: Vec<Tag>,
}

impl TagList {
    /// Пустой список с типом `TAG_End`; принимает тип первого добавленного
    /// элемента.
    pub fn new() -> Self {
        Self::default()
    }

    /// Пустой список с заданным типом элементов.
    pub fn of_kind(element_kind: TagKind) -> Self {
        Self {
            element_kind,
            items: Vec::new(),
        }
    }

    /// Список из готовых элементов; все они должны быть типа `element_kind`.
    pub fn from_tags(
        element_kind: TagKind,
        items: Vec<Tag>,
    ) -> NbtResult<Self> {
        if let Some(bad) = items.iter().find(|t| t.kind() != element_kind) {
            return Err(NbtError::type_mismatch(
                element_kind.name(),
                bad.kind().name(),
            ));
        }
        Ok(Self {
            element_kind,
            items,
        })
    }

    /// Собирает список из значений одного Rust-типа.
    pub fn from_values<T, I>(values: I) -> Self
    where
        T: Into<Tag> + super::TagPayload,
        I: IntoIterator<Item = T>,
    {
        Self {
            element_kind: T::KIND,
            items: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn element_kind(&self) -> TagKind {
        self.element_kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(
        &self,
        index: usize,
    ) -> Option<&Tag> {
        self.items.get(index)
    }

    pub fn get_mut(
        &mut self,
        index: usize,
    ) -> Option<&mut Tag> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tag> {
        self.items.iter_mut()
    }

    /// Добавляет элемент в конец списка.
    pub fn push(
        &mut self,
        tag: impl Into<Tag>,
    ) -> NbtResult<()> {
        let tag = tag.into();
        self.accept(&tag)?;
        self.items.push(tag);
        Ok(())
    }

    /// Вставляет элемент в позицию `index` (паникует, если `index > len`,
    /// как `Vec::insert`).
    pub fn insert(
        &mut self,
        index: usize,
        tag: impl Into<Tag>,
    ) -> NbtResult<()> {
        let tag = tag.into();
        self.accept(&tag)?;
        self.items.insert(index, tag);
        Ok(())
    }

    /// Заменяет элемент и возвращает старый.
    pub fn set(
        &mut self,
        index: usize,
        tag: impl Into<Tag>,
    ) -> NbtResult<Tag> {
        let tag = tag.into();
        if tag.kind() != self.element_kind {
            return Err(NbtError::type_mismatch(
                self.element_kind.name(),
                tag.kind().name(),
            ));
        }
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or_else(|| NbtError::IndexOutOfRange {
                index,
                len,
                path: format!("[{index}]"),
            })?;
        Ok(std::mem::replace(slot, tag))
    }

    pub fn remove(
        &mut self,
        index: usize,
    ) -> Option<Tag> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Удаляет все элементы; объявленный тип сохраняется.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Проверяет тип нового элемента; пустой список `TAG_End` принимает тип
    /// первого элемента.
    fn accept(
        &mut self,
        tag: &Tag,
    ) -> NbtResult<()> {
        let kind = tag.kind();
        if kind == self.element_kind {
            return Ok(());
        }
        if self.element_kind == TagKind::End && self.items.is_empty() && kind != TagKind::End {
            self.element_kind = kind;
            return Ok(());
        }
        Err(NbtError::type_mismatch(
            self.element_kind.name(),
            kind.name(),
        ))
    }

    pub(crate) fn from_parts_unchecked(
        element_kind: TagKind,
        items: Vec<Tag>,
    ) -> Self {
        debug_assert!(items.iter().all(|t| t.kind() == element_kind));
        Self {
            element_kind,
            items,
        }
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for TagList {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
