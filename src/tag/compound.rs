use std::fmt;

use ahash::AHashMap;
use nbtfile_error::{NbtError, NbtResult};

use super::{Tag, TagPayload};

/// Упорядоченное отображение имя → тег.
///
/// Ключи уникальны. Порядок вставки сохраняется для детерминированной
/// записи, но на поиск не влияет. Замена существующего ключа оставляет его
/// на прежнем месте.
#[derive(Clone, Default)]
pub struct Compound {
    entries: Vec<(String, Tag)>,
    // имя -> позиция в `entries`
    index: AHashMap<String, usize>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(
        &self,
        name: &str,
    ) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Tag> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut Tag> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Типизированный доступ к члену compound-а.
    ///
    /// `NotFound`, если ключа нет; `TypeMismatch`, если тег другого типа.
    pub fn get_as<T: TagPayload>(
        &self,
        name: &str,
    ) -> NbtResult<&T> {
        let tag = self.get(name).ok_or_else(|| NbtError::MissingTag {
            name: name.to_string(),
            path: name.to_string(),
        })?;
        tag.try_get::<T>().map_err(|e| e.with_path(name))
    }

    /// Вставляет тег; возвращает предыдущее значение, если ключ уже был.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        tag: impl Into<Tag>,
    ) -> Option<Tag> {
        let name = name.into();
        let tag = tag.into();
        match self.index.get(&name) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, tag)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, tag));
                None
            }
        }
    }

    /// Удаляет ключ, сохраняя порядок остальных записей.
    pub fn remove(
        &mut self,
        name: &str,
    ) -> Option<Tag> {
        let pos = self.index.remove(name)?;
        let (_, tag) = self.entries.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(tag)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Итератор по записям в порядке вставки.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Tag)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Tag> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Глубина вложенности compound-а (сам compound считается уровнем).
    pub fn depth(&self) -> usize {
        1 + self.values().map(Tag::depth).max().unwrap_or(0)
    }
}

impl PartialEq for Compound {
    /// Сравнение записей по порядку; индекс производный и не сравнивается.
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Compound {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Tag>> FromIterator<(K, V)> for Compound {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut compound = Compound::new();
        compound.extend(iter);
        compound
    }
}

impl<K: Into<String>, V: Into<Tag>> Extend<(K, V)> for Compound {
    fn extend<I: IntoIterator<Item = (K, V)>>(
        &mut self,
        iter: I,
    ) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Compound {
    type Item = (String, Tag);
    type IntoIter = std::vec::IntoIter<(String, Tag)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
