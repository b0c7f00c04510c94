//! Значение тега: закрытый вариантный тип над всеми типами NBT.

use std::fmt;

use nbtfile_error::{NbtError, NbtResult};

use super::{
    tree::{self, PlainStyle},
    Compound, TagKind, TagList, TagPayload,
};

/// Тег NBT: примитив, массив, список или compound.
///
/// Имя тега хранится не в самом значении, а в родительском [`Compound`]
/// (элементы списков безымянны).
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(String),
    List(TagList),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    /// Тип тега.
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::End => TagKind::End,
            Tag::Byte(_) => TagKind::Byte,
            Tag::Short(_) => TagKind::Short,
            Tag::Int(_) => TagKind::Int,
            Tag::Long(_) => TagKind::Long,
            Tag::Float(_) => TagKind::Float,
            Tag::Double(_) => TagKind::Double,
            Tag::ByteArray(_) => TagKind::ByteArray,
            Tag::String(_) => TagKind::String,
            Tag::List(_) => TagKind::List,
            Tag::Compound(_) => TagKind::Compound,
            Tag::IntArray(_) => TagKind::IntArray,
            Tag::LongArray(_) => TagKind::LongArray,
        }
    }

    /// Сужает тег до полезной нагрузки типа `T`, без приведения типов.
    pub fn get<T: TagPayload>(&self) -> Option<&T> {
        T::from_tag(self)
    }

    pub fn get_mut<T: TagPayload>(&mut self) -> Option<&mut T> {
        T::from_tag_mut(self)
    }

    /// Как [`Tag::get`], но возвращает `TypeMismatch` вместо `None`.
    pub fn try_get<T: TagPayload>(&self) -> NbtResult<&T> {
        T::from_tag(self).ok_or_else(|| NbtError::type_mismatch(T::KIND.name(), self.kind().name()))
    }

    pub fn try_get_mut<T: TagPayload>(&mut self) -> NbtResult<&mut T> {
        let found = self.kind();
        T::from_tag_mut(self).ok_or_else(|| NbtError::type_mismatch(T::KIND.name(), found.name()))
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&TagList> {
        match self {
            Tag::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut TagList> {
        match self {
            Tag::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    /// Глубина вложенности: 0 для примитивов и массивов.
    pub fn depth(&self) -> usize {
        match self {
            Tag::List(list) => 1 + list.iter().map(Tag::depth).max().unwrap_or(0),
            Tag::Compound(c) => c.depth(),
            _ => 0,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut out = String::new();
        tree::write_tag(&mut out, None, self, 0, &PlainStyle)?;
        f.write_str(out.trim_end())
    }
}

macro_rules! impl_from_for_tag {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Tag {
                fn from(v: $ty) -> Self {
                    Tag::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_tag! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Vec<u8> => ByteArray,
    String => String,
    TagList => List,
    Compound => Compound,
    Vec<i32> => IntArray,
    Vec<i64> => LongArray,
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Tag::String(s.to_string())
    }
}

impl From<bool> for Tag {
    /// Логическое значение хранится как `TAG_Byte` 0/1.
    fn from(b: bool) -> Self {
        Tag::Byte(b as i8)
    }
}
