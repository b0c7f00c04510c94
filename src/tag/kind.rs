//! Определение типов тегов бинарного формата NBT.
//!
//! Каждый тип помечается однобайтовым значением, которое пишется перед
//! именованным тегом и в заголовке списка. Используется в модулях `encode` и
//! `decode`.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::EnumIter;

/// Байт типа корневого тега файла.
pub const TAG_ROOT: u8 = TagKind::Compound as u8;

/// Тип тега (дискриминант [`Tag`](super::Tag)).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, EnumIter)]
pub enum TagKind {
    /// Терминатор compound-а; тип элементов пустого списка.
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagKind {
    /// Байт типа в потоке.
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Каноническое имя типа (`TAG_Int`, `TAG_Compound`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            TagKind::End => "TAG_End",
            TagKind::Byte => "TAG_Byte",
            TagKind::Short => "TAG_Short",
            TagKind::Int => "TAG_Int",
            TagKind::Long => "TAG_Long",
            TagKind::Float => "TAG_Float",
            TagKind::Double => "TAG_Double",
            TagKind::ByteArray => "TAG_Byte_Array",
            TagKind::String => "TAG_String",
            TagKind::List => "TAG_List",
            TagKind::Compound => "TAG_Compound",
            TagKind::IntArray => "TAG_Int_Array",
            TagKind::LongArray => "TAG_Long_Array",
        }
    }

    /// Размер полезной нагрузки фиксированной ширины, если он есть.
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            TagKind::End => Some(0),
            TagKind::Byte => Some(1),
            TagKind::Short => Some(2),
            TagKind::Int | TagKind::Float => Some(4),
            TagKind::Long | TagKind::Double => Some(8),
            _ => None,
        }
    }

    /// Контейнер, содержащий другие теги.
    pub const fn is_container(self) -> bool {
        matches!(self, TagKind::List | TagKind::Compound)
    }
}

impl Default for TagKind {
    fn default() -> Self {
        TagKind::End
    }
}

impl fmt::Display for TagKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}
