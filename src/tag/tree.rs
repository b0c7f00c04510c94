//! Текстовое дерево тегов с отступами.
//!
//! Один обход используется и для `Display`, и для цветного вывода CLI:
//! оформление имён типов, имён тегов и значений задаёт [`TreeStyle`].

use std::fmt::{self, Write as _};

use super::{Compound, Tag};

/// Оформление фрагментов дерева. Реализации по умолчанию дают обычный
/// текст.
pub trait TreeStyle {
    /// Имя типа (`TAG_Int`).
    fn kind(
        &self,
        s: &str,
    ) -> String {
        s.to_string()
    }

    /// Имя тега; по умолчанию в кавычках.
    fn name(
        &self,
        s: &str,
    ) -> String {
        format!("{s:?}")
    }

    /// Отрендеренное значение примитива или сводка массива.
    fn value(
        &self,
        s: String,
    ) -> String {
        s
    }
}

/// Текст без оформления.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyle;

impl TreeStyle for PlainStyle {}

/// Пишет тег (и его поддерево), начиная с `indent` уровней отступа.
pub fn write_tag(
    out: &mut String,
    name: Option<&str>,
    tag: &Tag,
    indent: usize,
    style: &dyn TreeStyle,
) -> fmt::Result {
    let value = match tag {
        Tag::Compound(c) => return write_compound(out, name, c, indent, style),
        Tag::List(list) => {
            header(out, tag, name, indent, style)?;
            writeln!(
                out,
                ": {} entries of type {} {{",
                list.len(),
                list.element_kind().name()
            )?;
            for item in list.iter() {
                write_tag(out, None, item, indent + 1, style)?;
            }
            return writeln!(out, "{}}}", "  ".repeat(indent));
        }
        Tag::End => None,
        Tag::Byte(v) => Some(v.to_string()),
        Tag::Short(v) => Some(v.to_string()),
        Tag::Int(v) => Some(v.to_string()),
        Tag::Long(v) => Some(v.to_string()),
        Tag::Float(v) => Some(v.to_string()),
        Tag::Double(v) => Some(v.to_string()),
        Tag::String(s) => Some(format!("{s:?}")),
        Tag::ByteArray(v) => Some(format!("[{} bytes]", v.len())),
        Tag::IntArray(v) => Some(format!("[{} ints]", v.len())),
        Tag::LongArray(v) => Some(format!("[{} longs]", v.len())),
    };
    header(out, tag, name, indent, style)?;
    match value {
        Some(value) => writeln!(out, ": {}", style.value(value)),
        None => writeln!(out),
    }
}

/// Пишет compound под заданным именем: так выводится корень документа.
pub fn write_compound(
    out: &mut String,
    name: Option<&str>,
    compound: &Compound,
    indent: usize,
    style: &dyn TreeStyle,
) -> fmt::Result {
    let pad = "  ".repeat(indent);
    write!(out, "{pad}{}", style.kind("TAG_Compound"))?;
    if let Some(name) = name {
        write!(out, "({})", style.name(name))?;
    }
    writeln!(out, ": {} entries {{", compound.len())?;
    for (key, value) in compound.iter() {
        write_tag(out, Some(key), value, indent + 1, style)?;
    }
    writeln!(out, "{pad}}}")
}

fn header(
    out: &mut String,
    tag: &Tag,
    name: Option<&str>,
    indent: usize,
    style: &dyn TreeStyle,
) -> fmt::Result {
    write!(out, "{}{}", "  ".repeat(indent), style.kind(tag.kind().name()))?;
    if let Some(name) = name {
        write!(out, "({})", style.name(name))?;
    }
    Ok(())
}
