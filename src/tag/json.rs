//! Экспорт дерева тегов в JSON (`serde_json::Value`).
//!
//! Преобразование одностороннее: тип тега в JSON теряется, поэтому обратного
//! импорта нет. Compound превращается в объект с сохранением порядка ключей
//! (`serde_json` собран с `preserve_order`).

use serde_json::{Map, Number, Value};

use super::{Compound, Tag};

/// Переводит тег в JSON-значение.
///
/// Нечисловые `f32`/`f64` (NaN, бесконечности) становятся `null`.
pub fn to_json(tag: &Tag) -> Value {
    match tag {
        Tag::End => Value::Null,
        Tag::Byte(v) => Value::from(*v),
        Tag::Short(v) => Value::from(*v),
        Tag::Int(v) => Value::from(*v),
        Tag::Long(v) => Value::from(*v),
        Tag::Float(v) => float(f64::from(*v)),
        Tag::Double(v) => float(*v),
        Tag::ByteArray(v) => Value::Array(v.iter().map(|b| Value::from(*b)).collect()),
        Tag::String(s) => Value::String(s.clone()),
        Tag::List(list) => Value::Array(list.iter().map(to_json).collect()),
        Tag::Compound(c) => compound_to_json(c),
        Tag::IntArray(v) => Value::Array(v.iter().map(|i| Value::from(*i)).collect()),
        Tag::LongArray(v) => Value::Array(v.iter().map(|i| Value::from(*i)).collect()),
    }
}

/// Переводит compound в JSON-объект.
pub fn compound_to_json(compound: &Compound) -> Value {
    let mut map = Map::with_capacity(compound.len());
    for (key, value) in compound.iter() {
        map.insert(key.to_string(), to_json(value));
    }
    Value::Object(map)
}

fn float(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}
