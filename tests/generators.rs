//! Генераторы деревьев тегов для property-based тестов.
//!
//! Значения генерируются с упором на граничные случаи: пустые строки и
//! массивы, экстремумы целых, пустые списки и compound-ы. Float без NaN,
//! иначе дерево не равно самому себе.

#![allow(dead_code)]

use std::ops::RangeInclusive;

use nbtfile::{Compound, Tag, TagKind, TagList};
use proptest::{collection::vec, prelude::*, string::string_regex};

/// Размеры коллекций.
const SMALL_SIZE: RangeInclusive<usize> = 0..=8;
const ARRAY_SIZE: RangeInclusive<usize> = 0..=64;

/// Имя тега: ASCII, пробелы, не-ASCII и пустое имя.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,12}").unwrap(),
        string_regex("[a-z ]{1,8}").unwrap(),
        string_regex("[а-яё]{1,6}").unwrap(),
        string_regex(r"\PC{1,8}").unwrap(),
    ]
}

fn f32_strategy() -> impl Strategy<Value = f32> {
    prop_oneof![
        Just(0.0f32),
        Just(-0.0f32),
        Just(f32::MIN),
        Just(f32::MAX),
        Just(f32::INFINITY),
        Just(f32::MIN_POSITIVE),
        -1.0e6f32..1.0e6f32,
    ]
}

fn f64_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0f64),
        Just(f64::MIN),
        Just(f64::MAX),
        Just(f64::NEG_INFINITY),
        Just(f64::EPSILON),
        -1.0e12f64..1.0e12f64,
    ]
}

/// Примитивы и массивы.
pub fn leaf_strategy() -> impl Strategy<Value = Tag> {
    prop_oneof![
        any::<i8>().prop_map(Tag::Byte),
        prop_oneof![Just(i16::MIN), Just(i16::MAX), any::<i16>()].prop_map(Tag::Short),
        prop_oneof![Just(i32::MIN), Just(-1), Just(0), Just(i32::MAX), any::<i32>()]
            .prop_map(Tag::Int),
        prop_oneof![Just(i64::MIN), Just(i64::MAX), any::<i64>()].prop_map(Tag::Long),
        f32_strategy().prop_map(Tag::Float),
        f64_strategy().prop_map(Tag::Double),
        string_regex(r"\PC{0,32}").unwrap().prop_map(Tag::String),
        vec(any::<u8>(), ARRAY_SIZE).prop_map(Tag::ByteArray),
        vec(any::<i32>(), ARRAY_SIZE).prop_map(Tag::IntArray),
        vec(any::<i64>(), ARRAY_SIZE).prop_map(Tag::LongArray),
    ]
}

/// Однородный список: тип задаётся первым элементом, остальные элементы
/// другого типа отбрасываются.
fn homogeneous_list(items: Vec<Tag>) -> Tag {
    let kind = items.first().map(Tag::kind).unwrap_or(TagKind::End);
    let items: Vec<Tag> = items.into_iter().filter(|t| t.kind() == kind).collect();
    Tag::List(TagList::from_tags(kind, items).expect("homogeneous by construction"))
}

fn compound_from(entries: Vec<(String, Tag)>) -> Compound {
    let mut compound = Compound::new();
    for (name, tag) in entries {
        compound.insert(name, tag);
    }
    compound
}

/// Произвольный тег, включая вложенные списки и compound-ы.
pub fn tag_strategy() -> impl Strategy<Value = Tag> {
    leaf_strategy().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            vec(inner.clone(), SMALL_SIZE).prop_map(homogeneous_list),
            vec((name_strategy(), inner), SMALL_SIZE)
                .prop_map(|entries| Tag::Compound(compound_from(entries))),
        ]
    })
}

/// Корневой compound документа.
pub fn root_strategy() -> impl Strategy<Value = Compound> {
    vec((name_strategy(), tag_strategy()), SMALL_SIZE).prop_map(compound_from)
}

/// Имя корня и корень.
pub fn document_strategy() -> impl Strategy<Value = (String, Compound)> {
    (name_strategy(), root_strategy())
}
