//! Общие генераторы документов для бенчмарков.

use nbtfile::{Compound, Tag, TagList};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Документ, похожий на данные чанка: секции с массивами и список
/// сущностей.
pub fn chunk_like(
    sections: usize,
    seed: u64,
) -> Compound {
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut section_list = Vec::with_capacity(sections);
    for y in 0..sections {
        let mut section = Compound::new();
        section.insert("Y", y as i8);
        section.insert(
            "BlockStates",
            Tag::LongArray((0..256).map(|_| rng.gen_range(0..16i64)).collect()),
        );
        section.insert(
            "SkyLight",
            Tag::ByteArray((0..2048).map(|_| rng.gen::<u8>() & 0x0f).collect()),
        );
        section_list.push(section);
    }

    let mut entities = Vec::with_capacity(32);
    for i in 0..32 {
        let mut e = Compound::new();
        e.insert("id", format!("minecraft:entity_{}", i % 5));
        e.insert(
            "Pos",
            TagList::from_values([rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>()]),
        );
        e.insert("Health", rng.gen_range(0.0f32..20.0));
        entities.push(e);
    }

    let mut root = Compound::new();
    root.insert("DataVersion", 3465i32);
    root.insert("xPos", rng.gen::<i32>());
    root.insert("zPos", rng.gen::<i32>());
    root.insert("sections", TagList::from_values(section_list));
    root.insert("Entities", TagList::from_values(entities));
    root
}

/// `depth` вложенных compound-ов с одним `Int` в самом низу.
pub fn nested(depth: usize) -> Compound {
    let mut current = Compound::new();
    current.insert("leaf", 1i32);
    for i in 0..depth {
        let mut parent = Compound::new();
        parent.insert(format!("level{i}"), current);
        current = parent;
    }
    current
}

/// Путь к листу документа из [`nested`].
pub fn nested_path(depth: usize) -> String {
    let mut segments: Vec<String> = (0..depth).rev().map(|i| format!("level{i}")).collect();
    segments.push("leaf".to_string());
    segments.join(".")
}
