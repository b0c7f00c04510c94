use nbtfile::{
    decode_root, encode_root, resolve, resolve_as, resolve_mut, Compound, NbtError, NbtErrorKind,
    Tag, TagList, TagPath,
};
use rstest::{fixture, rstest};

fn item(
    id: &str,
    count: i8,
) -> Compound {
    let mut c = Compound::new();
    c.insert("name", id);
    c.insert("count", count);
    c
}

#[fixture]
fn world() -> Compound {
    let items = TagList::from_values([item("apple", 3), item("torch", 64), item("sword", 1)]);
    let mut inventory = Compound::new();
    inventory.insert("items", items);
    inventory.insert("slots", 36i32);

    let grid = TagList::from_values([
        TagList::from_values([1i32, 2]),
        TagList::from_values([3i32, 4]),
    ]);

    let mut root = Compound::new();
    root.insert("inventory", inventory);
    root.insert("grid", grid);
    root.insert("display name", "World 1");
    root
}

#[rstest]
#[case("inventory.items[2].name", Tag::String("sword".into()))]
#[case("inventory.items[0].count", Tag::Byte(3))]
#[case("inventory.slots", Tag::Int(36))]
#[case("grid[1][0]", Tag::Int(3))]
#[case("display name", Tag::String("World 1".into()))]
fn test_resolves(
    world: Compound,
    #[case] query: &str,
    #[case] expected: Tag,
) {
    let path = TagPath::parse(query).unwrap();
    assert_eq!(resolve(&world, &path).unwrap(), &expected);
}

/// Тест проверяет, что отсутствующий индекс `items[2]` даёт `NotFound`.
#[rstest]
fn test_missing_index_is_not_found(mut world: Compound) {
    world
        .get_mut("inventory")
        .and_then(Tag::as_compound_mut)
        .unwrap()
        .insert("items", TagList::from_values([item("apple", 3), item("torch", 64)]));

    let path = TagPath::parse("inventory.items[2].name").unwrap();
    let err = resolve(&world, &path).unwrap_err();
    assert_eq!(err.kind(), NbtErrorKind::NotFound);
    match err {
        NbtError::IndexOutOfRange { index, len, path } => {
            assert_eq!((index, len), (2, 2));
            assert_eq!(path, "inventory.items[2]");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Тест проверяет, что `items`, не являющийся списком, даёт `TypeMismatch`.
#[rstest]
fn test_non_list_is_type_mismatch(mut world: Compound) {
    world
        .get_mut("inventory")
        .and_then(Tag::as_compound_mut)
        .unwrap()
        .insert("items", 7i32);

    let path = TagPath::parse("inventory.items[2].name").unwrap();
    let err = resolve(&world, &path).unwrap_err();
    assert_eq!(err.kind(), NbtErrorKind::TypeMismatch);
    assert!(err.is_type_mismatch());
}

#[rstest]
#[case("inventory.chest")]
#[case("missing")]
#[case("inventory.items[1].durability")]
fn test_missing_key_is_not_found(
    world: Compound,
    #[case] query: &str,
) {
    let err = resolve(&world, &TagPath::parse(query).unwrap()).unwrap_err();
    assert!(err.is_not_found(), "{query}: {err:?}");
}

#[rstest]
#[case("")]
#[case("a..b")]
#[case("items[")]
#[case("items[-1]")]
#[case("[0]")]
fn test_bad_syntax_is_format_error(#[case] query: &str) {
    let err = TagPath::parse(query).unwrap_err();
    assert_eq!(err.kind(), NbtErrorKind::Format);
    assert!(matches!(err, NbtError::InvalidQuery { .. }));
}

/// Тест проверяет, что запрос не зависит от того, было ли дерево
/// перекодировано: результат одинаков до и после round-trip.
#[rstest]
fn test_query_is_stable_across_roundtrip(world: Compound) {
    let bytes = encode_root("", &world).unwrap();
    let (_, decoded) = decode_root(&bytes).unwrap();

    for query in ["inventory.items[1].name", "grid[0][1]", "display name"] {
        let path = TagPath::parse(query).unwrap();
        assert_eq!(
            resolve(&world, &path).unwrap(),
            resolve(&decoded, &path).unwrap()
        );
    }
}

#[rstest]
fn test_resolve_as_and_mut(mut world: Compound) {
    let path = TagPath::parse("inventory.items[1].count").unwrap();
    assert_eq!(*resolve_as::<i8>(&world, &path).unwrap(), 64);

    let err = resolve_as::<i32>(&world, &path).unwrap_err();
    assert!(err.is_type_mismatch());

    *resolve_mut(&mut world, &path).unwrap() = Tag::Byte(16);
    assert_eq!(*resolve_as::<i8>(&world, &path).unwrap(), 16);
}
