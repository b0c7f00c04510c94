//! Property-based тесты кодека и сжатия.
//!
//! Генерируют случайные деревья тегов и проверяют, что кодирование,
//! сжатие и запросы ведут себя одинаково на любых корректных данных.

use nbtfile::{decode_root, encode_root, resolve, Compression, NbtError, NbtFile, TagPath};
use proptest::prelude::*;

mod generators;
use generators::*;

const PROPTEST_CASES: u32 = 256;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: PROPTEST_CASES,
        ..ProptestConfig::default()
    }
}

proptest! {
    #![proptest_config(config())]

    /// Тест проверяет, что encode -> decode возвращает то же дерево, с тем
    /// же порядком ключей.
    #[test]
    fn prop_roundtrip_preserves_tree((name, root) in document_strategy()) {
        let bytes = encode_root(&name, &root).unwrap();
        let (back_name, back) = decode_root(&bytes).unwrap();

        prop_assert_eq!(&back_name, &name);
        let keys: Vec<&str> = root.keys().collect();
        let back_keys: Vec<&str> = back.keys().collect();
        prop_assert_eq!(back_keys, keys);
        prop_assert_eq!(back, root);
    }

    /// Тест проверяет, что повторное кодирование даёт те же байты.
    #[test]
    fn prop_encoding_is_deterministic((name, root) in document_strategy()) {
        let first = encode_root(&name, &root).unwrap();
        let (n, r) = decode_root(&first).unwrap();
        let second = encode_root(&n, &r).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Тест проверяет, что любой обрезанный поток даёт `UnexpectedEof`, а
    /// не панику и не частичный документ.
    #[test]
    fn prop_truncated_stream_is_eof(
        (name, root) in document_strategy(),
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = encode_root(&name, &root).unwrap();
        let len = cut.index(bytes.len());
        let err = decode_root(&bytes[..len]).unwrap_err();
        prop_assert!(matches!(err, NbtError::UnexpectedEof { .. }), "got {:?}", err);
    }

    /// Тест проверяет, что декодер не паникует на произвольных байтах.
    #[test]
    fn prop_decoder_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode_root(&bytes);
    }

    /// Тест проверяет round-trip документа через каждый режим сжатия.
    #[test]
    fn prop_compressed_roundtrip(
        (name, root) in document_strategy(),
        mode in prop_oneof![
            Just(Compression::None),
            Just(Compression::Zstd),
            Just(Compression::Gzip),
            Just(Compression::Zlib),
            Just(Compression::Lz4),
        ],
    ) {
        let mut doc = NbtFile::new(name, root);
        doc.set_compression(mode);
        let bytes = doc.to_bytes().unwrap();
        let back = NbtFile::from_bytes(&bytes, mode).unwrap();
        prop_assert_eq!(back.root_name(), doc.root_name());
        prop_assert_eq!(back.root(), doc.root());
    }

    /// Тест проверяет, что каждый ключ верхнего уровня находится запросом,
    /// если имя синтаксически допустимо как сегмент пути.
    #[test]
    fn prop_top_level_keys_resolve(root in root_strategy()) {
        for (key, tag) in root.iter() {
            let Ok(path) = TagPath::parse(key) else { continue };
            if path.len() != 1 {
                continue;
            }
            prop_assert_eq!(resolve(&root, &path).unwrap(), tag);
        }
    }
}
