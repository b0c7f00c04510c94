#![no_main]

use libfuzzer_sys::fuzz_target;
use nbtfile::{NbtError, TagPath};

fuzz_target!(|query: &str| {
    match TagPath::parse(query) {
        // Текстовая форма разобранного пути разбирается в тот же путь
        Ok(path) => {
            let again = TagPath::parse(&path.to_string()).expect("rendered path must parse");
            assert_eq!(path, again);
        }
        Err(NbtError::InvalidQuery { position, .. }) => assert!(position <= query.len()),
        Err(other) => panic!("unexpected error kind: {other:?}"),
    }
});
