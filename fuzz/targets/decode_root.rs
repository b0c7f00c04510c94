#![no_main]

use libfuzzer_sys::fuzz_target;
use nbtfile::{decode_root, encode_root, read_root_with, DecodeOptions};

fuzz_target!(|data: &[u8]| {
    // Маленькие пределы, чтобы быстрее доходить до веток с ошибками.
    let tight = DecodeOptions {
        max_depth: 16,
        max_array_len: 4096,
    };
    let _ = read_root_with(data, tight);

    // Всё, что декодировалось, должно кодироваться обратно в тот же документ.
    if let Ok((name, root)) = decode_root(data) {
        let bytes = encode_root(&name, &root).expect("decoded document must re-encode");
        let (name2, root2) = decode_root(&bytes).expect("re-encoded document must decode");
        assert_eq!(name, name2);
        // NaN в float-тегах не равен сам себе, сравниваем байты
        assert_eq!(bytes, encode_root(&name2, &root2).expect("second encode"));
    }
});
