//! Хранение NBT-документов на диске.
//!
//! - [`atomic`]: атомарная замена файла через `<dest>.tmp` + `rename`;
//! - [`file`]: документ [`NbtFile`]: загрузка, сохранение, запросы.

pub mod atomic;
pub mod file;

pub use atomic::{tmp_path_for, write_atomic, StagedWrite, TMP_SUFFIX};
pub use file::NbtFile;
