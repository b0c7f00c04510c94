//! Named Binary Tag (NBT): типизированное дерево тегов, бинарный кодек,
//! сжатие файла целиком, атомарное сохранение и запросы по пути.
//!
//! ```
//! use nbtfile::{Compound, NbtFile, Compression};
//!
//! let mut root = Compound::new();
//! root.insert("value", 42i32);
//! let doc = NbtFile::new("hello", root);
//!
//! let bytes = doc.to_bytes().unwrap();
//! let back = NbtFile::from_bytes(&bytes, Compression::None).unwrap();
//! assert_eq!(*back.query_as::<i32>("value").unwrap(), 42);
//! ```

/// Binary codec and whole-file compression.
pub mod codec;
/// Settings loaded from defaults, file and `NBTFILE_*` environment.
pub mod config;
/// Logging setup (filters, console and rolling file sinks).
pub mod logging;
/// Path queries over the tag tree.
pub mod query;
/// Atomic persistence and the `NbtFile` document.
pub mod storage;
/// Tag data model.
pub mod tag;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

pub use codec::{
    decode_root, encode_root, read_root, read_root_with, write_root, BlockCodec, Compression,
    DecodeOptions, Decoder, Encoder,
};
pub use config::{Settings, SettingsError};
pub use nbtfile_error::{ErrorExt, NbtError, NbtErrorKind, NbtResult, StatusCode};
pub use query::{resolve, resolve_as, resolve_mut, TagPath};
pub use storage::{write_atomic, NbtFile, StagedWrite};
pub use tag::{Compound, Tag, TagKind, TagList, TagPayload};

/// Версия крейта.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Коммит и время сборки (выставляются `build.rs`).
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const BUILD_TIME: &str = env!("BUILD_TIME");
