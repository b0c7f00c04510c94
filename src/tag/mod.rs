//! Модель данных NBT.
//!
//! - [`Tag`]: закрытый вариантный тип над всеми типами тегов;
//! - [`TagKind`]: дискриминант и байт типа в потоке;
//! - [`Compound`]: упорядоченное отображение имя → тег;
//! - [`TagList`]: однородный список с объявленным типом элементов;
//! - [`TagPayload`]: сужение тега до Rust-типа без приведения;
//! - [`json`]: экспорт дерева в JSON;
//! - [`tree`]: текстовое дерево с настраиваемым оформлением.
//!
//! Дерево является чистой иерархией владения: обратных ссылок и разделяемых
//! поддеревьев нет.

pub mod compound;
pub mod json;
pub mod kind;
pub mod list;
pub mod payload;
pub mod tree;
pub mod value;

pub use compound::Compound;
pub use kind::{TagKind, TAG_ROOT};
pub use list::TagList;
pub use payload::TagPayload;
pub use tree::{PlainStyle, TreeStyle};
pub use value::Tag;
