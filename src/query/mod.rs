//! Язык путей для извлечения вложенных тегов.
//!
//! ```
//! use nbtfile::{query, Compound, TagList};
//!
//! let mut root = Compound::new();
//! root.insert("scores", TagList::from_values([10i32, 20, 30]));
//!
//! let path = "scores[1]".parse().unwrap();
//! assert_eq!(*query::resolve_as::<i32>(&root, &path).unwrap(), 20);
//! ```

pub mod path;
pub mod resolve;

pub use path::{Step, TagPath};
pub use resolve::{resolve, resolve_as, resolve_as_mut, resolve_mut};
