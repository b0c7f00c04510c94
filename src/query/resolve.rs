//! Обход дерева по [`TagPath`].
//!
//! Обход итеративный: глубина пути не расходует стек. Приведения типов нет:
//! ключ применяется только к compound-у, индекс только к списку.

use nbtfile_error::{NbtError, NbtResult};

use super::{Step, TagPath};
use crate::tag::{Compound, Tag, TagKind, TagPayload};

/// Находит тег по пути.
///
/// - ключа нет или индекс вне списка: `NotFound`;
/// - ключ к не-compound-у или индекс к не-списку: `TypeMismatch`.
///
/// Ошибка несёт пройденный префикс пути.
pub fn resolve<'a>(
    root: &'a Compound,
    path: &TagPath,
) -> NbtResult<&'a Tag> {
    let (first, rest) = split_first(path)?;
    let mut current = step_into_root(root, first, path)?;

    for (i, step) in rest.iter().enumerate() {
        let depth = i + 1;
        current = match step {
            Step::Key(name) => match current {
                Tag::Compound(c) => c.get(name).ok_or_else(|| missing(path, depth, name))?,
                other => return Err(mismatch(path, depth, TagKind::Compound, other.kind())),
            },
            Step::Index(index) => match current {
                Tag::List(list) => list
                    .get(*index)
                    .ok_or_else(|| out_of_range(path, depth, *index, list.len()))?,
                other => return Err(mismatch(path, depth, TagKind::List, other.kind())),
            },
        };
    }
    Ok(current)
}

/// То же, что [`resolve`], но с изменяемым доступом.
pub fn resolve_mut<'a>(
    root: &'a mut Compound,
    path: &TagPath,
) -> NbtResult<&'a mut Tag> {
    let (first, rest) = split_first(path)?;
    let mut current = match first {
        Step::Key(name) => root.get_mut(name).ok_or_else(|| missing(path, 0, name))?,
        Step::Index(_) => return Err(mismatch(path, 0, TagKind::List, TagKind::Compound)),
    };

    for (i, step) in rest.iter().enumerate() {
        let depth = i + 1;
        current = match step {
            Step::Key(name) => match current {
                Tag::Compound(c) => c
                    .get_mut(name)
                    .ok_or_else(|| missing(path, depth, name))?,
                other => return Err(mismatch(path, depth, TagKind::Compound, other.kind())),
            },
            Step::Index(index) => match current {
                Tag::List(list) => {
                    let len = list.len();
                    list.get_mut(*index)
                        .ok_or_else(|| out_of_range(path, depth, *index, len))?
                }
                other => return Err(mismatch(path, depth, TagKind::List, other.kind())),
            },
        };
    }
    Ok(current)
}

/// Находит тег и сужает его до `T`; `TypeMismatch`, если тип другой.
pub fn resolve_as<'a, T: TagPayload>(
    root: &'a Compound,
    path: &TagPath,
) -> NbtResult<&'a T> {
    resolve(root, path)?
        .try_get::<T>()
        .map_err(|e| e.with_path(path.to_string()))
}

pub fn resolve_as_mut<'a, T: TagPayload>(
    root: &'a mut Compound,
    path: &TagPath,
) -> NbtResult<&'a mut T> {
    resolve_mut(root, path)?
        .try_get_mut::<T>()
        .map_err(|e| e.with_path(path.to_string()))
}

fn split_first(path: &TagPath) -> NbtResult<(&Step, &[Step])> {
    path.steps()
        .split_first()
        .ok_or_else(|| NbtError::InvalidQuery {
            query: String::new(),
            position: 0,
            reason: "empty query".to_string(),
        })
}

fn step_into_root<'a>(
    root: &'a Compound,
    first: &Step,
    path: &TagPath,
) -> NbtResult<&'a Tag> {
    match first {
        Step::Key(name) => root.get(name).ok_or_else(|| missing(path, 0, name)),
        Step::Index(_) => Err(mismatch(path, 0, TagKind::List, TagKind::Compound)),
    }
}

// `depth`: номер шага, на котором случилась ошибка.

fn missing(
    path: &TagPath,
    depth: usize,
    name: &str,
) -> NbtError {
    NbtError::MissingTag {
        name: name.to_string(),
        path: path.prefix(depth + 1),
    }
}

fn out_of_range(
    path: &TagPath,
    depth: usize,
    index: usize,
    len: usize,
) -> NbtError {
    NbtError::IndexOutOfRange {
        index,
        len,
        path: path.prefix(depth + 1),
    }
}

fn mismatch(
    path: &TagPath,
    depth: usize,
    expected: TagKind,
    found: TagKind,
) -> NbtError {
    let resolved = path.prefix(depth);
    let err = NbtError::type_mismatch(expected.name(), found.name());
    if resolved.is_empty() {
        err
    } else {
        err.with_path(resolved)
    }
}
