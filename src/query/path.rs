use std::{fmt, str::FromStr};

use nbtfile_error::{NbtError, NbtResult};

/// Один шаг пути: ключ compound-а или индекс списка.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Key(String),
    Index(usize),
}

/// Разобранный путь запроса.
///
/// Синтаксис: сегменты через `.`, сегмент состоит из имени, за которым может идти
/// один или несколько индексов `[n]`:
///
/// ```text
/// inventory.items[2].name
/// grid[1][0]
/// ```
///
/// Пробелы входят в имя и разделителями не являются. Путь всегда
/// начинается с ключа корневого compound-а.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagPath {
    steps: Vec<Step>,
}

impl TagPath {
    /// Разбирает строку пути. Синтаксическая ошибка возвращается как
    /// [`NbtError::InvalidQuery`] с байтовой позицией.
    pub fn parse(query: &str) -> NbtResult<Self> {
        if query.is_empty() {
            return Err(invalid(query, 0, "empty query"));
        }

        let mut steps = Vec::new();
        let mut seg_start = 0;
        for segment in query.split('.') {
            parse_segment(query, segment, seg_start, &mut steps)?;
            seg_start += segment.len() + 1;
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Текстовая форма первых `n` шагов.
    pub fn prefix(
        &self,
        n: usize,
    ) -> String {
        render(&self.steps[..n.min(self.steps.len())])
    }
}

fn parse_segment(
    query: &str,
    segment: &str,
    start: usize,
    steps: &mut Vec<Step>,
) -> NbtResult<()> {
    if segment.is_empty() {
        return Err(invalid(query, start, "empty segment"));
    }

    let name_end = segment.find('[').unwrap_or(segment.len());
    let name = &segment[..name_end];
    if let Some(pos) = name.find(']') {
        return Err(invalid(query, start + pos, "unexpected ']'"));
    }
    if name.is_empty() {
        return Err(invalid(query, start, "missing name before '['"));
    }
    steps.push(Step::Key(name.to_string()));

    let mut rest = &segment[name_end..];
    let mut pos = start + name_end;
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return Err(invalid(query, pos, "unexpected text after index"));
        }
        let close = rest
            .find(']')
            .ok_or_else(|| invalid(query, pos, "unterminated index"))?;
        let digits = &rest[1..close];
        if digits.is_empty() {
            return Err(invalid(query, pos, "empty index"));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(
                query,
                pos + 1,
                "index is not a non-negative integer",
            ));
        }
        let index = digits
            .parse::<usize>()
            .map_err(|_| invalid(query, pos + 1, "index is too large"))?;
        steps.push(Step::Index(index));

        rest = &rest[close + 1..];
        pos += close + 1;
    }
    Ok(())
}

fn invalid(
    query: &str,
    position: usize,
    reason: &str,
) -> NbtError {
    NbtError::InvalidQuery {
        query: query.to_string(),
        position,
        reason: reason.to_string(),
    }
}

fn render(steps: &[Step]) -> String {
    let mut out = String::new();
    for step in steps {
        match step {
            Step::Key(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            Step::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
        }
    }
    out
}

impl FromStr for TagPath {
    type Err = NbtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TagPath {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&render(&self.steps))
    }
}
