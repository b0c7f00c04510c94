use std::{any::Any, io};

use crate::{ErrorExt, StatusCode};

/// Закрытый набор категорий ошибок.
///
/// Каждый вариант [`NbtError`] относится ровно к одной категории; вызывающий
/// код, которому не важны детали, сопоставляет только `kind()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NbtErrorKind {
    /// Файл, ключ compound-а или индекс списка отсутствует.
    NotFound,
    /// Поток байтов (или путь запроса) не соответствует формату.
    Format,
    /// Сжатый буфер не удалось распаковать.
    Decompression,
    /// Тег имеет не тот тип, который запрошен.
    TypeMismatch,
    /// Ошибка ввода-вывода источника или приёмника.
    Io,
}

/// Основная ошибка NBT с контекстом для диагностики.
#[derive(Debug, Clone)]
pub enum NbtError {
    /// Исходный файл не существует
    FileNotFound { path: String },

    /// В compound-е нет ключа, запрошенного путём
    MissingTag { name: String, path: String },

    /// Индекс за пределами списка
    IndexOutOfRange {
        index: usize,
        len: usize,
        path: String,
    },

    /// Поток начинается не с TAG_Compound
    InvalidRoot { found: u8 },

    /// Неизвестный байт типа
    InvalidTag {
        tag: u8,
        offset: Option<u64>,
        path: Option<String>,
    },

    /// Поток закончился раньше объявленной длины
    UnexpectedEof {
        context: String,
        offset: Option<u64>,
        path: Option<String>,
        expected_bytes: Option<u64>,
    },

    /// Отрицательная длина массива или списка
    NegativeLength {
        what: String,
        length: i32,
        offset: Option<u64>,
        path: Option<String>,
    },

    /// Превышен лимит размера
    SizeLimit {
        what: String,
        size: u64,
        limit: u64,
        offset: Option<u64>,
        path: Option<String>,
    },

    /// Превышена допустимая глубина вложенности
    DepthLimit {
        limit: usize,
        offset: Option<u64>,
        path: Option<String>,
    },

    /// Имя или строка не являются корректным UTF-8
    InvalidUtf8 {
        what: String,
        offset: Option<u64>,
        path: Option<String>,
    },

    /// Структурно некорректный список
    InvalidList {
        reason: String,
        offset: Option<u64>,
        path: Option<String>,
    },

    /// Синтаксическая ошибка в пути запроса
    InvalidQuery {
        query: String,
        position: usize,
        reason: String,
    },

    /// Ошибка распаковки
    Decompression {
        codec: String,
        reason: String,
        compressed_size: Option<u64>,
    },

    /// Тег другого типа
    TypeMismatch {
        expected: String,
        found: String,
        path: Option<String>,
    },

    /// Ошибка ввода-вывода
    Io {
        kind: io::ErrorKind,
        message: String,
        path: Option<String>,
    },
}

impl NbtError {
    /// Категория ошибки.
    pub fn kind(&self) -> NbtErrorKind {
        match self {
            Self::FileNotFound { .. } | Self::MissingTag { .. } | Self::IndexOutOfRange { .. } => {
                NbtErrorKind::NotFound
            }
            Self::InvalidRoot { .. }
            | Self::InvalidTag { .. }
            | Self::UnexpectedEof { .. }
            | Self::NegativeLength { .. }
            | Self::SizeLimit { .. }
            | Self::DepthLimit { .. }
            | Self::InvalidUtf8 { .. }
            | Self::InvalidList { .. }
            | Self::InvalidQuery { .. } => NbtErrorKind::Format,
            Self::Decompression { .. } => NbtErrorKind::Decompression,
            Self::TypeMismatch { .. } => NbtErrorKind::TypeMismatch,
            Self::Io { .. } => NbtErrorKind::Io,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == NbtErrorKind::NotFound
    }

    pub fn is_format(&self) -> bool {
        self.kind() == NbtErrorKind::Format
    }

    pub fn is_decompression(&self) -> bool {
        self.kind() == NbtErrorKind::Decompression
    }

    pub fn is_type_mismatch(&self) -> bool {
        self.kind() == NbtErrorKind::TypeMismatch
    }

    /// Создаёт ошибку несовпадения типов.
    pub fn type_mismatch(
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
            path: None,
        }
    }

    /// Ошибка ввода-вывода с путём файла.
    pub fn io_at(
        err: io::Error,
        path: impl Into<String>,
    ) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }

    /// Добавляет смещение к ошибке, если оно ещё не задано.
    ///
    /// Смещение, выставленное ближе к месту ошибки, точнее, поэтому уже
    /// заполненное значение не перезаписывается.
    pub fn with_offset(
        mut self,
        offset: u64,
    ) -> Self {
        match &mut self {
            Self::InvalidTag { offset: o, .. }
            | Self::UnexpectedEof { offset: o, .. }
            | Self::NegativeLength { offset: o, .. }
            | Self::SizeLimit { offset: o, .. }
            | Self::DepthLimit { offset: o, .. }
            | Self::InvalidUtf8 { offset: o, .. }
            | Self::InvalidList { offset: o, .. } => {
                o.get_or_insert(offset);
            }
            _ => {}
        }
        self
    }

    /// Добавляет путь тега (или файла) к ошибке, если он ещё не задан.
    pub fn with_path(
        mut self,
        path: impl Into<String>,
    ) -> Self {
        match &mut self {
            Self::InvalidTag { path: p, .. }
            | Self::UnexpectedEof { path: p, .. }
            | Self::NegativeLength { path: p, .. }
            | Self::SizeLimit { path: p, .. }
            | Self::DepthLimit { path: p, .. }
            | Self::InvalidUtf8 { path: p, .. }
            | Self::InvalidList { path: p, .. }
            | Self::TypeMismatch { path: p, .. }
            | Self::Io { path: p, .. } => {
                if p.is_none() {
                    *p = Some(path.into());
                }
            }
            _ => {}
        }
        self
    }

    /// Дописывает сегмент родителя в начало пути тега.
    ///
    /// Вызывается при раскрутке рекурсии: `"name"` внутри `"[2]"` внутри
    /// `"items"` даёт `items[2].name`.
    pub fn within(
        mut self,
        segment: &str,
    ) -> Self {
        match &mut self {
            Self::InvalidTag { path: p, .. }
            | Self::UnexpectedEof { path: p, .. }
            | Self::NegativeLength { path: p, .. }
            | Self::SizeLimit { path: p, .. }
            | Self::DepthLimit { path: p, .. }
            | Self::InvalidUtf8 { path: p, .. }
            | Self::InvalidList { path: p, .. }
            | Self::TypeMismatch { path: p, .. } => {
                *p = Some(match p.take() {
                    Some(inner) if inner.starts_with('[') => format!("{segment}{inner}"),
                    Some(inner) => format!("{segment}.{inner}"),
                    None => segment.to_string(),
                });
            }
            _ => {}
        }
        self
    }

    /// Смещение в потоке, если известно.
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::InvalidTag { offset, .. }
            | Self::UnexpectedEof { offset, .. }
            | Self::NegativeLength { offset, .. }
            | Self::SizeLimit { offset, .. }
            | Self::DepthLimit { offset, .. }
            | Self::InvalidUtf8 { offset, .. }
            | Self::InvalidList { offset, .. } => *offset,
            Self::InvalidRoot { .. } => Some(0),
            _ => None,
        }
    }

    /// Путь тега или файла, к которому относится ошибка.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::FileNotFound { path }
            | Self::MissingTag { path, .. }
            | Self::IndexOutOfRange { path, .. } => Some(path),
            Self::InvalidTag { path, .. }
            | Self::UnexpectedEof { path, .. }
            | Self::NegativeLength { path, .. }
            | Self::SizeLimit { path, .. }
            | Self::DepthLimit { path, .. }
            | Self::InvalidUtf8 { path, .. }
            | Self::InvalidList { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::Io { path, .. } => path.as_deref(),
            _ => None,
        }
    }

    /// Возвращает подсказку для пользователя.
    pub fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidRoot { .. } => {
                Some("Check the compression flag: the file may be compressed (or not)")
            }
            Self::Decompression { .. } => {
                Some("The file may be uncompressed or use a different codec")
            }
            Self::UnexpectedEof { .. } => Some("File may be truncated. Check file integrity"),
            Self::DepthLimit { .. } | Self::SizeLimit { .. } => {
                Some("Increase limits in configuration if the data is trusted")
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for NbtError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::FileNotFound { path } => write!(f, "Could not find NBT file: {path}"),
            Self::MissingTag { name, path } => {
                write!(f, "Tag '{name}' not found (path: {path})")
            }
            Self::IndexOutOfRange { index, len, path } => {
                write!(
                    f,
                    "Index {index} out of range for list of length {len} (path: {path})"
                )
            }
            Self::InvalidRoot { found } => {
                write!(
                    f,
                    "Stream does not start with a TAG_Compound (found type 0x{found:02X})"
                )
            }
            Self::InvalidTag { tag, offset, path } => {
                write!(f, "Invalid tag type 0x{tag:02X}")?;
                write_context(f, *offset, path.as_deref())
            }
            Self::UnexpectedEof {
                context,
                offset,
                path,
                expected_bytes,
            } => {
                write!(f, "Unexpected EOF: {context}")?;
                if let Some(exp) = expected_bytes {
                    write!(f, " (expected {exp} bytes)")?;
                }
                write_context(f, *offset, path.as_deref())
            }
            Self::NegativeLength {
                what,
                length,
                offset,
                path,
            } => {
                write!(f, "Negative {what} length {length}")?;
                write_context(f, *offset, path.as_deref())
            }
            Self::SizeLimit {
                what,
                size,
                limit,
                offset,
                path,
            } => {
                write!(f, "{what} size {size} exceeds limit {limit}")?;
                write_context(f, *offset, path.as_deref())
            }
            Self::DepthLimit {
                limit,
                offset,
                path,
            } => {
                write!(f, "Nesting depth exceeds limit {limit}")?;
                write_context(f, *offset, path.as_deref())
            }
            Self::InvalidUtf8 { what, offset, path } => {
                write!(f, "Invalid UTF-8 in {what}")?;
                write_context(f, *offset, path.as_deref())
            }
            Self::InvalidList {
                reason,
                offset,
                path,
            } => {
                write!(f, "Invalid list: {reason}")?;
                write_context(f, *offset, path.as_deref())
            }
            Self::InvalidQuery {
                query,
                position,
                reason,
            } => {
                write!(f, "Invalid query '{query}' at position {position}: {reason}")
            }
            Self::Decompression {
                codec,
                reason,
                compressed_size,
            } => {
                write!(f, "{codec} decompression error: {reason}")?;
                if let Some(size) = compressed_size {
                    write!(f, " (size: {size} bytes)")?;
                }
                Ok(())
            }
            Self::TypeMismatch {
                expected,
                found,
                path,
            } => {
                write!(f, "Type mismatch: expected {expected}, found {found}")?;
                write_context(f, None, path.as_deref())
            }
            Self::Io {
                kind,
                message,
                path,
            } => {
                write!(f, "IO error ({kind:?}): {message}")?;
                write_context(f, None, path.as_deref())
            }
        }
    }
}

/// Вспомогательная функция для форматирования контекста (offset, path).
fn write_context(
    f: &mut std::fmt::Formatter<'_>,
    offset: Option<u64>,
    path: Option<&str>,
) -> std::fmt::Result {
    let mut parts = Vec::new();
    if let Some(o) = offset {
        parts.push(format!("offset: 0x{o:X}"));
    }
    if let Some(p) = path {
        parts.push(format!("path: {p}"));
    }
    if !parts.is_empty() {
        write!(f, " [{}]", parts.join(", "))?;
    }
    Ok(())
}

impl std::error::Error for NbtError {}

impl ErrorExt for NbtError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::FileNotFound { .. } | Self::MissingTag { .. } => StatusCode::NotFound,
            Self::IndexOutOfRange { .. } => StatusCode::IndexOutOfBounds,
            Self::InvalidRoot { .. } | Self::InvalidTag { .. } => StatusCode::InvalidData,
            Self::UnexpectedEof { .. } => StatusCode::UnexpectedEof,
            Self::NegativeLength { .. } | Self::InvalidList { .. } => StatusCode::DecodingError,
            Self::SizeLimit { .. } => StatusCode::SizeLimit,
            Self::DepthLimit { .. } => StatusCode::DepthLimit,
            Self::InvalidUtf8 { .. } => StatusCode::InvalidUtf8,
            Self::InvalidQuery { .. } => StatusCode::ParseError,
            Self::Decompression { .. } => StatusCode::CompressionFailed,
            Self::TypeMismatch { .. } => StatusCode::TypeError,
            Self::Io { .. } => StatusCode::Io,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::FileNotFound { path } => format!("File not found: {path}"),
            Self::MissingTag { .. } | Self::IndexOutOfRange { .. } => self.to_string(),
            Self::InvalidRoot { .. } => "Not a valid NBT file".to_string(),
            Self::Decompression { .. } => "Decompression failed".to_string(),
            Self::TypeMismatch { .. } | Self::InvalidQuery { .. } => self.to_string(),
            Self::Io { .. } => "I/O error".to_string(),
            _ => "Malformed NBT data".to_string(),
        }
    }

    fn log_message(&self) -> String {
        let mut msg = format!("{self:?}");
        if let Some(hint) = self.recovery_hint() {
            msg.push_str(&format!(" | Hint: {hint}"));
        }
        msg
    }
}

// Конверсия в std::io::Error для совместимости с Read/Write-кодом
impl From<NbtError> for io::Error {
    fn from(e: NbtError) -> Self {
        let kind = match &e {
            NbtError::FileNotFound { .. } => io::ErrorKind::NotFound,
            NbtError::UnexpectedEof { .. } => io::ErrorKind::UnexpectedEof,
            NbtError::Io { kind, .. } => *kind,
            NbtError::MissingTag { .. }
            | NbtError::IndexOutOfRange { .. }
            | NbtError::TypeMismatch { .. }
            | NbtError::InvalidQuery { .. } => io::ErrorKind::InvalidInput,
            _ => io::ErrorKind::InvalidData,
        };

        io::Error::new(kind, e.to_string())
    }
}

impl From<io::Error> for NbtError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => NbtError::UnexpectedEof {
                context: e.to_string(),
                offset: None,
                path: None,
                expected_bytes: None,
            },
            kind => NbtError::Io {
                kind,
                message: e.to_string(),
                path: None,
            },
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
