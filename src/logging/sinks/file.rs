use std::{fs, path::Path};

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling::daily};
use tracing_subscriber::{fmt, layer::Layer, registry::LookupSpan};

use crate::logging::{LogFormat, LoggingConfig, LoggingError};

/// Файловый слой с ежедневной ротацией и неблокирующей записью.
///
/// Пока жив возвращённый `WorkerGuard`, фоновый поток сбрасывает буфер в
/// файл; при его уничтожении оставшиеся записи дописываются.
pub fn layer<S>(
    dir: &Path,
    config: &LoggingConfig,
) -> Result<(Box<dyn Layer<S> + Send + Sync>, WorkerGuard), LoggingError>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fs::create_dir_all(dir).map_err(|source| LoggingError::LogDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let appender = daily(dir, &config.file_prefix);
    let (writer, guard) = non_blocking(appender);

    let layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .boxed(),
        LogFormat::Compact | LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .boxed(),
    };
    Ok((layer, guard))
}
