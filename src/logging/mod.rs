//! Логирование на `tracing-subscriber`.
//!
//! Подписчик собирается из `EnvFilter` (`RUST_LOG` или уровень из
//! конфигурации), консольного слоя в stderr и, если задан каталог,
//! файлового слоя с ежедневной ротацией (`tracing-appender`).

pub mod config;
mod filters;
mod formatter;
pub mod handle;
pub mod sinks;

use std::path::PathBuf;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

pub use config::{LogFormat, LoggingConfig};
pub use handle::LoggingHandle;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter directive '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("cannot create log directory {}: {source}", path.display())]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("global subscriber is already installed: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Устанавливает глобальный подписчик.
///
/// Возвращённый [`LoggingHandle`] нужно держать до завершения программы,
/// иначе хвост файлового лога может потеряться.
pub fn init_logging(config: LoggingConfig) -> Result<LoggingHandle, LoggingError> {
    let env_filter = filters::build_filter(&config)?;
    let mut layers = Vec::new();

    if config.console_enabled {
        layers.push(formatter::console_layer(&config));
    }

    let file_guard = match &config.log_dir {
        Some(dir) => {
            let (file_layer, guard) = sinks::file::layer(dir, &config)?;
            layers.push(file_layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        format = %config.format,
        file_enabled = config.file_enabled(),
        "logging initialized"
    );

    Ok(LoggingHandle::new(file_guard, config.log_dir))
}

/// Слой без фильтра для встраивания в чужой подписчик (тесты, хост).
pub fn console_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    formatter::console_layer(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет, что повторная установка подписчика возвращает ошибку, а не
    /// паника.
    #[test]
    fn test_second_init_fails_cleanly() {
        let cfg = LoggingConfig {
            console_enabled: false,
            ..Default::default()
        };
        let _first = init_logging(cfg.clone());
        let second = init_logging(cfg);
        assert!(matches!(second, Err(LoggingError::AlreadyInitialized(_))));
    }
}
