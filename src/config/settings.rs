use std::{env, path::PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    codec::{BlockCodec, Compression, DecodeOptions, DEFAULT_MAX_ARRAY_LEN, DEFAULT_MAX_DEPTH},
    logging::{LogFormat, LoggingConfig},
};

/// Префикс переменных окружения (`NBTFILE_COMPRESSION=zstd`).
pub const ENV_PREFIX: &str = "NBTFILE";

/// Переменная с путём к файлу конфигурации.
pub const CONFIG_PATH_ENV: &str = "NBTFILE_CONFIG";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Настройки чтения и записи NBT.
///
/// Источники по возрастанию приоритета: значения по умолчанию, файл из
/// `NBTFILE_CONFIG` (формат по расширению), переменные `NBTFILE_*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub compression: Compression,
    pub compression_level: Option<i32>,
    pub max_depth: usize,
    pub max_array_len: usize,
    pub log_level: String,
    pub log_format: LogFormat,
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compression: Compression::None,
            compression_level: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_len: DEFAULT_MAX_ARRAY_LEN,
            log_level: "warn".to_string(),
            log_format: LogFormat::Compact,
            log_dir: None,
        }
    }
}

impl Settings {
    /// Загружает настройки; файл берётся из `NBTFILE_CONFIG`, если задан.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    }

    /// Загружает настройки с явным (необязательным) файлом конфигурации.
    pub fn load_from(file: Option<PathBuf>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            // значения по умолчанию
            .set_default("compression", "none")?
            .set_default("max_depth", DEFAULT_MAX_DEPTH as u64)?
            .set_default("max_array_len", DEFAULT_MAX_ARRAY_LEN as u64)?
            .set_default("log_level", "warn")?
            .set_default("log_format", "compact")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_depth == 0 {
            return Err(SettingsError::Invalid {
                key: "max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_array_len == 0 || self.max_array_len > i32::MAX as usize {
            return Err(SettingsError::Invalid {
                key: "max_array_len",
                reason: format!("must be in 1..={}", i32::MAX),
            });
        }
        if self.log_level.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "log_level",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Накладывает переопределения (флаги CLI) и проверяет результат так же,
    /// как значения из файла и окружения.
    pub fn with_overrides(
        mut self,
        compression: Option<Compression>,
        max_depth: Option<usize>,
        log_format: Option<LogFormat>,
    ) -> Result<Self, SettingsError> {
        if let Some(compression) = compression {
            self.compression = compression;
        }
        if let Some(max_depth) = max_depth {
            self.max_depth = max_depth;
        }
        if let Some(format) = log_format {
            self.log_format = format;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            max_depth: self.max_depth,
            max_array_len: self.max_array_len,
        }
    }

    /// Кодек для выбранного режима; `None` для несжатых файлов.
    pub fn codec(&self) -> Option<Box<dyn BlockCodec>> {
        self.compression.codec_with_level(self.compression_level)
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format,
            log_dir: self.log_dir.clone(),
            ..LoggingConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serial_test::serial;
    use tempfile::tempdir;

    use super::*;

    const VARS: [&str; 5] = [
        "NBTFILE_CONFIG",
        "NBTFILE_COMPRESSION",
        "NBTFILE_MAX_DEPTH",
        "NBTFILE_LOG_FORMAT",
        "NBTFILE_COMPRESSION_LEVEL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let settings = Settings::load().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.decode_options(), DecodeOptions::default());
        assert!(settings.codec().is_none());
    }

    #[test]
    #[serial]
    fn test_env_overrides_defaults() {
        clear_env();
        env::set_var("NBTFILE_COMPRESSION", "zstd");
        env::set_var("NBTFILE_MAX_DEPTH", "64");
        env::set_var("NBTFILE_COMPRESSION_LEVEL", "9");
        let settings = Settings::load().unwrap();
        clear_env();

        assert_eq!(settings.compression, Compression::Zstd);
        assert_eq!(settings.max_depth, 64);
        assert_eq!(settings.compression_level, Some(9));
        assert_eq!(settings.codec().map(|c| c.name()), Some("zstd"));
    }

    /// Тест проверяет порядок источников: файл поверх умолчаний, окружение
    /// поверх файла.
    #[test]
    #[serial]
    fn test_file_then_env() {
        clear_env();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nbtfile.toml");
        fs::write(
            &path,
            "compression = \"gzip\"\nlog_format = \"json\"\nmax_array_len = 1024\n",
        )
        .unwrap();

        env::set_var("NBTFILE_CONFIG", &path);
        env::set_var("NBTFILE_LOG_FORMAT", "pretty");
        let settings = Settings::load().unwrap();
        clear_env();

        assert_eq!(settings.compression, Compression::Gzip);
        assert_eq!(settings.max_array_len, 1024);
        assert_eq!(settings.log_format, LogFormat::Pretty);
    }

    #[test]
    #[serial]
    fn test_invalid_values_rejected() {
        clear_env();
        env::set_var("NBTFILE_MAX_DEPTH", "0");
        let err = Settings::load().unwrap_err();
        clear_env();
        assert!(matches!(err, SettingsError::Invalid { key: "max_depth", .. }));

        env::set_var("NBTFILE_COMPRESSION", "brotli");
        let err = Settings::load().unwrap_err();
        clear_env();
        assert!(matches!(err, SettingsError::Load(_)));
    }

    /// Тест проверяет, что переопределения проходят ту же проверку, что и
    /// загруженные значения.
    #[test]
    fn test_overrides_are_validated() {
        let err = Settings::default()
            .with_overrides(None, Some(0), None)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "max_depth", .. }));

        let settings = Settings::default()
            .with_overrides(Some(Compression::Lz4), Some(16), Some(LogFormat::Json))
            .unwrap();
        assert_eq!(settings.compression, Compression::Lz4);
        assert_eq!(settings.max_depth, 16);
        assert_eq!(settings.log_format, LogFormat::Json);

        let untouched = Settings::default().with_overrides(None, None, None).unwrap();
        assert_eq!(untouched.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    #[serial]
    fn test_missing_config_file_is_error() {
        clear_env();
        let dir = tempdir().unwrap();
        let err = Settings::load_from(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, SettingsError::Load(_)));
    }

    #[test]
    fn test_logging_config_follows_settings() {
        let settings = Settings {
            log_level: "debug".to_string(),
            log_format: LogFormat::Json,
            ..Settings::default()
        };
        let logging = settings.logging_config();
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);
        assert!(logging.log_dir.is_none());
    }
}
