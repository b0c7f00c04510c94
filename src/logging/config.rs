use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Формат консольного вывода.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Конфигурация логирования.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Уровень для крейтов `nbtfile` (`trace`..`error`); `RUST_LOG` важнее.
    pub level: String,
    pub format: LogFormat,
    pub console_enabled: bool,
    pub with_ansi: bool,
    pub with_target: bool,
    /// Каталог для ежедневно ротируемого файла; `None` отключает файл.
    pub log_dir: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            console_enabled: true,
            with_ansi: true,
            with_target: false,
            log_dir: None,
            file_prefix: "nbtfile.log".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Директива `EnvFilter`: сторонние крейты только `warn`, свои на
    /// заданном уровне.
    pub fn build_filter_directive(&self) -> String {
        let level = self.level.trim();
        format!("warn,nbtfile={level},nbtfile_cli={level}")
    }

    pub fn file_enabled(&self) -> bool {
        self.log_dir.is_some()
    }
}
