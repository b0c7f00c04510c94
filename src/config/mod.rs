//! Настройки приложения (`config`): значения по умолчанию, файл,
//! переменные окружения `NBTFILE_*`.

pub mod settings;

pub use settings::{Settings, SettingsError, CONFIG_PATH_ENV, ENV_PREFIX};
