use tracing_subscriber::EnvFilter;

use super::{LoggingConfig, LoggingError};

/// Фильтр событий: `RUST_LOG`, если задан, иначе директива из конфигурации.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = config.build_filter_directive();
    EnvFilter::try_new(&directive).map_err(|e| LoggingError::InvalidFilter {
        directive,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_filter_from_config() {
        env::remove_var("RUST_LOG");
        let filter = build_filter(&LoggingConfig::default()).unwrap();
        assert!(filter.to_string().contains("nbtfile=info"));
    }

    #[test]
    #[serial]
    fn test_rust_log_wins() {
        env::set_var("RUST_LOG", "trace");
        let filter = build_filter(&LoggingConfig::default());
        env::remove_var("RUST_LOG");
        assert_eq!(filter.unwrap().to_string(), "trace");
    }

    #[test]
    #[serial]
    fn test_invalid_level_is_error() {
        env::remove_var("RUST_LOG");
        let cfg = LoggingConfig {
            level: "[broken".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            build_filter(&cfg),
            Err(LoggingError::InvalidFilter { .. })
        ));
    }
}
