use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;

/// Handle для управления жизненным циклом логирования.
///
/// Держит guard файлового приёмника: пока handle жив, записи в файл
/// сбрасываются фоновым потоком. Должен жить до конца `main`.
pub struct LoggingHandle {
    _file_guard: Option<WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingHandle {
    pub fn new(
        file_guard: Option<WorkerGuard>,
        log_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            _file_guard: file_guard,
            log_dir,
        }
    }

    /// Handle без файлового приёмника.
    pub fn console_only() -> Self {
        Self::new(None, None)
    }

    pub fn has_file_sink(&self) -> bool {
        self._file_guard.is_some()
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    /// Завершает логирование, дописывая буферизованные записи в файл.
    pub fn shutdown(self) {
        tracing::debug!(file_sink = self.has_file_sink(), "logging shutdown");
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_only_handle() {
        let handle = LoggingHandle::console_only();
        assert!(!handle.has_file_sink());
        assert!(handle.log_dir().is_none());
        handle.shutdown();
    }
}
