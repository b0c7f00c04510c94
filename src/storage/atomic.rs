//! Атомарная замена файла через временный файл рядом с ним.
//!
//! Протокол:
//! 1. удалить устаревший `<dest>.tmp`, оставшийся после сбоя;
//! 2. записать данные в `<dest>.tmp`, `flush` + `fsync`;
//! 3. `rename` поверх `<dest>`.
//!
//! До шага 3 целевой файл не меняется. Временный файл удаляется на любом
//! пути выхода, кроме успешного `commit`.

use std::{
    ffi::OsString,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use nbtfile_error::{NbtError, NbtResult};
use tracing::{debug, trace, warn};

/// Суффикс временного файла.
pub const TMP_SUFFIX: &str = ".tmp";

/// Путь временного файла для `dest`: `<dest>.tmp`.
pub fn tmp_path_for(dest: &Path) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

/// Данные, записанные во временный файл и ожидающие `commit`.
///
/// Если значение уничтожено без `commit`, временный файл удаляется.
#[derive(Debug)]
pub struct StagedWrite {
    dest: PathBuf,
    tmp: PathBuf,
    len: u64,
    committed: bool,
}

impl StagedWrite {
    /// Фаза записи: удаляет устаревший временный файл, пишет `data` в
    /// `<dest>.tmp` и синхронизирует его с диском.
    pub fn prepare(
        dest: impl AsRef<Path>,
        data: &[u8],
    ) -> NbtResult<Self> {
        let dest = dest.as_ref().to_path_buf();
        let tmp = tmp_path_for(&dest);
        remove_stale(&tmp)?;

        let stage = Self {
            dest,
            tmp,
            len: data.len() as u64,
            committed: false,
        };
        // при ошибке `stage` уничтожается и убирает частичный файл
        stage
            .write_tmp(data)
            .map_err(|e| NbtError::io_at(e, stage.tmp.display().to_string()))?;
        trace!(tmp = %stage.tmp.display(), bytes = stage.len, "staged write");
        Ok(stage)
    }

    /// Фаза публикации: атомарно переименовывает временный файл в целевой.
    pub fn commit(mut self) -> NbtResult<()> {
        fs::rename(&self.tmp, &self.dest)
            .map_err(|e| NbtError::io_at(e, self.dest.display().to_string()))?;
        self.committed = true;
        sync_parent_dir(&self.dest);
        debug!(path = %self.dest.display(), bytes = self.len, "atomic write committed");
        Ok(())
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    pub fn tmp_path(&self) -> &Path {
        &self.tmp
    }

    /// Размер подготовленных данных в байтах.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn write_tmp(
        &self,
        data: &[u8],
    ) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.tmp)?;
        file.write_all(data)?;
        file.flush()?;
        file.sync_all()
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match fs::remove_file(&self.tmp) {
            Ok(()) => trace!(tmp = %self.tmp.display(), "discarded staged write"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                tmp = %self.tmp.display(),
                error = %e,
                "failed to remove temporary file"
            ),
        }
    }
}

/// Записывает `data` в `dest` атомарно.
pub fn write_atomic(
    dest: impl AsRef<Path>,
    data: &[u8],
) -> NbtResult<()> {
    StagedWrite::prepare(dest, data)?.commit()
}

fn remove_stale(tmp: &Path) -> NbtResult<()> {
    match fs::remove_file(tmp) {
        Ok(()) => {
            warn!(tmp = %tmp.display(), "removed stale temporary file from an interrupted save");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(NbtError::io_at(e, tmp.display().to_string())),
    }
}

/// Синхронизирует каталог, чтобы переименование пережило сбой питания.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    let Some(dir) = path.parent() else {
        return;
    };
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        debug!(dir = %dir.display(), error = %e, "directory sync skipped");
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}
