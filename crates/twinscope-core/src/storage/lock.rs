use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{CoreError, Result};

/// Single-entry guard for a detection run.
///
/// Holds an exclusive advisory lock on the lock file. The OS drops the lock
/// when the file handle closes, including when the process is killed, so a
/// leftover file from a dead run never blocks the next one.
#[derive(Debug)]
pub struct LibraryLock {
    path: PathBuf,
    file: File,
}

impl LibraryLock {
    /// Take the lock, failing with `CoreError::LibraryLocked` if another run
    /// holds it.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        if file.try_lock_exclusive().is_err() {
            let mut owner = String::new();
            let _ = file.read_to_string(&mut owner);
            let owner = owner.trim();
            let holder = if owner.is_empty() {
                path.display().to_string()
            } else {
                format!("{} (pid {owner})", path.display())
            };
            return Err(CoreError::LibraryLocked(holder));
        }

        let lock = Self {
            path: path.to_path_buf(),
            file,
        };
        lock.record_owner()?;
        tracing::debug!("acquired {}", lock.path.display());
        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record_owner(&self) -> Result<()> {
        let mut file = &self.file;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        writeln!(file, "{}", std::process::id())?;
        Ok(())
    }
}

impl Drop for LibraryLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("failed to release lock {}: {e}", self.path.display());
        }
    }
}
