//! Exclusive lock held for the duration of a release run.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};

/// Lock filename inside the release directory.
pub const LOCK_FILENAME: &str = ".release.lock";

/// An advisory lock on `<release_dir>/.release.lock`.
///
/// The lock is released when the value is dropped. The lock file itself is
/// left in place.
#[derive(Debug)]
pub struct ReleaseLock {
    file: File,
    path: Utf8PathBuf,
}

impl ReleaseLock {
    /// Take the lock without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ReleaseLocked`] if another process holds the
    /// lock, or [`PackagerError::Io`] if the lock file cannot be created.
    pub fn acquire(release_dir: &Utf8Path) -> Result<Self> {
        fs::create_dir_all(release_dir)?;
        let path = release_dir.join(LOCK_FILENAME);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        file.try_lock_exclusive()
            .map_err(|_| PackagerError::ReleaseLocked { path: path.clone() })?;

        log::debug!("acquired release lock {path}");
        Ok(Self { file, path })
    }

    /// Path to the lock file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for ReleaseLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            log::warn!("failed to release lock {}: {e}", self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_held() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");

        let held = ReleaseLock::acquire(&root).expect("first lock");
        assert!(held.path().ends_with(LOCK_FILENAME));

        let err = ReleaseLock::acquire(&root).expect_err("second lock must fail");
        assert!(matches!(err, PackagerError::ReleaseLocked { .. }));

        drop(held);
        ReleaseLock::acquire(&root).expect("lock is free again");
    }

    #[test]
    fn creates_missing_release_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        let releases = root.join("releases");

        let _lock = ReleaseLock::acquire(&releases).expect("lock");
        assert!(releases.join(LOCK_FILENAME).is_file());
    }
}
