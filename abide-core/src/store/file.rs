//! File-backed store persisting each key to its own JSON file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError, StoreKey};

const IMPORT_LOCK_FILE: &str = "import.lock";

/// Storage for the application's keys.
///
/// Handles loading and saving values to the filesystem.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Creates a new store rooted at `data_dir`.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path for a key.
    pub fn path(&self, key: StoreKey) -> PathBuf {
        self.data_dir.join(key.filename())
    }

    /// Checks if a value exists on disk.
    pub fn exists(&self, key: StoreKey) -> bool {
        self.path(key).exists()
    }

    /// Takes the exclusive import lock for this data directory.
    ///
    /// Fails with [`StoreError::Locked`] while another import holds it. The
    /// lock is released when the returned guard is dropped.
    pub fn lock_import(&self) -> Result<ImportLock, StoreError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StoreError::Io(self.data_dir.clone(), e))?;

        let path = self.data_dir.join(IMPORT_LOCK_FILE);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(_) => Ok(ImportLock { path }),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(StoreError::Locked(path)),
            Err(e) => Err(StoreError::Io(path, e)),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        let path = self.path(key);

        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(path, e)),
        }
    }

    /// Writes the value next to its final path and renames it into place,
    /// so a failed write leaves the previous value intact.
    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StoreError::Io(self.data_dir.clone(), e))?;

        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value).map_err(|e| StoreError::Io(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Io(path, e))?;

        Ok(())
    }
}

/// Guard for an in-progress import. Removes the lock file on drop.
#[derive(Debug)]
pub struct ImportLock {
    path: PathBuf,
}

impl Drop for ImportLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove import lock {}: {}", self.path.display(), e);
        }
    }
}
