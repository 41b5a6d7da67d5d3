//! # Cart Storage
//!
//! Key-value persistence port used by the cart store, plus two adapters:
//! an in-memory map and a directory of JSON files.

use crate::error::{CartError, CartResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use uuid::Uuid;

/// Scoped key-value storage for serialized cart data.
///
/// Calls are synchronous; a successful `save` means the value is written.
pub trait CartStorage: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    fn save(&self, key: &str, value: &str) -> CartResult<()>;

    /// Load the value under `key`, `None` if nothing was stored
    fn load(&self, key: &str) -> CartResult<Option<String>>;
}

/// Type alias for shared storage
pub type BoxedCartStorage = Arc<dyn CartStorage>;

/// Process-local storage. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn save(&self, key: &str, value: &str) -> CartResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> CartResult<Option<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }
}

/// One `<key>.json` file per key inside a directory.
///
/// Writes land in a temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl CartStorage for FileStorage {
    fn save(&self, key: &str, value: &str) -> CartResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            CartError::Storage(format!("creating {}: {}", self.dir.display(), e))
        })?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));

        fs::write(&tmp, value)
            .map_err(|e| CartError::Storage(format!("writing {}: {}", tmp.display(), e)))?;

        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(CartError::Storage(format!(
                "replacing {}: {}",
                path.display(),
                e
            )));
        }

        debug!(path = %path.display(), bytes = value.len(), "Saved cart data");
        Ok(())
    }

    fn load(&self, key: &str) -> CartResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CartError::Storage(format!(
                "reading {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
