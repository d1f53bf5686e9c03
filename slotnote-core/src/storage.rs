//! Key-value string storage backing the note store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{SlotnoteError, SlotnoteResult};

/// A synchronous string store, keyed by name.
///
/// Reads of a missing key return `Ok(None)`. Writes replace the whole value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> SlotnoteResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> SlotnoteResult<()>;
}

// =============================================================================
// File-backed store
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> SlotnoteResult<Option<String>> {
        let path = self.path_for(key);

        if !path.exists() {
            return Ok(None);
        }

        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| SlotnoteError::PersistenceRead {
                key: key.to_string(),
                reason: format!("{}: {e}", path.display()),
            })
    }

    fn set(&mut self, key: &str, value: &str) -> SlotnoteResult<()> {
        let write_err = |e: std::io::Error, path: &Path| SlotnoteError::PersistenceWrite {
            key: key.to_string(),
            reason: format!("{}: {e}", path.display()),
        };

        std::fs::create_dir_all(&self.dir).map_err(|e| write_err(e, self.dir.as_path()))?;

        let path = self.path_for(key);
        let temp = self.dir.join(format!("{key}.json.tmp"));

        std::fs::write(&temp, value).map_err(|e| write_err(e, temp.as_path()))?;
        std::fs::rename(&temp, &path).map_err(|e| write_err(e, path.as_path()))?;

        tracing::debug!(key, path = %path.display(), bytes = value.len(), "wrote key");
        Ok(())
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// In-memory store, mainly for tests.
///
/// Counts successful writes and can be told to fail them.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `value` under `key`.
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> SlotnoteResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> SlotnoteResult<()> {
        if self.fail_writes {
            return Err(SlotnoteError::PersistenceWrite {
                key: key.to_string(),
                reason: "storage quota exceeded".to_string(),
            });
        }

        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
