//! TOML-file-backed explanation store.
//!
//! The whole store is a flat key-to-string table written back to disk on
//! every flush. One process owns one cache file; there is no cross-process
//! locking. A write lock is held for the duration of a flush so concurrent
//! `set` + `flush` pairs for different keys cannot corrupt each other's
//! writes.

use super::{CacheError, ExplanationStore};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or create) the store backing file.
    ///
    /// An unreadable or unparseable file degrades to an empty store with a
    /// warning: the cache is best-effort and must never block an analysis
    /// run.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<BTreeMap<String, String>>(&content) {
                Ok(map) => map,
                Err(err) => {
                    log::warn!(
                        "ignoring unparseable explanation cache at {}: {}",
                        path.display(),
                        err
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                log::warn!(
                    "ignoring unreadable explanation cache at {}: {}",
                    path.display(),
                    err
                );
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl ExplanationStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock();
        match entries.get(key) {
            // A found-but-empty value means the store was corrupted at write
            // time; report a miss so the caller fetches fresh text.
            Some(value) if value.is_empty() => None,
            Some(value) => Some(value.clone()),
            None => None,
        }
    }

    fn set(&self, key: &str, value: &str, overwrite: bool) {
        let mut entries = self.entries.lock();
        if overwrite || !entries.contains_key(key) {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn flush(&self) -> Result<(), CacheError> {
        let entries = self.entries.lock();
        let content = toml::to_string_pretty(&*entries)
            .map_err(|e| CacheError::Serialize(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CacheError::Persist {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, content).map_err(|source| CacheError::Persist {
            path: self.path.clone(),
            source,
        })
    }
}
