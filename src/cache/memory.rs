//! In-memory explanation store.
//!
//! Backs `--explain` runs with caching disabled, and doubles as the
//! substitutable fake for the file store in tests. `flush` is a no-op;
//! nothing survives the process.

use super::{CacheError, ExplanationStore};
use parking_lot::Mutex;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl ExplanationStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock();
        match entries.get(key) {
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
        Ok(())
    }
}
