//! Persistent cache for language-model responses.
//!
//! Keys are content-addressed: the producing client's name plus the
//! base64-encoded prompt bytes, so identical prompts sent to different
//! backends never collide. Values are stored base64-encoded; an entry that
//! fails to decode is treated as absent (the caller refetches) rather than
//! surfaced as an error.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by cache persistence.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The store could not be written back to disk. The computed value is
    /// still valid; only persistence failed.
    #[error("failed to persist explanation cache to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize explanation cache: {0}")]
    Serialize(String),

    /// A stored value failed to decode.
    #[error("corrupt cache entry: {0}")]
    Corrupt(String),
}

/// Flat key-to-string store for explanation text.
///
/// `get` of an unset key returns `None`, never an error. `set` of an
/// already-set key is a no-op unless `overwrite` is passed; the first write
/// and an explicit overwrite are the only mutation paths. `flush` persists
/// pending writes synchronously and must be called after every `set` the
/// caller wants to survive a process restart.
pub trait ExplanationStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str, overwrite: bool);
    fn flush(&self) -> Result<(), CacheError>;
}

/// Derive the cache key for a prompt produced by the named client.
///
/// The prompt bytes are base64-encoded so the key is safe to use as a flat
/// config-file identifier; the client-name prefix keeps different backends
/// from colliding on identical prompt text.
pub fn cache_key(client: &str, prompt: &str) -> String {
    format!("{}:{}", client, BASE64.encode(prompt.as_bytes()))
}

/// Encode response text for storage.
pub fn encode_value(text: &str) -> String {
    BASE64.encode(text.as_bytes())
}

/// Decode a stored value back into response text.
pub fn decode_value(stored: &str) -> Result<String, CacheError> {
    let bytes = BASE64
        .decode(stored.as_bytes())
        .map_err(|e| CacheError::Corrupt(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CacheError::Corrupt(e.to_string()))
}
