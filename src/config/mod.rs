pub mod types;

pub use types::Config;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".kube-medic.toml";

/// Get the global config file path (~/.kube-medic.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Default location for the persisted explanation cache.
pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kube-medic")
        .join("explanations.toml")
}

/// Load configuration from file or use defaults.
///
/// An explicit path must parse; otherwise the global config is tried and
/// any problem falls back to defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParsingFailed(format!("{}: {}", path.display(), e)))?;
        return Ok(config);
    }

    if let Some(global) = global_config_path() {
        if global.exists() {
            if let Ok(content) = fs::read_to_string(&global) {
                if let Ok(config) = toml::from_str(&content) {
                    return Ok(config);
                }
            }
        }
    }

    Ok(Config::default())
}

impl Config {
    /// The cache file location, honoring the `[cache] path` override.
    pub fn cache_path(&self) -> PathBuf {
        self.cache.path.clone().unwrap_or_else(default_cache_path)
    }
}
