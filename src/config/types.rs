use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// AI backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Backend identifier; only "openai" ships today.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier sent with every completion request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Target language for remediation text.
    #[serde(default = "default_language")]
    pub language: String,
    /// API key; the OPENAI_API_KEY environment variable takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            language: default_language(),
            api_key: None,
        }
    }
}

/// Explanation cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Disable to keep explanations in memory only.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Override the cache file location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_language() -> String {
    "english".to_string()
}

fn default_true() -> bool {
    true
}
