//! Crate-wide error types.
//!
//! Each subsystem defines its own `thiserror` enum (`ClusterError`,
//! `AiError`, `CacheError`); this module folds them into the top-level
//! [`Error`] used by handlers and `main`.

use thiserror::Error;

use crate::ai::AiError;
use crate::analysis::Cancelled;
use crate::cache::CacheError;
use crate::cluster::ClusterError;

/// Top-level error type for the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration problems, fatal at startup.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cluster client could not be built or a whole-check list call failed.
    #[error("cluster error: {0}")]
    Cluster(#[from] ClusterError),

    /// The language-model provider call failed.
    #[error("AI backend error: {0}")]
    Ai(#[from] AiError),

    /// The explanation cache could not be persisted.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// The analysis run was cancelled before all analyzers completed.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two analyzers registered under the same name.
    #[error("analyzer `{0}` is already registered")]
    DuplicateAnalyzer(String),

    /// Explanations were requested but no credentials are available.
    #[error("no API key configured - pass --api-key, set OPENAI_API_KEY, or add `api_key` to the [ai] section of .kube-medic.toml")]
    MissingApiKey,

    #[error("failed to parse configuration: {0}")]
    ParsingFailed(String),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
