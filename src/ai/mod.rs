//! Language-model backends and the cached remediation service.
//!
//! [`AiCompletion`] wraps one provider call per invocation; it never
//! retries and never consults the cache. [`RemediationService`] composes a
//! backend with an [`crate::cache::ExplanationStore`] so identical prompts
//! are answered from disk instead of the network.

mod openai;
mod remediation;

pub use openai::OpenAiClient;
pub use remediation::RemediationService;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the language-model provider.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the provider
        message: String,
    },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("invalid or missing API credentials")]
    Unauthorized,

    #[error("rate limit exceeded - please try again later")]
    RateLimited,

    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code (5xx)
        status: u16,
        message: String,
    },

    /// The response carried no candidate completions.
    #[error("completion response contained no choices")]
    EmptyResponse,

    /// Client construction was attempted without credentials.
    #[error("no API key provided")]
    MissingCredentials,

    #[error("explanation request cancelled")]
    Cancelled,
}

/// One language-model backend, stateless aside from its configured model
/// and target language.
///
/// `complete` issues exactly one provider request per call and propagates
/// provider failures untouched; deduplicating semantically identical
/// prompts is the remediation service's job.
#[async_trait]
pub trait AiCompletion: Send + Sync {
    /// Stable backend identifier, used as the cache-key prefix.
    fn name(&self) -> &'static str;

    async fn complete(&self, input: &str) -> Result<String, AiError>;
}
