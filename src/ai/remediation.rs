//! Cached remediation text for findings.
//!
//! Composes an [`AiCompletion`] backend with an [`ExplanationStore`]: cache
//! hits are decoded and replayed deterministically; misses fall through to
//! exactly one provider call, and the result is written back and flushed.
//! A cache that cannot be read degrades to a miss, and a cache that cannot
//! be written degrades to a warning; neither ever discards a computed
//! response.

use super::{AiCompletion, AiError};
use crate::cache::{cache_key, decode_value, encode_value, ExplanationStore};
use crate::common::cancel::CancelToken;
use std::sync::Arc;

pub struct RemediationService {
    client: Arc<dyn AiCompletion>,
    store: Arc<dyn ExplanationStore>,
}

impl RemediationService {
    pub fn new(client: Arc<dyn AiCompletion>, store: Arc<dyn ExplanationStore>) -> Self {
        Self { client, store }
    }

    /// Produce remediation text for the given prompt fragments.
    ///
    /// Fragments are joined with a single space, order-preserving; callers
    /// must pass them in a stable order since the joined string is the
    /// cache identity. With `no_cache` the provider is always consulted and
    /// the stored entry for this key is overwritten on success; that is the
    /// only mutation path besides first-write.
    pub async fn explain(
        &self,
        fragments: &[String],
        no_cache: bool,
        cancel: &CancelToken,
    ) -> Result<String, AiError> {
        let input = fragments.join(" ");
        let key = cache_key(self.client.name(), &input);

        if !no_cache {
            if let Some(stored) = self.store.get(&key) {
                match decode_value(&stored) {
                    Ok(text) => {
                        log::debug!("explanation cache hit for {}", key);
                        return Ok(text);
                    }
                    // Corruption degrades to a miss: refetch below.
                    Err(err) => log::warn!("discarding cache entry {}: {}", key, err),
                }
            }
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AiError::Cancelled),
            result = self.client.complete(&input) => result?,
        };

        self.store.set(&key, &encode_value(&response), no_cache);
        if let Err(err) = self.store.flush() {
            // The computed text is still returned; only persistence failed.
            log::warn!("explanation will not survive restart: {}", err);
        }

        Ok(response)
    }
}
