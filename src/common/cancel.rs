//! Cooperative cancellation for long-running operations.
//!
//! The engine run and the explanation call both accept a [`CancelToken`];
//! the owning side keeps the [`CancelHandle`] and fires it once (typically
//! from a ctrl-c handler). Tokens are clonable and shared across
//! concurrently running analyzers.

use tokio::sync::watch;

/// Sending half: calling [`CancelHandle::cancel`] wakes every token.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Receiving half, handed to cancellable operations.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Create a connected handle/token pair.
    pub fn new() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelToken { rx })
    }

    /// A token that can never fire, for callers without a cancellation source.
    pub fn never() -> CancelToken {
        let (_, token) = Self::new();
        token
    }

    /// Whether cancellation has already been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested. If the handle is dropped
    /// without cancelling, this future stays pending forever, so it is only
    /// safe inside a `select!`.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                // Handle dropped without firing: nothing can cancel us anymore.
                std::future::pending::<()>().await;
            }
        }
    }
}
