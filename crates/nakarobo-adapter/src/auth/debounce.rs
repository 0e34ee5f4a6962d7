/*
[INPUT]:  A delay and a task to run once it elapses
[OUTPUT]: Delayed task execution that can be cancelled before it fires
[POS]:    Auth layer - disconnect debounce
[UPDATE]: When changing timer semantics (re-arm, restart, cancellation)
*/

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Cancellable one-shot delayed task
///
/// Arming an already armed timer keeps the original deadline. A task only
/// runs if its delay elapses without `cancel` being called.
#[derive(Debug, Default)]
pub struct DebounceTimer {
    pending: Mutex<Option<CancellationToken>>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run after `delay`. Returns false if already armed.
    pub fn arm<F, Fut>(&self, delay: Duration, task: F) -> bool
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.as_ref().is_some_and(|token| !token.is_cancelled()) {
            return false;
        }

        let token = CancellationToken::new();
        *pending = Some(token.clone());
        drop(pending);

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // Mark as spent before running so the timer can be re-armed.
                    token.cancel();
                    task().await;
                }
            }
        });
        true
    }

    /// Cancel the pending task. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match pending {
            Some(token) if !token.is_cancelled() => {
                token.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
