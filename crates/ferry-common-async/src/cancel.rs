//! Cooperative cancellation.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

struct Inner {
    cancelled: AtomicBool,
    notify: watch::Sender<bool>,
}

/// A cancellation signal shared between the party that fires it and the
/// loops that poll it.
///
/// Clones observe the same signal. Firing is one-way: once cancelled, a
/// token stays cancelled.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    /// Create a new, unfired token.
    pub fn new() -> Self {
        let (notify, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                notify,
            }),
        }
    }

    /// A token for callers that never cancel.
    ///
    /// No other handle to it exists, so it can never fire.
    pub fn never() -> Self {
        Self::new()
    }

    /// Fire the signal. Calling it again is a no-op.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.send_replace(true);
        }
    }

    /// Non-blocking check: has the signal fired?
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Wait until the signal fires.
    pub async fn cancelled(&self) {
        let mut rx = self.inner.notify.subscribe();
        // The sender lives in `inner`, which `self` keeps alive.
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
