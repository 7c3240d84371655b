use std::pin::pin;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Why an operation was cancelled. `UserRequestedFallback` is not a failure:
/// it tells the engine to surface a fallback signal instead of an abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    Explicit,
    Timeout,
    UserRequestedFallback,
}

#[derive(Default)]
struct AbortInner {
    reason: Mutex<Option<AbortReason>>,
    notify: Notify,
}

/// Explicit cancellation token shared between a caller, the client engine and
/// the authenticator. Cloning yields handles to the same token; the first
/// abort wins and its reason sticks.
#[derive(Clone, Default)]
pub struct AbortController {
    inner: Arc<AbortInner>,
}

impl AbortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self, reason: AbortReason) {
        let mut guard = self.inner.reason.lock().unwrap();
        if guard.is_none() {
            *guard = Some(reason);
            self.inner.notify.notify_waiters();
        }
    }

    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[derive(Clone)]
pub struct AbortSignal {
    inner: Arc<AbortInner>,
}

impl AbortSignal {
    pub fn is_aborted(&self) -> bool {
        self.inner.reason.lock().unwrap().is_some()
    }

    pub fn reason(&self) -> Option<AbortReason> {
        *self.inner.reason.lock().unwrap()
    }

    /// Resolve once the token is aborted. Usable inside `tokio::select!` to
    /// race cancellation against long-running work.
    pub async fn aborted(&self) {
        let mut notified = pin!(self.inner.notify.notified());
        notified.as_mut().enable();
        if self.is_aborted() {
            return;
        }
        notified.await;
    }
}
