use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::types::{AuthRequestType, PendingAuthRequest};
use super::AuthRequestError;

/// Short-lived holder for pending auth requests. Entries expire after the
/// TTL, are consumed at most once, and a new request of a flow type
/// supersedes any live request of the same type. This is the only state the
/// handshake keeps; everything else is per-call.
pub struct PendingRequestCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, PendingAuthRequest>>,
}

impl PendingRequestCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a pending request under its server-issued id, invalidating any
    /// live request of the same flow type.
    pub fn insert(&self, request: PendingAuthRequest) {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, existing| existing.request_type != request.request_type);
        entries.insert(request.id.clone(), request);
    }

    /// One-shot take. A second consume of the same id, or a consume after
    /// expiry, fails with `NotFound`.
    pub fn consume(&self, id: &str) -> Result<PendingAuthRequest, AuthRequestError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.remove(id) {
            Some(request) if request.created_at.elapsed() <= self.ttl => Ok(request),
            Some(_) => {
                tracing::info!(id = %id, "pending auth request expired");
                Err(AuthRequestError::NotFound)
            }
            None => Err(AuthRequestError::NotFound),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        let entries = self.entries.lock().unwrap();
        entries
            .get(id)
            .is_some_and(|r| r.created_at.elapsed() <= self.ttl)
    }

    /// Explicit clear, used on user cancellation and on stale-request
    /// detection during polling.
    pub fn clear(&self, request_type: AuthRequestType) {
        self.entries
            .lock()
            .unwrap()
            .retain(|_, existing| existing.request_type != request_type);
    }
}
