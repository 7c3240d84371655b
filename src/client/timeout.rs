use std::time::Duration;

use super::types::UserVerification;
use crate::abort::{AbortController, AbortReason};

const NO_VERIFICATION_DEFAULT_MS: u64 = 120_000;
const NO_VERIFICATION_MIN_MS: u64 = 30_000;
const NO_VERIFICATION_MAX_MS: u64 = 180_000;

const WITH_VERIFICATION_DEFAULT_MS: u64 = 300_000;
const WITH_VERIFICATION_MIN_MS: u64 = 30_000;
const WITH_VERIFICATION_MAX_MS: u64 = 600_000;

/// Clamp a caller-supplied timeout to the range allowed for the requested
/// user-verification level. Out-of-range values are clamped, never rejected.
pub(crate) fn clamp_timeout(
    user_verification: Option<UserVerification>,
    requested_ms: Option<u64>,
) -> Duration {
    let ms = if user_verification == Some(UserVerification::Required) {
        requested_ms
            .unwrap_or(WITH_VERIFICATION_DEFAULT_MS)
            .clamp(WITH_VERIFICATION_MIN_MS, WITH_VERIFICATION_MAX_MS)
    } else {
        requested_ms
            .unwrap_or(NO_VERIFICATION_DEFAULT_MS)
            .clamp(NO_VERIFICATION_MIN_MS, NO_VERIFICATION_MAX_MS)
    };
    Duration::from_millis(ms)
}

/// A timeout is a scheduled cancellation of the shared abort token, not a
/// separate error path. The guard disarms the timer when cleared or dropped.
pub(crate) struct TimeoutGuard {
    handle: tokio::task::JoinHandle<()>,
}

impl TimeoutGuard {
    pub(crate) fn clear(self) {}
}

impl Drop for TimeoutGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub(crate) fn arm_abort_timeout(
    abort: &AbortController,
    user_verification: Option<UserVerification>,
    requested_ms: Option<u64>,
) -> TimeoutGuard {
    let duration = clamp_timeout(user_verification, requested_ms);
    let abort = abort.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        tracing::info!(timeout_ms = duration.as_millis() as u64, "operation timed out");
        abort.abort(AbortReason::Timeout);
    });
    TimeoutGuard { handle }
}
