//! Session state and the busy guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::AiError;

/// Where a session is in its request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

/// Guard that clears the `busy` flag on drop, ensuring it is always released
/// even if the future is dropped or an early return occurs.
pub(crate) struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    /// Attempt to acquire the busy flag. Returns `AiError::Busy` if already held.
    pub(crate) fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, AiError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(AiError::Busy);
        }
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
