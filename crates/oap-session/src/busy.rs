//! Busy flag guard.

use std::sync::atomic::{AtomicBool, Ordering};

use oap_common::ChatError;

/// Clears the `busy` flag on drop, so it is released on early return or cancellation.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to acquire the flag. Returns [`ChatError::Busy`] if already held.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self, ChatError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(ChatError::Busy);
        }
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
