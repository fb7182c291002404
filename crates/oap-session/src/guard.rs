//! One-shot reload suppression for a freshly created chat.
//!
//! Creating a chat makes it the selected chat. The selection path would then
//! reload it from the backend and clobber the optimistic log, so the creator
//! arms the guard and the first reload of that id is skipped. The marker
//! lives only as long as the send that armed it.

use std::sync::Mutex;

use oap_common::ChatId;

#[derive(Debug, Default)]
pub struct SessionGuard {
    armed: Mutex<Option<ChatId>>,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as just created locally. Replaces any previous marker.
    pub fn arm(&self, id: ChatId) {
        *self.armed.lock().unwrap_or_else(|e| e.into_inner()) = Some(id);
    }

    /// Returns `true` and clears the marker if it holds `id`; otherwise leaves it.
    pub fn consume_if_matches(&self, id: &ChatId) -> bool {
        let mut armed = self.armed.lock().unwrap_or_else(|e| e.into_inner());
        if armed.as_ref() == Some(id) {
            *armed = None;
            true
        } else {
            false
        }
    }

    /// Drop any marker.
    pub fn release(&self) {
        *self.armed.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Release the marker when the returned value is dropped.
    pub(crate) fn release_on_drop(&self) -> Release<'_> {
        Release { guard: self }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

pub(crate) struct Release<'a> {
    guard: &'a SessionGuard,
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        self.guard.release();
    }
}
