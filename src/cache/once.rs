//! Single-fire completion guard shared by the writer's close and discard paths.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// Callback invoked when a writer's lifecycle ends.
pub type EndFn = Box<dyn FnOnce() + Send + 'static>;

// == Fire Once ==
/// Runs a callback at most once, no matter how many callers race to fire it.
pub struct FireOnce {
    fired: AtomicBool,
    callback: Mutex<Option<EndFn>>,
}

impl FireOnce {
    pub fn new(callback: EndFn) -> Self {
        Self {
            fired: AtomicBool::new(false),
            callback: Mutex::new(Some(callback)),
        }
    }

    /// Returns true if this call was the one that fired the guard.
    pub fn fire(&self) -> bool {
        if self
            .fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        let callback = self.callback.lock().take();
        if let Some(callback) = callback {
            callback();
        }
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for FireOnce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FireOnce")
            .field("fired", &self.has_fired())
            .finish()
    }
}
