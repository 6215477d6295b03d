//! Virtual clock

use std::sync::atomic::{AtomicU64, Ordering};

use eqpt_if::Clock;

/// A clock whose time only moves when something sleeps on it.
///
/// Sleeping returns immediately after advancing the time, so timeouts and
/// debounce windows can be exercised without waiting for them.
#[derive(Debug, Default)]
pub struct SimClock {
    now_ms: AtomicU64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without sleeping.
    pub fn advance(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    fn sleep_ms(&self, ms: u64) {
        self.advance(ms);
    }
}
