//! Monotonic time sources for observation windows.
//!
//! Samplers measure elapsed time in nanoseconds relative to their first
//! input. The [`Clock`] trait lets hosts and tests control that time base.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

/// A monotonic nanosecond time source.
pub trait Clock: Send + Sync {
    /// Nanoseconds since an arbitrary fixed origin. Never decreases.
    fn now_nanos(&self) -> u64;
}

/// Process-wide monotonic clock backed by [`Instant`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

fn origin() -> Instant {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    *ORIGIN.get_or_init(Instant::now)
}

impl Clock for MonotonicClock {
    #[inline]
    fn now_nanos(&self) -> u64 {
        origin().elapsed().as_nanos() as u64
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Jump to an absolute time. Must not go backwards.
    pub fn set(&self, nanos: u64) {
        let prev = self.nanos.swap(nanos, Ordering::SeqCst);
        debug_assert!(prev <= nanos, "ManualClock moved backwards");
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_nanos(&self) -> u64 {
        self.nanos.load(Ordering::SeqCst)
    }
}
