//! # Health State
//!
//! Process-wide liveness and readiness flags backing the Kubernetes probes.
//!
//! - `alive` starts true and is only cleared when the startup warm-up fails.
//! - `ready` starts false and flips to true exactly once, after the model has
//!   been loaded and a warm-up inference has succeeded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

#[derive(Debug)]
pub struct HealthState {
    alive: AtomicBool,
    ready: AtomicBool,
    started_at: Instant,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            alive: AtomicBool::new(true),
            ready: AtomicBool::new(false),
            started_at: Instant::now(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// NOT_READY → READY. Returns true only for the call that made the transition.
    pub fn mark_ready(&self) -> bool {
        self.ready
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// The process can no longer serve and should be restarted
    pub fn mark_not_alive(&self) {
        self.alive.store(false, Ordering::Release);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
