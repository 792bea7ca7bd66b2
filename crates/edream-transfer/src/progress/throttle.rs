//! Progress throttling.
//!
//! Bounds how often a reporter is invoked on fast links.

use std::time::{Duration, Instant};

/// Minimum-interval gate for progress callbacks.
///
/// The first check always passes. A zero interval lets every check pass.
/// The gate only remembers when it last opened, so rewinding the byte count
/// on a retry does not reopen it early.
#[derive(Debug)]
pub struct ProgressThrottle {
    interval: Duration,
    opened_at: Option<Instant>,
}

impl ProgressThrottle {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            opened_at: None,
        }
    }

    /// Whether the reporter may be invoked now.
    pub fn should_emit(&mut self) -> bool {
        self.should_emit_at(Instant::now())
    }

    /// Whether the reporter may be invoked at `now`; records `now` when it may.
    pub fn should_emit_at(&mut self, now: Instant) -> bool {
        let open = self
            .opened_at
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if open {
            self.opened_at = Some(now);
        }
        open
    }
}
