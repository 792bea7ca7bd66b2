//! Cumulative byte counter with throttled reporting.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use edream_core::{ProgressReporter, TransferProgress};
use tracing::warn;

use super::throttle::ProgressThrottle;

#[derive(Debug)]
struct TrackerState {
    transferred: u64,
    throttle: ProgressThrottle,
}

/// Progress of one transfer.
///
/// Shared between the engine and the body stream that counts bytes as they
/// are handed to the HTTP client. A reporter that errors or panics is logged
/// and otherwise ignored.
pub struct ProgressTracker {
    reporter: Option<Arc<dyn ProgressReporter>>,
    total: u64,
    state: Mutex<TrackerState>,
}

impl ProgressTracker {
    pub fn new(
        reporter: Option<Arc<dyn ProgressReporter>>,
        total: u64,
        interval: Duration,
    ) -> Self {
        Self {
            reporter,
            total,
            state: Mutex::new(TrackerState {
                transferred: 0,
                throttle: ProgressThrottle::new(interval),
            }),
        }
    }

    /// A tracker that counts bytes but never reports.
    pub fn silent(total: u64) -> Self {
        Self::new(None, total, Duration::ZERO)
    }

    pub const fn total(&self) -> u64 {
        self.total
    }

    pub fn transferred(&self) -> u64 {
        self.lock().transferred
    }

    /// Count `bytes` more and report if the throttle allows.
    pub fn advance(&self, bytes: u64) {
        let snapshot = {
            let mut state = self.lock();
            state.transferred = state.transferred.saturating_add(bytes);
            (self.reporter.is_some() && state.throttle.should_emit())
                .then(|| TransferProgress::new(state.transferred, self.total))
        };
        if let Some(progress) = snapshot {
            self.deliver(progress);
        }
    }

    /// Reset the counter to `transferred`, discarding bytes of a failed attempt.
    ///
    /// The reporting interval keeps running across the rewind.
    pub fn rewind_to(&self, transferred: u64) {
        self.lock().transferred = transferred;
    }

    /// Report the exact total, bypassing the throttle.
    pub fn finish(&self) {
        self.lock().transferred = self.total;
        if self.reporter.is_some() {
            self.deliver(TransferProgress::new(self.total, self.total));
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TrackerState> {
        // Reporters run outside the lock.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver(&self, progress: TransferProgress) {
        let Some(reporter) = &self.reporter else {
            return;
        };
        match catch_unwind(AssertUnwindSafe(|| reporter.report(progress))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(
                transferred = progress.transferred,
                total = progress.total,
                error = %e,
                "Progress callback failed; continuing"
            ),
            Err(_) => warn!(
                transferred = progress.transferred,
                total = progress.total,
                "Progress callback panicked; continuing"
            ),
        }
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("total", &self.total)
            .field("transferred", &self.transferred())
            .field("reporting", &self.reporter.is_some())
            .finish()
    }
}
