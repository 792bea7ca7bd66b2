//! Progress reporting capability.
//!
//! Uploads and downloads report progress through a caller-supplied
//! [`ProgressReporter`]. A reporter that fails (returns an error or panics)
//! never aborts the transfer; the engine logs the failure and carries on.

use std::fmt;

/// Error type a progress reporter may return.
pub type ProgressError = Box<dyn std::error::Error + Send + Sync>;

/// Snapshot of a transfer's progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferProgress {
    /// Bytes transferred so far.
    pub transferred: u64,
    /// Total bytes of the transfer.
    pub total: u64,
    /// `transferred / total * 100`; an empty transfer counts as complete.
    pub percent: f64,
}

impl TransferProgress {
    /// Build a snapshot, computing the percentage.
    #[allow(clippy::cast_precision_loss)] // Byte counts are far below 2^52 in practice
    pub fn new(transferred: u64, total: u64) -> Self {
        let percent = if total == 0 {
            100.0
        } else {
            transferred as f64 / total as f64 * 100.0
        };
        Self {
            transferred,
            total,
            percent,
        }
    }

    /// Whether every byte has been transferred.
    pub const fn is_complete(&self) -> bool {
        self.transferred >= self.total
    }
}

/// Receives progress updates for a transfer.
///
/// Implementations should return quickly; they are called inline on the
/// transfer path (throttled to the configured interval).
pub trait ProgressReporter: Send + Sync {
    /// Handle one progress update.
    fn report(&self, progress: TransferProgress) -> Result<(), ProgressError>;
}

/// Adapter turning a closure into a [`ProgressReporter`].
pub struct ProgressFn<F>(F);

impl<F> ProgressFn<F>
where
    F: Fn(TransferProgress) -> Result<(), ProgressError> + Send + Sync,
{
    /// Wrap a closure.
    pub const fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F> ProgressReporter for ProgressFn<F>
where
    F: Fn(TransferProgress) -> Result<(), ProgressError> + Send + Sync,
{
    fn report(&self, progress: TransferProgress) -> Result<(), ProgressError> {
        (self.0)(progress)
    }
}

impl<F> fmt::Debug for ProgressFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProgressFn")
    }
}

/// A reporter that discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressReporter;

impl ProgressReporter for NoopProgressReporter {
    fn report(&self, _progress: TransferProgress) -> Result<(), ProgressError> {
        Ok(())
    }
}
