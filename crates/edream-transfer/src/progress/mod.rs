//! Progress tracking and throttling.
//!
//! A [`ProgressTracker`] accumulates transferred bytes for one upload or
//! download and forwards throttled snapshots to the caller's reporter.

mod throttle;
mod tracker;

pub use throttle::ProgressThrottle;
pub use tracker::ProgressTracker;
