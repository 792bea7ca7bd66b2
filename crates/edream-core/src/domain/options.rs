//! Per-call upload options.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::ports::{ProgressFn, ProgressError, ProgressReporter, TransferProgress};

/// Default minimum time between two progress callback invocations.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Options recognised by an upload call.
///
/// Every field is optional. Which fields are actually sent to the backend is
/// decided by the resource type's profile, so setting `frame_number` on a
/// thumbnail upload is harmless.
///
/// # Example
///
/// ```
/// use edream_core::UploadOptions;
///
/// let options = UploadOptions::new()
///     .with_resource_id("55353076-f985-4a0c-bd1b-91ee727794fb")
///     .with_frame_number(12);
/// assert_eq!(options.frame_number, Some(12));
/// ```
#[derive(Clone, Default)]
pub struct UploadOptions {
    /// Attach the upload to this existing record instead of creating one.
    pub resource_id: Option<String>,
    /// Frame index, required for filmstrip-frame uploads.
    pub frame_number: Option<u32>,
    /// Marks the media as already finalized.
    pub processed: Option<bool>,
    /// Overrides the name derived from the file stem.
    pub name: Option<String>,
    /// Adult-content flag for primary media.
    pub nsfw: Option<bool>,
    /// Receives throttled progress updates.
    pub progress: Option<Arc<dyn ProgressReporter>>,
    /// Minimum time between progress invocations (defaults to one second).
    pub progress_interval: Option<Duration>,
}

impl UploadOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to an existing record.
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Set the filmstrip frame number.
    #[must_use]
    pub const fn with_frame_number(mut self, frame_number: u32) -> Self {
        self.frame_number = Some(frame_number);
        self
    }

    /// Mark the media as already processed.
    #[must_use]
    pub const fn with_processed(mut self, processed: bool) -> Self {
        self.processed = Some(processed);
        self
    }

    /// Override the derived record name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the adult-content flag.
    #[must_use]
    pub const fn with_nsfw(mut self, nsfw: bool) -> Self {
        self.nsfw = Some(nsfw);
        self
    }

    /// Report progress to the given capability.
    #[must_use]
    pub fn with_progress(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress = Some(reporter);
        self
    }

    /// Report progress to a closure.
    #[must_use]
    pub fn with_progress_fn<F>(self, callback: F) -> Self
    where
        F: Fn(TransferProgress) -> Result<(), ProgressError> + Send + Sync + 'static,
    {
        self.with_progress(Arc::new(ProgressFn::new(callback)))
    }

    /// Set the minimum time between progress invocations.
    #[must_use]
    pub const fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    /// Progress interval, falling back to `default` when unset.
    pub fn progress_interval_or(&self, default: Duration) -> Duration {
        self.progress_interval.unwrap_or(default)
    }

    /// Payload field values for a file with the given stem.
    ///
    /// The name falls back to the stem when not overridden.
    pub fn fields_for(&self, file_stem: &str) -> UploadFields {
        UploadFields {
            name: self
                .name
                .clone()
                .or_else(|| (!file_stem.is_empty()).then(|| file_stem.to_string())),
            nsfw: self.nsfw,
            processed: self.processed,
            frame_number: self.frame_number,
        }
    }
}

impl fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadOptions")
            .field("resource_id", &self.resource_id)
            .field("frame_number", &self.frame_number)
            .field("processed", &self.processed)
            .field("name", &self.name)
            .field("nsfw", &self.nsfw)
            .field("progress", &self.progress.as_ref().map(|_| "<reporter>"))
            .field("progress_interval", &self.progress_interval)
            .finish()
    }
}

/// Candidate values for a request's optional payload fields.
///
/// The backend adapter filters these through the resource profile's
/// [`PayloadFields`](crate::PayloadFields) for each phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFields {
    /// Record name.
    pub name: Option<String>,
    /// Adult-content flag.
    pub nsfw: Option<bool>,
    /// Already-processed flag.
    pub processed: Option<bool>,
    /// Filmstrip frame index.
    pub frame_number: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let options = UploadOptions::new()
            .with_resource_id("abc")
            .with_frame_number(3)
            .with_processed(true)
            .with_name("sunrise")
            .with_nsfw(false)
            .with_progress_interval(Duration::from_millis(250));

        assert_eq!(options.resource_id.as_deref(), Some("abc"));
        assert_eq!(options.frame_number, Some(3));
        assert_eq!(options.processed, Some(true));
        assert_eq!(options.name.as_deref(), Some("sunrise"));
        assert_eq!(options.nsfw, Some(false));
        assert_eq!(
            options.progress_interval_or(DEFAULT_PROGRESS_INTERVAL),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_progress_interval_default() {
        let options = UploadOptions::new();
        assert_eq!(
            options.progress_interval_or(DEFAULT_PROGRESS_INTERVAL),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_fields_derive_name_from_stem() {
        let fields = UploadOptions::new().fields_for("my_video");
        assert_eq!(fields.name.as_deref(), Some("my_video"));

        let fields = UploadOptions::new().with_name("override").fields_for("my_video");
        assert_eq!(fields.name.as_deref(), Some("override"));

        let fields = UploadOptions::new().fields_for("");
        assert_eq!(fields.name, None);
    }

    #[test]
    fn test_debug_hides_reporter() {
        let options = UploadOptions::new().with_progress_fn(|_| Ok(()));
        let rendered = format!("{options:?}");
        assert!(rendered.contains("<reporter>"));
    }
}
