//! Transfer engine configuration.

use std::time::Duration;

use edream_core::DEFAULT_PROGRESS_INTERVAL;
use thiserror::Error;

/// Default part size: 200 MiB.
pub const DEFAULT_PART_SIZE: u64 = 200 * 1024 * 1024;

/// Default number of attempts per part, first try included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default download write buffer: 20 MiB.
pub const DEFAULT_DOWNLOAD_BUFFER_SIZE: usize = 20 * 1024 * 1024;

/// Invalid transfer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferConfigError {
    #[error("Part size must be greater than zero")]
    ZeroPartSize,

    #[error("At least one attempt per part is required")]
    ZeroAttempts,

    #[error("Failed to build HTTP client: {message}")]
    HttpClient { message: String },
}

/// Settings for uploads and downloads.
///
/// # Example
///
/// ```
/// use edream_transfer::TransferConfig;
/// use std::time::Duration;
///
/// let config = TransferConfig::default()
///     .with_part_size(64 * 1024 * 1024)
///     .with_request_timeout(Duration::from_secs(600));
/// assert_eq!(config.max_attempts, 3);
/// ```
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Bytes per part; the last part holds the remainder.
    pub part_size: u64,
    /// Attempts per part including the first. A fresh URL is requested before each retry.
    pub max_attempts: u32,
    /// Delay before the first retry, doubled for each further retry. Zero disables backoff.
    pub retry_base_delay: Duration,
    /// Minimum time between progress callbacks unless the call overrides it.
    pub progress_interval: Duration,
    /// Write buffer used while streaming downloads to disk.
    pub download_buffer_size: usize,
    /// Per-request timeout for object storage calls. `None` keeps the client default.
    pub request_timeout: Option<Duration>,
    /// User agent for object storage calls.
    pub user_agent: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            part_size: DEFAULT_PART_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: Duration::from_millis(500),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            download_buffer_size: DEFAULT_DOWNLOAD_BUFFER_SIZE,
            request_timeout: None,
            user_agent: concat!("edream-sdk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TransferConfig {
    #[must_use]
    pub const fn with_part_size(mut self, part_size: u64) -> Self {
        self.part_size = part_size;
        self
    }

    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub const fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    #[must_use]
    pub const fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    #[must_use]
    pub const fn with_download_buffer_size(mut self, size: usize) -> Self {
        self.download_buffer_size = size;
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Reject settings the engine cannot run with.
    pub const fn validate(&self) -> Result<(), TransferConfigError> {
        if self.part_size == 0 {
            return Err(TransferConfigError::ZeroPartSize);
        }
        if self.max_attempts == 0 {
            return Err(TransferConfigError::ZeroAttempts);
        }
        Ok(())
    }

    /// Backoff before retry number `retry` (1-based).
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        if self.retry_base_delay.is_zero() || retry == 0 {
            return Duration::ZERO;
        }
        self.retry_base_delay
            .saturating_mul(2u32.saturating_pow(retry - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransferConfig::default();
        assert_eq!(config.part_size, 209_715_200);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.progress_interval, Duration::from_secs(1));
        assert_eq!(config.download_buffer_size, 20 * 1024 * 1024);
        assert!(config.request_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            TransferConfig::default().with_part_size(0).validate(),
            Err(TransferConfigError::ZeroPartSize)
        );
        assert_eq!(
            TransferConfig::default().with_max_attempts(0).validate(),
            Err(TransferConfigError::ZeroAttempts)
        );
    }

    #[test]
    fn test_backoff_doubles() {
        let config = TransferConfig::default();
        assert_eq!(config.backoff_delay(1), Duration::from_millis(500));
        assert_eq!(config.backoff_delay(2), Duration::from_secs(1));
        assert_eq!(config.backoff_delay(3), Duration::from_secs(2));

        let no_backoff = config.with_retry_base_delay(Duration::ZERO);
        assert_eq!(no_backoff.backoff_delay(2), Duration::ZERO);
    }
}
