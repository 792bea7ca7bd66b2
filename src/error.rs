//! Errors raised while building an [`crate::EdreamClient`].

use edream_api::ConfigError;
use edream_transfer::TransferConfigError;
use thiserror::Error;

/// Client construction failure.
///
/// Transfer failures are reported per call as
/// [`edream_transfer::UploadError`] or [`edream_transfer::DownloadError`].
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Invalid backend configuration: {0}")]
    Api(#[from] ConfigError),

    #[error("Invalid transfer configuration: {0}")]
    Transfer(#[from] TransferConfigError),
}
