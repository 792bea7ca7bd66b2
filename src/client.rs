//! The SDK entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use edream_api::{ApiClientConfig, DefaultApiClient};
use edream_core::{ResourceType, UploadOptions};
use edream_transfer::{
    DownloadOptions, DownloadResult, TransferConfig, UploadCoordinator, UploadOutcome,
    UploadResult,
};
use tracing::debug;

use crate::error::SdkError;

/// Uploads and downloads media against one e-dream backend.
///
/// Each call runs to completion on the calling task; independent calls may
/// run concurrently on a shared client.
pub struct EdreamClient {
    coordinator: UploadCoordinator,
}

impl EdreamClient {
    pub fn new(
        api_config: &ApiClientConfig,
        transfer_config: TransferConfig,
    ) -> Result<Self, SdkError> {
        let backend = DefaultApiClient::new(api_config)?;
        debug!(base_url = %api_config.base_url(), part_size = transfer_config.part_size, "Creating e-dream client");
        let coordinator = UploadCoordinator::new(Arc::new(backend), transfer_config)?;
        Ok(Self { coordinator })
    }

    /// Build a client from `EDREAM_BACKEND_URL` and `EDREAM_API_KEY` with
    /// default transfer settings.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::new(&ApiClientConfig::from_env()?, TransferConfig::default())
    }

    /// Wrap an existing coordinator, e.g. one built over a custom backend port.
    pub const fn with_coordinator(coordinator: UploadCoordinator) -> Self {
        Self { coordinator }
    }

    pub const fn coordinator(&self) -> &UploadCoordinator {
        &self.coordinator
    }

    /// Upload a file as `resource_type`.
    pub async fn upload_file(
        &self,
        path: &Path,
        resource_type: ResourceType,
        options: &UploadOptions,
    ) -> UploadResult<UploadOutcome> {
        self.coordinator.upload(path, resource_type, options).await
    }

    /// Upload a file with the resource type given by its wire name.
    pub async fn upload_file_as(
        &self,
        path: &Path,
        resource_type: &str,
        options: &UploadOptions,
    ) -> UploadResult<UploadOutcome> {
        self.coordinator
            .upload_as(path, resource_type, options)
            .await
    }

    /// Download `url`; `true` when the file was written completely.
    pub async fn download_file(
        &self,
        url: &str,
        destination: Option<&Path>,
        options: &DownloadOptions,
    ) -> bool {
        self.coordinator.download(url, destination, options).await
    }

    /// Download `url`, returning the written path or the failure cause.
    pub async fn try_download_file(
        &self,
        url: &str,
        destination: Option<&Path>,
        options: &DownloadOptions,
    ) -> DownloadResult<PathBuf> {
        self.coordinator
            .try_download(url, destination, options)
            .await
    }
}
