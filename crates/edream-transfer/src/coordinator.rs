//! Upload and download entry points.
//!
//! The coordinator validates the caller's request against the resource
//! profile, plans the upload and runs one [`UploadSession`] per call.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use edream_core::{
    ResourceType, UploadBackendPort, UploadOptions, UploadTarget, file_extension, file_stem,
};
use tokio::fs;
use tracing::{info, warn};

use crate::config::{TransferConfig, TransferConfigError};
use crate::download::{DownloadOptions, DownloadStream, destination_from_url};
use crate::error::{DownloadResult, UploadError, UploadResult};
use crate::planner::PartPlan;
use crate::progress::ProgressTracker;
use crate::session::{UploadOutcome, UploadSession};
use crate::transport::{ObjectTransport, ReqwestTransport};
use crate::uploader::PartUploader;

/// Composition root of the transfer engine.
pub struct UploadCoordinator {
    backend: Arc<dyn UploadBackendPort>,
    uploader: PartUploader,
    downloader: DownloadStream,
    config: TransferConfig,
}

impl UploadCoordinator {
    /// Create a coordinator that talks to object storage over reqwest.
    pub fn new(
        backend: Arc<dyn UploadBackendPort>,
        config: TransferConfig,
    ) -> Result<Self, TransferConfigError> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Self::with_transport(backend, transport, config)
    }

    /// Create a coordinator with a custom storage transport.
    pub fn with_transport(
        backend: Arc<dyn UploadBackendPort>,
        transport: Arc<dyn ObjectTransport>,
        config: TransferConfig,
    ) -> Result<Self, TransferConfigError> {
        config.validate()?;
        Ok(Self {
            backend,
            uploader: PartUploader::new(Arc::clone(&transport)),
            downloader: DownloadStream::new(
                transport,
                config.download_buffer_size,
                config.progress_interval,
            ),
            config,
        })
    }

    pub const fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Upload the file at `path` as `resource_type`.
    ///
    /// Returns the created or updated record, or [`UploadOutcome::Completed`]
    /// for resource types whose completion carries no record.
    pub async fn upload(
        &self,
        path: &Path,
        resource_type: ResourceType,
        options: &UploadOptions,
    ) -> UploadResult<UploadOutcome> {
        let profile = resource_type.profile();
        let resource_id = options
            .resource_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        if profile.requires_resource_id() && resource_id.is_none() {
            return Err(UploadError::MissingOption {
                option: "resource_id",
                resource_type,
            });
        }
        if profile.requires_frame_number && options.frame_number.is_none() {
            return Err(UploadError::MissingOption {
                option: "frame_number",
                resource_type,
            });
        }

        let file_size = file_size(path).await?;
        let plan = PartPlan::new(file_size, self.config.part_size).ok_or(
            UploadError::TooManyParts {
                file_size,
                part_size: self.config.part_size,
            },
        )?;
        let target = UploadTarget {
            resource_type,
            resource_id,
            extension: file_extension(path),
            fields: options.fields_for(&file_stem(path)),
        };
        let tracker = Arc::new(ProgressTracker::new(
            options.progress.clone(),
            file_size,
            options.progress_interval_or(self.config.progress_interval),
        ));

        info!(
            path = %path.display(),
            resource_type = %resource_type,
            bytes = file_size,
            "Starting upload"
        );
        let mut session = UploadSession::new(
            self.backend.as_ref(),
            &self.uploader,
            &self.config,
            target,
            plan,
        );
        session.run(path, &tracker).await
    }

    /// Upload with the resource type given by its wire name
    /// (`dream`, `thumbnail`, `filmstrip`, `keyframe`).
    pub async fn upload_as(
        &self,
        path: &Path,
        resource_type: &str,
        options: &UploadOptions,
    ) -> UploadResult<UploadOutcome> {
        let resource_type: ResourceType = resource_type.parse()?;
        self.upload(path, resource_type, options).await
    }

    /// Download `url`, returning `true` on success.
    ///
    /// Without a destination the file is saved in the current directory
    /// under the URL's last path segment.
    pub async fn download(
        &self,
        url: &str,
        destination: Option<&Path>,
        options: &DownloadOptions,
    ) -> bool {
        let destination = match resolve_destination(url, destination) {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Download failed");
                return false;
            }
        };
        self.downloader.download(url, &destination, options).await
    }

    /// Download `url`, returning the path written.
    pub async fn try_download(
        &self,
        url: &str,
        destination: Option<&Path>,
        options: &DownloadOptions,
    ) -> DownloadResult<PathBuf> {
        let destination = resolve_destination(url, destination)?;
        self.downloader
            .try_download(url, &destination, options)
            .await?;
        Ok(destination)
    }
}

fn resolve_destination(url: &str, destination: Option<&Path>) -> DownloadResult<PathBuf> {
    destination.map_or_else(|| destination_from_url(url), |path| Ok(path.to_path_buf()))
}

async fn file_size(path: &Path) -> UploadResult<u64> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|e| UploadError::InvalidFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    if !metadata.is_file() {
        return Err(UploadError::InvalidFile {
            path: path.to_path_buf(),
            message: "not a regular file".to_string(),
        });
    }
    Ok(metadata.len())
}
