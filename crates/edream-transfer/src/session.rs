//! One multipart upload, from session creation to completion.
//!
//! Parts are uploaded strictly in order, one at a time. A failed part is
//! retried up to `max_attempts` times in total; each retry first asks the
//! backend for a fresh presigned URL. A part that fails every attempt fails
//! the whole upload and no completion request is sent.

use std::io;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use edream_core::{
    CompleteUploadRequest, CompletedPart, CreateUploadRequest, MediaRecord, RefreshPartRequest,
    SessionState, UploadBackendPort, UploadTarget,
};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info, warn};

use crate::config::TransferConfig;
use crate::error::{UploadError, UploadResult};
use crate::planner::{PartPlan, PartSpan};
use crate::progress::ProgressTracker;
use crate::uploader::PartUploader;

/// What a finished upload produced.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The created or updated record (primary media, thumbnail, filmstrip frame).
    Resource(MediaRecord),
    /// Completion succeeded without a record (keyframe images).
    Completed,
}

impl UploadOutcome {
    pub const fn record(&self) -> Option<&MediaRecord> {
        match self {
            Self::Resource(record) => Some(record),
            Self::Completed => None,
        }
    }

    pub fn into_record(self) -> Option<MediaRecord> {
        match self {
            Self::Resource(record) => Some(record),
            Self::Completed => None,
        }
    }
}

/// Drives a single upload. Created per call, never shared.
pub struct UploadSession<'a> {
    backend: &'a dyn UploadBackendPort,
    uploader: &'a PartUploader,
    config: &'a TransferConfig,
    target: UploadTarget,
    content_type: &'static str,
    plan: PartPlan,
    state: SessionState,
}

impl<'a> UploadSession<'a> {
    pub fn new(
        backend: &'a dyn UploadBackendPort,
        uploader: &'a PartUploader,
        config: &'a TransferConfig,
        target: UploadTarget,
        plan: PartPlan,
    ) -> Self {
        let state = SessionState::new(
            target.resource_type,
            target.resource_id.clone(),
            plan.total_parts(),
            plan.part_size(),
        );
        let content_type = edream_core::content_type_for_extension(&target.extension);
        Self {
            backend,
            uploader,
            config,
            target,
            content_type,
            plan,
            state,
        }
    }

    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    pub const fn plan(&self) -> &PartPlan {
        &self.plan
    }

    /// Upload the file at `path` and complete the session.
    ///
    /// The file is opened here and closed before returning, on success or failure.
    pub async fn run(
        &mut self,
        path: &Path,
        tracker: &Arc<ProgressTracker>,
    ) -> UploadResult<UploadOutcome> {
        let result = self.drive(path, tracker).await;
        if let Err(e) = &result {
            self.state.fail();
            error!(
                upload_id = self.state.upload_id().unwrap_or("-"),
                resource_type = %self.target.resource_type,
                error = %e,
                "Upload failed"
            );
        }
        result
    }

    async fn drive(
        &mut self,
        path: &Path,
        tracker: &Arc<ProgressTracker>,
    ) -> UploadResult<UploadOutcome> {
        let urls = self.create().await?;
        {
            let mut file = File::open(path).await?;
            self.upload_parts(&mut file, urls, tracker).await?;
        }
        tracker.finish();
        self.complete().await
    }

    async fn create(&mut self) -> UploadResult<Vec<String>> {
        let request = CreateUploadRequest {
            target: self.target.clone(),
            total_parts: self.plan.total_parts(),
        };
        let created = self.backend.create_upload_session(&request).await?;

        if created.urls.len() != self.plan.total_parts() as usize {
            return Err(UploadError::MalformedResponse {
                message: format!(
                    "expected {} part URLs, got {}",
                    self.plan.total_parts(),
                    created.urls.len()
                ),
                raw: created.raw.to_string(),
            });
        }

        let assigned = created.resource.map(|record| record.uuid);
        if self.target.resource_id.is_none() && assigned.is_none() {
            return Err(UploadError::MalformedResponse {
                message: "session created without a resource id".to_string(),
                raw: created.raw.to_string(),
            });
        }

        self.state.open(created.upload_id, assigned)?;
        info!(
            upload_id = self.state.upload_id().unwrap_or_default(),
            resource_id = self.state.resource_id().unwrap_or_default(),
            parts = self.plan.total_parts(),
            bytes = self.plan.file_size(),
            "Upload session created"
        );
        Ok(created.urls)
    }

    async fn upload_parts(
        &mut self,
        file: &mut File,
        urls: Vec<String>,
        tracker: &Arc<ProgressTracker>,
    ) -> UploadResult<()> {
        let spans: Vec<PartSpan> = self.plan.spans().collect();
        for (span, url) in spans.into_iter().zip(urls) {
            let data = read_span(file, span).await?;
            let etag = self.upload_with_retry(span.part_number, url, data, tracker).await?;
            self.state
                .record_part(CompletedPart::new(span.part_number, etag), span.len)?;
            debug!(
                part_number = span.part_number,
                bytes_uploaded = self.state.bytes_uploaded(),
                "Part uploaded"
            );
        }
        Ok(())
    }

    async fn upload_with_retry(
        &self,
        part_number: u32,
        mut url: String,
        data: Bytes,
        tracker: &Arc<ProgressTracker>,
    ) -> UploadResult<String> {
        let before = self.state.bytes_uploaded();
        let mut attempt = 1;
        loop {
            let failure = match self
                .uploader
                .upload_part(&url, data.clone(), self.content_type, tracker)
                .await
            {
                Ok(etag) => return Ok(etag),
                Err(failure) => failure,
            };

            tracker.rewind_to(before);
            if attempt >= self.config.max_attempts {
                return Err(UploadError::PartFailed {
                    part_number,
                    attempts: attempt,
                    last_failure: failure,
                });
            }

            warn!(
                part_number,
                attempt,
                max_attempts = self.config.max_attempts,
                error = %failure,
                "Part upload failed; refreshing URL and retrying"
            );
            let delay = self.config.backoff_delay(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            url = self.refresh(part_number).await?;
            attempt += 1;
        }
    }

    async fn refresh(&self, part_number: u32) -> UploadResult<String> {
        let request = RefreshPartRequest {
            resource_type: self.target.resource_type,
            resource_id: self.require_resource_id()?,
            upload_id: self.require_upload_id()?,
            part_number,
            extension: self.target.extension.clone(),
            fields: self.target.fields.clone(),
        };
        Ok(self.backend.refresh_part_url(&request).await?)
    }

    async fn complete(&mut self) -> UploadResult<UploadOutcome> {
        self.state.begin_completing()?;
        let request = CompleteUploadRequest {
            resource_type: self.target.resource_type,
            resource_id: self.require_resource_id()?,
            upload_id: self.require_upload_id()?,
            parts: self.state.completed_parts().to_vec(),
            extension: self.target.extension.clone(),
            fields: self.target.fields.clone(),
        };
        let response = self.backend.complete_upload_session(&request).await?;

        let outcome = if self.target.resource_type.profile().returns_record {
            let record = response
                .record
                .ok_or_else(|| UploadError::MalformedResponse {
                    message: "completion response carried no record".to_string(),
                    raw: response.raw.to_string(),
                })?;
            UploadOutcome::Resource(record)
        } else {
            UploadOutcome::Completed
        };

        self.state.finish()?;
        info!(
            upload_id = %request.upload_id,
            resource_id = %request.resource_id,
            parts = request.parts.len(),
            "Upload completed"
        );
        Ok(outcome)
    }

    fn require_resource_id(&self) -> UploadResult<String> {
        self.state
            .resource_id()
            .map(str::to_string)
            .ok_or_else(|| UploadError::MalformedResponse {
                message: "upload session has no resource id".to_string(),
                raw: String::new(),
            })
    }

    fn require_upload_id(&self) -> UploadResult<String> {
        self.state
            .upload_id()
            .map(str::to_string)
            .ok_or_else(|| UploadError::MalformedResponse {
                message: "upload session has no upload id".to_string(),
                raw: String::new(),
            })
    }
}

/// Read the next `span.len` bytes. Parts are read in order, so no seek is needed.
async fn read_span(file: &mut File, span: PartSpan) -> UploadResult<Bytes> {
    let len = usize::try_from(span.len)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "part larger than memory"))?;
    let mut buf = vec![0u8; len];
    file.read_exact(&mut buf).await?;
    Ok(Bytes::from(buf))
}
