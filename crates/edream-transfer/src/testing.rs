//! Test doubles for the backend port and the progress capability.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use edream_core::{
    BackendError, BackendResult, CompleteUploadRequest, CompletionResponse, CreateUploadRequest,
    CreatedUpload, MediaRecord, ProgressError, ProgressReporter, RefreshPartRequest,
    TransferProgress, UploadBackendPort,
};
use serde_json::json;

mockall::mock! {
    pub Reporter {}

    impl ProgressReporter for Reporter {
        fn report(&self, progress: TransferProgress) -> Result<(), ProgressError>;
    }
}

/// Reporter that keeps every snapshot it receives.
#[derive(Default)]
pub struct RecordingReporter {
    seen: Mutex<Vec<TransferProgress>>,
}

impl RecordingReporter {
    pub fn snapshots(&self) -> Vec<TransferProgress> {
        self.seen.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, progress: TransferProgress) -> Result<(), ProgressError> {
        self.seen.lock().unwrap().push(progress);
        Ok(())
    }
}

#[derive(Default)]
struct FakeState {
    creates: Vec<CreateUploadRequest>,
    refreshes: Vec<RefreshPartRequest>,
    completes: Vec<CompleteUploadRequest>,
    created_record: Option<String>,
    url_count: Option<usize>,
    refresh_error: Option<BackendError>,
    create_error: Option<BackendError>,
    omit_completion_record: bool,
}

/// In-memory backend port.
///
/// Create hands out `https://storage.test/upl-1/part-<n>`; the k-th refresh
/// of part n hands out the same URL with `?refresh=<k>`.
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create responses carry a record with this uuid.
    pub fn with_created_record(self, uuid: &str) -> Self {
        self.state.lock().unwrap().created_record = Some(uuid.to_string());
        self
    }

    /// Create responses carry this many URLs regardless of the part count.
    pub fn with_url_count(self, count: usize) -> Self {
        self.state.lock().unwrap().url_count = Some(count);
        self
    }

    pub fn failing_create(self, err: BackendError) -> Self {
        self.state.lock().unwrap().create_error = Some(err);
        self
    }

    pub fn failing_refresh(self, err: BackendError) -> Self {
        self.state.lock().unwrap().refresh_error = Some(err);
        self
    }

    /// Completion answers `{"success": true}` without a record.
    pub fn without_completion_record(self) -> Self {
        self.state.lock().unwrap().omit_completion_record = true;
        self
    }

    pub fn part_urls(&self, count: u32) -> Vec<String> {
        (1..=count)
            .map(|n| format!("https://storage.test/upl-1/part-{n}"))
            .collect()
    }

    pub fn refreshed_url(&self, part_number: u32, refresh: usize) -> String {
        format!("https://storage.test/upl-1/part-{part_number}?refresh={refresh}")
    }

    pub fn creates(&self) -> Vec<CreateUploadRequest> {
        self.state.lock().unwrap().creates.clone()
    }

    pub fn refreshes(&self) -> Vec<RefreshPartRequest> {
        self.state.lock().unwrap().refreshes.clone()
    }

    pub fn completes(&self) -> Vec<CompleteUploadRequest> {
        self.state.lock().unwrap().completes.clone()
    }
}

#[async_trait]
impl UploadBackendPort for FakeBackend {
    async fn create_upload_session(
        &self,
        request: &CreateUploadRequest,
    ) -> BackendResult<CreatedUpload> {
        let mut state = self.state.lock().unwrap();
        state.creates.push(request.clone());
        if let Some(err) = state.create_error.clone() {
            return Err(err);
        }

        let count = state.url_count.unwrap_or(request.total_parts as usize);
        let urls = self.part_urls(u32::try_from(count).unwrap());
        let resource = state.created_record.as_deref().map(MediaRecord::with_uuid);
        Ok(CreatedUpload {
            upload_id: "upl-1".to_string(),
            raw: json!({"uploadId": "upl-1", "urls": urls}),
            urls,
            resource,
        })
    }

    async fn refresh_part_url(&self, request: &RefreshPartRequest) -> BackendResult<String> {
        let mut state = self.state.lock().unwrap();
        state.refreshes.push(request.clone());
        if let Some(err) = state.refresh_error.clone() {
            return Err(err);
        }
        let nth = state
            .refreshes
            .iter()
            .filter(|r| r.part_number == request.part_number)
            .count();
        Ok(self.refreshed_url(request.part_number, nth))
    }

    async fn complete_upload_session(
        &self,
        request: &CompleteUploadRequest,
    ) -> BackendResult<CompletionResponse> {
        let mut state = self.state.lock().unwrap();
        state.completes.push(request.clone());
        if state.omit_completion_record {
            return Ok(CompletionResponse {
                record: None,
                raw: json!({"success": true}),
            });
        }
        let record = MediaRecord::with_uuid(request.resource_id.clone());
        Ok(CompletionResponse {
            raw: json!({"dream": {"uuid": request.resource_id}}),
            record: Some(record),
        })
    }
}
