//! Port trait implementation for `ApiClient`.
//!
//! This module implements the core-owned `UploadBackendPort` trait for
//! `ApiClient`, handling the conversion between wire types and core DTOs.

use async_trait::async_trait;
use edream_core::{
    BackendError, BackendResult, CompleteUploadRequest, CompletionResponse, CreateUploadRequest,
    CreatedUpload, RefreshPartRequest, ResourceType, UploadBackendPort,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::envelope::unwrap_data;
use crate::error::{ApiError, ApiResult};
use crate::http::HttpBackend;
use crate::models::{CompleteUploadData, CreateUploadData, RefreshUploadData};
use crate::payload::{complete_payload, create_payload, refresh_payload};

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `ApiError` to core `BackendError`.
///
/// `upload_id` names the session when the call belongs to one.
fn map_error(err: ApiError, upload_id: Option<&str>) -> BackendError {
    match err {
        ApiError::ApiRequestFailed {
            status,
            url,
            message,
        } => match status {
            400 | 422 => BackendError::ValidationFailed { message },
            401 | 403 => BackendError::Unauthorized { message },
            404 => BackendError::NotFound {
                what: if message.is_empty() { url } else { message },
            },
            409 => BackendError::PartMismatch { message },
            410 => BackendError::UploadSessionExpired {
                upload_id: upload_id.unwrap_or_default().to_string(),
            },
            _ => BackendError::Api { status, message },
        },
        ApiError::Rejected { message } => BackendError::ValidationFailed { message },
        ApiError::InvalidResponse { message, raw } => {
            BackendError::MalformedResponse { message, raw }
        }
        ApiError::MissingResourceId { resource_type } => BackendError::ValidationFailed {
            message: format!("a resource id is required for {resource_type} uploads"),
        },
        ApiError::Network(e) => BackendError::Network {
            message: e.to_string(),
        },
        ApiError::InvalidUrl(e) => BackendError::Configuration {
            message: e.to_string(),
        },
        ApiError::JsonParse(e) => BackendError::MalformedResponse {
            message: e.to_string(),
            raw: String::new(),
        },
    }
}

/// Unwrap the envelope and decode `data`, keeping the raw payload on failure.
fn decode<T: DeserializeOwned>(body: Value, what: &str) -> ApiResult<(T, Value)> {
    let data = unwrap_data(body)?;
    let parsed = serde_json::from_value(data.clone())
        .map_err(|e| ApiError::invalid_response(format!("{what}: {e}"), &data))?;
    Ok((parsed, data))
}

fn require_id(resource_type: ResourceType, resource_id: &str) -> ApiResult<()> {
    if resource_id.trim().is_empty() {
        return Err(ApiError::MissingResourceId {
            resource_type: resource_type.as_str(),
        });
    }
    Ok(())
}

// ============================================================================
// Port Implementation
// ============================================================================

impl<B: HttpBackend> ApiClient<B> {
    async fn create_session(&self, request: &CreateUploadRequest) -> ApiResult<CreatedUpload> {
        let target = &request.target;
        let profile = target.resource_type.profile();
        let path = profile
            .create_path(target.resource_id.as_deref())
            .ok_or(ApiError::MissingResourceId {
                resource_type: target.resource_type.as_str(),
            })?;

        debug!(
            resource_type = %target.resource_type,
            parts = request.total_parts,
            path = %path,
            "Creating multipart upload"
        );
        let body = self.backend.post_json(&path, &create_payload(request)).await?;
        let (data, raw): (CreateUploadData, Value) = decode(body, "create-multipart-upload")?;

        Ok(CreatedUpload {
            upload_id: data.upload_id,
            urls: data.urls,
            resource: data.dream,
            raw,
        })
    }

    async fn refresh_url(&self, request: &RefreshPartRequest) -> ApiResult<String> {
        require_id(request.resource_type, &request.resource_id)?;
        let path = request
            .resource_type
            .profile()
            .refresh
            .render(&request.resource_id);

        debug!(
            upload_id = %request.upload_id,
            part = request.part_number,
            "Refreshing part URL"
        );
        let body = self
            .backend
            .post_json(&path, &refresh_payload(request))
            .await?;
        let (data, raw): (RefreshUploadData, Value) = decode(body, "refresh-multipart-upload")?;
        data.into_url()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::invalid_response("refresh response carried no URL", &raw))
    }

    async fn complete_session(
        &self,
        request: &CompleteUploadRequest,
    ) -> ApiResult<CompletionResponse> {
        require_id(request.resource_type, &request.resource_id)?;
        let path = request
            .resource_type
            .profile()
            .complete
            .render(&request.resource_id);

        debug!(
            upload_id = %request.upload_id,
            parts = request.parts.len(),
            "Completing multipart upload"
        );
        let body = self
            .backend
            .post_json(&path, &complete_payload(request))
            .await?;
        let data = unwrap_data(body)?;
        // Some completions answer with a bare success flag and no data.
        let record = if data.is_object() {
            serde_json::from_value::<CompleteUploadData>(data.clone())
                .map_err(|e| {
                    ApiError::invalid_response(format!("complete-multipart-upload: {e}"), &data)
                })?
                .dream
        } else {
            None
        };

        Ok(CompletionResponse { record, raw: data })
    }
}

#[async_trait]
impl<B: HttpBackend> UploadBackendPort for ApiClient<B> {
    async fn create_upload_session(
        &self,
        request: &CreateUploadRequest,
    ) -> BackendResult<CreatedUpload> {
        self.create_session(request)
            .await
            .map_err(|e| map_error(e, None))
    }

    async fn refresh_part_url(&self, request: &RefreshPartRequest) -> BackendResult<String> {
        self.refresh_url(request)
            .await
            .map_err(|e| map_error(e, Some(&request.upload_id)))
    }

    async fn complete_upload_session(
        &self,
        request: &CompleteUploadRequest,
    ) -> BackendResult<CompletionResponse> {
        self.complete_session(request)
            .await
            .map_err(|e| map_error(e, Some(&request.upload_id)))
    }
}
