//! reqwest-backed object-storage transport.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG};
use tracing::debug;

use super::{GetResponse, ObjectTransport, PutResponse, UploadBody};
use crate::config::{TransferConfig, TransferConfigError};
use crate::error::TransportError;

/// Production transport using reqwest.
///
/// No authorization header is sent; presigned URLs carry their own signature.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the configured timeout and user agent.
    pub fn new(config: &TransferConfig) -> Result<Self, TransferConfigError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransferConfigError::HttpClient {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn map_reqwest_error(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_body() || err.is_decode() {
        TransportError::Body {
            message: err.to_string(),
        }
    } else {
        TransportError::Request {
            message: err.to_string(),
        }
    }
}

/// Host of a presigned URL, for logs. The query carries the signature.
fn log_host(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "<invalid url>".to_string())
}

#[async_trait]
impl ObjectTransport for ReqwestTransport {
    async fn put(
        &self,
        url: &str,
        content_type: &str,
        body: UploadBody,
    ) -> Result<PutResponse, TransportError> {
        debug!(host = %log_host(url), bytes = body.len, "PUT part");

        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, body.len)
            .body(reqwest::Body::wrap_stream(body.stream))
            .send()
            .await
            .map_err(|e| map_reqwest_error(&e))?;

        let status = response.status().as_u16();
        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(PutResponse { status, etag })
    }

    async fn get(&self, url: &str) -> Result<GetResponse, TransportError> {
        debug!(host = %log_host(url), "GET object");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(&e))?;

        let status = response.status().as_u16();
        let content_length = response.content_length();
        let body = response
            .bytes_stream()
            .map_err(|e| map_reqwest_error(&e));

        Ok(GetResponse {
            status,
            content_length,
            body: Box::pin(body),
        })
    }
}
