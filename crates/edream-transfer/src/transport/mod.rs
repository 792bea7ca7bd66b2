//! Object-storage transport.
//!
//! Presigned URLs are plain HTTP: a part is a `PUT` whose only consumed
//! response field is the `ETag` header, a download is a `GET`. The engine
//! talks to storage through [`ObjectTransport`] so it can run against a
//! scripted fake in tests.

mod http;

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;

use crate::error::TransportError;

pub use http::ReqwestTransport;

/// Request body stream handed to the HTTP client.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync>>;

/// Response body stream.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// A sized upload body.
pub struct UploadBody {
    /// Exact byte count, sent as `Content-Length`.
    pub len: u64,
    pub stream: BodyStream,
}

/// What a part `PUT` answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutResponse {
    pub status: u16,
    /// Raw `ETag` header, quotes included.
    pub etag: Option<String>,
}

/// A streamed `GET` response.
pub struct GetResponse {
    pub status: u16,
    pub content_length: Option<u64>,
    pub body: ByteStream,
}

/// HTTP access to presigned object-storage URLs.
#[async_trait]
pub trait ObjectTransport: Send + Sync {
    /// Upload `body` to `url`. Non-2xx statuses are returned, not raised.
    async fn put(
        &self,
        url: &str,
        content_type: &str,
        body: UploadBody,
    ) -> Result<PutResponse, TransportError>;

    /// Start downloading `url`.
    async fn get(&self, url: &str) -> Result<GetResponse, TransportError>;
}

// ============================================================================
// Scripted Transport for Testing
// ============================================================================
