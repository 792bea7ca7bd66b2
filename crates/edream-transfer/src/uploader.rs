//! Single-part upload to a presigned URL.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use tracing::debug;

use crate::error::PartFailure;
use crate::progress::ProgressTracker;
use crate::transport::{ObjectTransport, UploadBody};

/// Slice size the body stream hands to the HTTP client.
const BODY_CHUNK_SIZE: usize = 256 * 1024;

/// Strip the quote characters storage wraps around ETags (`"abc"` and `W/"abc"`).
pub fn strip_etag_quotes(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("W/").unwrap_or(trimmed);
    trimmed.trim_matches('"').to_string()
}

/// Body stream over an in-memory part that counts bytes as they are polled.
struct CountingBody {
    data: Bytes,
    offset: usize,
    tracker: Arc<ProgressTracker>,
}

impl Stream for CountingBody {
    type Item = Result<Bytes, std::io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.offset >= self.data.len() {
            return Poll::Ready(None);
        }
        let end = (self.offset + BODY_CHUNK_SIZE).min(self.data.len());
        let chunk = self.data.slice(self.offset..end);
        self.offset = end;
        self.tracker.advance(chunk.len() as u64);
        Poll::Ready(Some(Ok(chunk)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.data.len() - self.offset).div_ceil(BODY_CHUNK_SIZE);
        (remaining, Some(remaining))
    }
}

/// Uploads one part per call. Never retries.
#[derive(Clone)]
pub struct PartUploader {
    transport: Arc<dyn ObjectTransport>,
}

impl PartUploader {
    pub fn new(transport: Arc<dyn ObjectTransport>) -> Self {
        Self { transport }
    }

    /// `PUT` `data` to `url` and return its unquoted ETag.
    ///
    /// Progress advances as the HTTP client consumes the body.
    pub async fn upload_part(
        &self,
        url: &str,
        data: Bytes,
        content_type: &str,
        tracker: &Arc<ProgressTracker>,
    ) -> Result<String, PartFailure> {
        let body = UploadBody {
            len: data.len() as u64,
            stream: Box::pin(CountingBody {
                data,
                offset: 0,
                tracker: Arc::clone(tracker),
            }),
        };

        let response = self.transport.put(url, content_type, body).await?;
        if !(200..300).contains(&response.status) {
            return Err(PartFailure::Status {
                status: response.status,
            });
        }

        let etag = response
            .etag
            .as_deref()
            .map(strip_etag_quotes)
            .filter(|etag| !etag.is_empty())
            .ok_or(PartFailure::MissingEtag)?;
        debug!(etag = %etag, "Part stored");
        Ok(etag)
    }
}
