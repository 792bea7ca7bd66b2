//! Streamed download to a local file.
//!
//! The body is written through a bounded buffer so memory use does not grow
//! with the file. A partial file is left in place when the transfer breaks
//! off; callers that need atomic replacement should download to a temporary
//! path and rename it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use edream_core::ProgressReporter;
use futures_util::StreamExt;
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use crate::error::{DownloadError, DownloadResult};
use crate::progress::ProgressTracker;
use crate::transport::ObjectTransport;

/// Per-call download options.
#[derive(Clone, Default)]
pub struct DownloadOptions {
    /// Receives throttled progress updates. Only invoked when the response
    /// announces a non-zero `Content-Length`.
    pub progress: Option<Arc<dyn ProgressReporter>>,
    /// Minimum time between progress invocations.
    pub progress_interval: Option<Duration>,
}

impl DownloadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_progress(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress = Some(reporter);
        self
    }

    #[must_use]
    pub const fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = Some(interval);
        self
    }
}

impl std::fmt::Debug for DownloadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadOptions")
            .field("progress", &self.progress.as_ref().map(|_| "<reporter>"))
            .field("progress_interval", &self.progress_interval)
            .finish()
    }
}

/// File name a URL would be saved under: its last path segment, query ignored.
pub fn destination_from_url(url: &str) -> DownloadResult<PathBuf> {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| DownloadError::NoDestination {
            url: url.to_string(),
        })
}

/// Streams URLs to disk.
#[derive(Clone)]
pub struct DownloadStream {
    transport: Arc<dyn ObjectTransport>,
    buffer_size: usize,
    default_interval: Duration,
}

impl DownloadStream {
    pub fn new(
        transport: Arc<dyn ObjectTransport>,
        buffer_size: usize,
        default_interval: Duration,
    ) -> Self {
        Self {
            transport,
            buffer_size,
            default_interval,
        }
    }

    /// Download `url` to `destination`, returning `true` on success.
    ///
    /// Every failure is logged and reported as `false`; use
    /// [`DownloadStream::try_download`] to inspect the cause.
    pub async fn download(&self, url: &str, destination: &Path, options: &DownloadOptions) -> bool {
        match self.try_download(url, destination, options).await {
            Ok(_) => true,
            Err(e) => {
                warn!(path = %destination.display(), error = %e, "Download failed");
                false
            }
        }
    }

    /// Download `url` to `destination`, returning the bytes written.
    pub async fn try_download(
        &self,
        url: &str,
        destination: &Path,
        options: &DownloadOptions,
    ) -> DownloadResult<u64> {
        let response = self.transport.get(url).await?;
        if !(200..300).contains(&response.status) {
            return Err(DownloadError::Status {
                status: response.status,
            });
        }

        let announced = response.content_length.filter(|len| *len > 0);
        let reporter = announced.and(options.progress.clone());
        let tracker = ProgressTracker::new(
            reporter,
            announced.unwrap_or(0),
            options.progress_interval.unwrap_or(self.default_interval),
        );

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let file = File::create(destination).await?;
        let mut writer = BufWriter::with_capacity(self.buffer_size, file);
        let mut body = response.body;
        let mut written: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
            tracker.advance(chunk.len() as u64);
        }
        writer.flush().await?;
        drop(writer);

        let on_disk = fs::metadata(destination).await?.len();
        debug!(path = %destination.display(), written, on_disk, "Download stream ended");
        if on_disk == 0 {
            return Err(DownloadError::Empty {
                path: destination.to_path_buf(),
            });
        }
        if let Some(expected) = response.content_length {
            if expected != on_disk {
                return Err(DownloadError::SizeMismatch {
                    expected,
                    actual: on_disk,
                });
            }
        }

        if announced.is_some() {
            tracker.finish();
        }
        info!(path = %destination.display(), bytes = on_disk, "Download complete");
        Ok(on_disk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::testing::{MockReporter, RecordingReporter};
    use crate::transport::testing::{ScriptedGet, ScriptedTransport};
    use edream_core::TransferProgress;
    use tempfile::tempdir;

    fn stream(transport: ScriptedTransport) -> DownloadStream {
        DownloadStream::new(Arc::new(transport), 16, Duration::ZERO)
    }

    #[test]
    fn test_destination_from_url() {
        assert_eq!(
            destination_from_url("https://cdn.example.com/dreams/abc/video.mp4?sig=1").unwrap(),
            PathBuf::from("video.mp4")
        );
        assert!(destination_from_url("https://cdn.example.com/").is_err());
        assert!(destination_from_url("nonsense").is_err());
    }

    #[tokio::test]
    async fn test_download_writes_exact_bytes_and_reports_total() {
        let body: Vec<u8> = (0..100u8).collect();
        let transport = ScriptedTransport::new().with_get(ScriptedGet::ok(&body));
        let dir = tempdir().unwrap();
        let dest = dir.path().join("nested/dir/out.bin");
        let recorder = Arc::new(RecordingReporter::default());

        let written = stream(transport)
            .try_download(
                "https://cdn/out.bin",
                &dest,
                &DownloadOptions::new().with_progress(recorder.clone()),
            )
            .await
            .unwrap();

        assert_eq!(written, 100);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
        let last = *recorder.snapshots().last().unwrap();
        assert_eq!(last, TransferProgress::new(100, 100));
        assert!((last.percent - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_empty_body_is_failure() {
        let transport = ScriptedTransport::new().with_get(ScriptedGet {
            status: 200,
            content_length: Some(0),
            chunks: Vec::new(),
            break_after: false,
        });
        let dir = tempdir().unwrap();
        let dest = dir.path().join("empty.bin");
        let downloader = stream(transport);

        assert!(matches!(
            downloader
                .try_download("https://cdn/empty.bin", &dest, &DownloadOptions::new())
                .await,
            Err(DownloadError::Empty { .. })
        ));
        assert!(
            !downloader
                .download("https://cdn/empty.bin", &dest, &DownloadOptions::new())
                .await
        );
    }

    #[tokio::test]
    async fn test_no_content_length_skips_progress() {
        let recorder = Arc::new(RecordingReporter::default());
        let transport = ScriptedTransport::new().with_get(ScriptedGet {
            content_length: None,
            ..ScriptedGet::ok(b"some bytes")
        });
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.bin");

        let ok = stream(transport)
            .download(
                "https://cdn/out.bin",
                &dest,
                &DownloadOptions::new().with_progress(recorder.clone()),
            )
            .await;

        assert!(ok);
        assert!(recorder.snapshots().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_and_broken_stream() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.bin");

        let missing = ScriptedTransport::new().with_get(ScriptedGet {
            status: 404,
            ..ScriptedGet::ok(b"")
        });
        assert!(matches!(
            stream(missing)
                .try_download("https://cdn/x", &dest, &DownloadOptions::new())
                .await,
            Err(DownloadError::Status { status: 404 })
        ));

        let broken = ScriptedTransport::new().with_get(ScriptedGet {
            break_after: true,
            ..ScriptedGet::ok(b"partial data")
        });
        assert!(matches!(
            stream(broken)
                .try_download("https://cdn/x", &dest, &DownloadOptions::new())
                .await,
            Err(DownloadError::Transport(TransportError::Body { .. }))
        ));
    }

    #[tokio::test]
    async fn test_short_body_is_size_mismatch() {
        let transport = ScriptedTransport::new().with_get(ScriptedGet {
            content_length: Some(50),
            ..ScriptedGet::ok(b"only twenty bytes!!!")
        });
        let dir = tempdir().unwrap();
        let result = stream(transport)
            .try_download("https://cdn/x", &dir.path().join("x"), &DownloadOptions::new())
            .await;
        assert!(matches!(
            result,
            Err(DownloadError::SizeMismatch {
                expected: 50,
                actual: 20
            })
        ));
    }

    #[tokio::test]
    async fn test_failing_reporter_does_not_abort_download() {
        let mut mock = MockReporter::new();
        mock.expect_report().returning(|_| Err("boom".into()));
        let transport = ScriptedTransport::new().with_get(ScriptedGet::ok(&[1u8; 64]));
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.bin");

        let ok = stream(transport)
            .download(
                "https://cdn/out.bin",
                &dest,
                &DownloadOptions::new().with_progress(Arc::new(mock)),
            )
            .await;

        assert!(ok);
        assert_eq!(std::fs::metadata(&dest).unwrap().len(), 64);
    }
}
