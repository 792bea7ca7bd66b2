//! End-to-end download tests over real HTTP.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::MockServer;
use edream_sdk::{
    ApiClientConfig, DownloadError, DownloadOptions, EdreamClient, ProgressFn, TransferConfig,
    TransferProgress,
};
use tempfile::tempdir;

fn client(server: &MockServer) -> EdreamClient {
    EdreamClient::new(
        &ApiClientConfig::new(&server.base_url, "unused"),
        TransferConfig::default().with_download_buffer_size(64),
    )
    .unwrap()
}

#[tokio::test]
async fn test_download_streams_file_and_reports_progress() {
    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let server = MockServer::start(&[("dream.mp4", payload.as_slice())]).await;
    let dir = tempdir().unwrap();
    let dest = dir.path().join("out/dream.mp4");

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let options = DownloadOptions::new()
        .with_progress(Arc::new(ProgressFn::new(move |p: TransferProgress| {
            sink.lock().unwrap().push(p);
            Ok(())
        })))
        .with_progress_interval(Duration::ZERO);

    let ok = client(&server)
        .download_file(&server.file_url("dream.mp4"), Some(&dest), &options)
        .await;

    assert!(ok);
    assert_eq!(std::fs::read(&dest).unwrap(), payload);
    let last = *seen.lock().unwrap().last().unwrap();
    assert_eq!(last, TransferProgress::new(4096, 4096));
}

#[tokio::test]
async fn test_empty_download_is_failure() {
    let server = MockServer::start(&[("empty.bin", &b""[..])]).await;
    let dir = tempdir().unwrap();
    let dest = dir.path().join("empty.bin");
    let client = client(&server);

    assert!(
        !client
            .download_file(&server.file_url("empty.bin"), Some(&dest), &DownloadOptions::new())
            .await
    );
    assert!(matches!(
        client
            .try_download_file(&server.file_url("empty.bin"), Some(&dest), &DownloadOptions::new())
            .await,
        Err(DownloadError::Empty { .. })
    ));
}

#[tokio::test]
async fn test_missing_object_reports_status() {
    let server = MockServer::start(&[]).await;
    let dir = tempdir().unwrap();
    let dest = dir.path().join("gone.mp4");

    let err = client(&server)
        .try_download_file(&server.file_url("gone.mp4"), Some(&dest), &DownloadOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Status { status: 404 }));
    assert!(!err.is_retryable());
}
