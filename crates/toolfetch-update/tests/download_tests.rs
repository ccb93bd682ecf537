//! Integration tests for the streaming downloader
//!
//! Tests cover:
//! - Successful streaming with progress events
//! - Cleanup of the destination on HTTP errors and interrupts
//! - Bodies shorter than their Content-Length
//! - Catalog size mismatches being non-fatal
//! - Forwarding of extra request headers

mod common;

use common::*;
use std::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use toolfetch_core::types::NetworkConfig;
use toolfetch_update::{Error, RemoteAsset, StreamingDownloader};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn downloader() -> StreamingDownloader {
    StreamingDownloader::new(&NetworkConfig::default()).unwrap()
}

#[tokio::test]
async fn test_download_writes_file_and_reports_progress() {
    let server = MockServer::start().await;
    mock_asset_download(&server, JADX_ASSET, FAKE_BINARY_CONTENT).await;

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join(JADX_ASSET);
    let asset = RemoteAsset::new(JADX_ASSET, download_url(&server.uri(), JADX_ASSET));
    let progress = RecordingProgress::default();

    let result = downloader()
        .download_with_shutdown(&asset, &dest, &progress, std::future::pending())
        .await
        .unwrap();

    assert_eq!(result.bytes_written, FAKE_BINARY_CONTENT.len() as u64);
    assert_eq!(result.local_path, dest);
    assert_eq!(fs::read(&dest).unwrap(), FAKE_BINARY_CONTENT);

    let events = progress.events();
    assert_eq!(
        events.first().unwrap(),
        &format!("start {} Some({})", JADX_ASSET, FAKE_BINARY_CONTENT.len())
    );
    assert_eq!(events.last().unwrap(), &format!("finish {}", JADX_ASSET));
}

#[tokio::test]
async fn test_http_error_leaves_no_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/download/{}", JADX_ASSET)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join(JADX_ASSET);
    let asset = RemoteAsset::new(JADX_ASSET, download_url(&server.uri(), JADX_ASSET));

    let result = downloader()
        .download_with_shutdown(&asset, &dest, &toolfetch_update::NoopProgress, std::future::pending())
        .await;

    assert!(matches!(result, Err(Error::Aborted { .. })));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_interrupt_aborts_and_removes_destination() {
    let server = MockServer::start().await;
    mock_asset_download(&server, JADX_ASSET, FAKE_BINARY_CONTENT).await;

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join(JADX_ASSET);
    // A stale file from an earlier run must not survive either
    fs::write(&dest, b"stale").unwrap();
    let asset = RemoteAsset::new(JADX_ASSET, download_url(&server.uri(), JADX_ASSET));

    let result = downloader()
        .download_with_shutdown(&asset, &dest, &toolfetch_update::NoopProgress, async {})
        .await;

    match result {
        Err(Error::Aborted { name, reason }) => {
            assert_eq!(name, JADX_ASSET);
            assert!(reason.contains("interrupted"));
        }
        other => panic!("expected Aborted, got {:?}", other),
    }
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_catalog_size_mismatch_only_warns() {
    let server = MockServer::start().await;
    mock_asset_download(&server, JADX_ASSET, FAKE_BINARY_CONTENT).await;

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join(JADX_ASSET);
    let asset =
        RemoteAsset::new(JADX_ASSET, download_url(&server.uri(), JADX_ASSET)).with_size(999_999);

    let result = downloader()
        .download_with_shutdown(&asset, &dest, &toolfetch_update::NoopProgress, std::future::pending())
        .await
        .unwrap();

    assert_eq!(result.bytes_written, FAKE_BINARY_CONTENT.len() as u64);
    assert!(dest.exists());
}

#[tokio::test]
async fn test_creates_missing_parent_directories() {
    let server = MockServer::start().await;
    mock_asset_download(&server, JADX_ASSET, FAKE_BINARY_CONTENT).await;

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join("a/b/c").join(JADX_ASSET);
    let asset = RemoteAsset::new(JADX_ASSET, download_url(&server.uri(), JADX_ASSET));

    downloader()
        .download_with_shutdown(&asset, &dest, &toolfetch_update::NoopProgress, std::future::pending())
        .await
        .unwrap();

    assert!(dest.is_file());
}

#[tokio::test]
async fn test_extra_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/download/{}", JADX_ASSET)))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(FAKE_BINARY_CONTENT.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join(JADX_ASSET);
    let asset = RemoteAsset::new(JADX_ASSET, download_url(&server.uri(), JADX_ASSET));

    downloader()
        .with_headers(vec![("Authorization".to_string(), "Bearer secret".to_string())])
        .download_with_shutdown(&asset, &dest, &toolfetch_update::NoopProgress, std::future::pending())
        .await
        .unwrap();
}

/// Serve one request announcing `announced` bytes but sending only `body`
async fn truncating_server(announced: usize, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            announced
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(body).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{}/download/{}", addr, JADX_ASSET)
}

#[tokio::test]
async fn test_truncated_body_is_incomplete() {
    let url = truncating_server(100, b"0123456789").await;

    let temp = tempfile::tempdir().unwrap();
    let dest = temp.path().join(JADX_ASSET);
    let asset = RemoteAsset::new(JADX_ASSET, url);

    let result = downloader()
        .download_with_shutdown(&asset, &dest, &toolfetch_update::NoopProgress, std::future::pending())
        .await;

    match result {
        Err(Error::Incomplete {
            name,
            expected,
            actual,
        }) => {
            assert_eq!(name, JADX_ASSET);
            assert_eq!(expected, 100);
            assert!(actual <= 10);
        }
        other => panic!("expected Incomplete, got {:?}", other),
    }
    assert!(!dest.exists());
}
