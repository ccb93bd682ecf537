//! Streaming download to disk
//!
//! Bytes are written to the destination as they arrive. The downloader
//! never leaves a partial file behind: on a transport error, a short read or
//! a user interrupt the destination is removed before the error is returned.

use futures_util::StreamExt;
use std::fs::{self, File};
use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use toolfetch_core::types::NetworkConfig;
use toolfetch_core::utils::human_readable_size;
use tracing::{debug, info, warn};

use crate::asset::{DownloadResult, RemoteAsset};
use crate::error::{Error, Result};
use crate::progress::ProgressObserver;

/// HTTP downloader writing response bodies straight to disk
pub struct StreamingDownloader {
    /// HTTP client
    client: reqwest::Client,

    /// Extra headers sent with every request
    headers: Vec<(String, String)>,
}

impl StreamingDownloader {
    /// Create a new downloader using the configured download timeout
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .connect_timeout(Duration::from_secs(network.http_timeout_secs))
            .timeout(Duration::from_secs(network.download_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            headers: Vec::new(),
        })
    }

    /// Send these headers with every download request
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    /// Download `asset` to `dest`, aborting on Ctrl-C
    pub async fn download(
        &self,
        asset: &RemoteAsset,
        dest: &Path,
        progress: &dyn ProgressObserver,
    ) -> Result<DownloadResult> {
        self.download_with_shutdown(asset, dest, progress, interrupted())
            .await
    }

    /// Download `asset` to `dest`, aborting as soon as `shutdown` completes
    pub async fn download_with_shutdown<F>(
        &self,
        asset: &RemoteAsset,
        dest: &Path,
        progress: &dyn ProgressObserver,
        shutdown: F,
    ) -> Result<DownloadResult>
    where
        F: Future<Output = ()>,
    {
        let result = self.stream_to_file(asset, dest, progress, shutdown).await;

        if result.is_err() {
            remove_partial(dest);
        }

        result
    }

    async fn stream_to_file<F>(
        &self,
        asset: &RemoteAsset,
        dest: &Path,
        progress: &dyn ProgressObserver,
        shutdown: F,
    ) -> Result<DownloadResult>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::aborted(&asset.name, e))?;
        }

        let mut request = self.client.get(&asset.url);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        debug!("Requesting {}", asset.url);
        let response = tokio::select! {
            biased;
            _ = &mut shutdown => return Err(Error::aborted(&asset.name, "interrupted")),
            response = request.send() => response.map_err(|e| Error::aborted(&asset.name, e))?,
        };

        if !response.status().is_success() {
            return Err(Error::aborted(
                &asset.name,
                format!("HTTP {}", response.status()),
            ));
        }

        let transport_total = response.content_length();
        if let Some(total) = transport_total {
            if asset.expected_size > 0 && total > 0 && total != asset.expected_size {
                warn!(
                    "Size mismatch for {}: catalog says {} bytes, server sends {} bytes",
                    asset.name, asset.expected_size, total
                );
            }
            info!("Downloading {} ({})", asset.name, human_readable_size(total));
        } else {
            info!("Downloading {} (size unknown)", asset.name);
        }

        let mut file = File::create(dest).map_err(|e| Error::aborted(&asset.name, e))?;
        progress.start(&asset.name, transport_total);

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();

        loop {
            let next = tokio::select! {
                biased;
                _ = &mut shutdown => return Err(Error::aborted(&asset.name, "interrupted")),
                next = stream.next() => next,
            };

            let chunk: bytes::Bytes = match next {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    return Err(stream_error(&asset.name, transport_total, written, e));
                }
                None => break,
            };

            file.write_all(&chunk)
                .map_err(|e| Error::aborted(&asset.name, e))?;
            written += chunk.len() as u64;
            progress.advance(written);
        }

        file.sync_all().map_err(|e| Error::aborted(&asset.name, e))?;
        drop(file);

        let on_disk = fs::metadata(dest)
            .map_err(|e| Error::aborted(&asset.name, e))?
            .len();
        check_completion(&asset.name, transport_total, written, on_disk)?;

        progress.finish(&asset.name);
        debug!("Wrote {} bytes to {}", written, dest.display());

        Ok(DownloadResult {
            local_path: dest.to_path_buf(),
            bytes_written: written,
        })
    }
}

/// Classify a body error: a stream that ends before the announced length is
/// `Incomplete`, anything else is `Aborted`.
fn stream_error(
    name: &str,
    transport_total: Option<u64>,
    written: u64,
    err: impl std::fmt::Display,
) -> Error {
    match transport_total {
        Some(total) if written < total => {
            debug!("Body of {} ended early: {}", name, err);
            Error::Incomplete {
                name: name.to_string(),
                expected: total,
                actual: written,
            }
        }
        _ => Error::aborted(name, err),
    }
}

/// Check the byte counts of a finished stream.
///
/// Bytes written must equal the transport-reported length when one was sent,
/// and the file on disk must hold exactly the bytes written.
pub fn check_completion(
    name: &str,
    transport_total: Option<u64>,
    written: u64,
    on_disk: u64,
) -> Result<()> {
    if let Some(total) = transport_total {
        if written != total {
            return Err(Error::Incomplete {
                name: name.to_string(),
                expected: total,
                actual: written,
            });
        }
    }

    if on_disk != written {
        return Err(Error::Incomplete {
            name: name.to_string(),
            expected: written,
            actual: on_disk,
        });
    }

    Ok(())
}

fn remove_partial(dest: &Path) {
    match fs::remove_file(dest) {
        Ok(()) => debug!("Removed partial download {}", dest.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial download {}: {}", dest.display(), e),
    }
}

/// Completes on Ctrl-C
pub(crate) async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available: never interrupt
        std::future::pending::<()>().await;
    }
}

/// Terminates the process on Ctrl-C while alive.
///
/// Once [`interrupted`] has been polled, tokio owns SIGINT for the rest of the
/// process, so stages after the download need this to stay interruptible.
/// Dropping the guard stops listening.
pub(crate) struct InterruptGuard {
    listener: tokio::task::JoinHandle<()>,
}

impl InterruptGuard {
    /// Start listening; must be called inside a tokio runtime
    pub(crate) fn arm() -> Self {
        let listener = tokio::spawn(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted");
                std::process::exit(1);
            }
        });
        Self { listener }
    }

    /// Whether the listener task is still waiting for a signal
    pub(crate) fn is_listening(&self) -> bool {
        !self.listener.is_finished()
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
