//! Asset download with progress reporting.
//!
//! An [`AssetFetcher`] streams a URL to a destination path, invoking a
//! progress callback as bytes arrive. The pipeline translates those
//! callbacks into progress-sink updates: the percentage done as the value,
//! and a humanized "time left" string as the label.

use std::path::Path;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use indicatif::{HumanBytes, HumanDuration};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::constants::USER_AGENT;
use crate::core::UpdateError;

/// A snapshot of download progress, handed to the progress callback on every
/// received chunk.
#[derive(Debug, Clone, Copy)]
pub struct DownloadProgress {
    /// Time elapsed since the download started.
    pub elapsed: Duration,
    /// Bytes written so far.
    pub downloaded: u64,
    /// Total size in bytes, when the server reported one.
    pub total: Option<u64>,
}

/// Callback invoked with [`DownloadProgress`] snapshots during a fetch.
pub type ProgressFn<'a> = Box<dyn FnMut(DownloadProgress) + Send + 'a>;

/// Downloads release assets to local files.
pub trait AssetFetcher: Send + Sync {
    /// Download `url` into `dest`, reporting progress along the way.
    ///
    /// On success the file at `dest` holds the complete asset. Failures
    /// surface as [`UpdateError::DownloadFailed`] (or
    /// [`UpdateError::IoError`] for local filesystem problems); partial
    /// files may remain at `dest` and are overwritten by the next attempt.
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
        on_progress: ProgressFn<'a>,
    ) -> BoxFuture<'a, Result<(), UpdateError>>;
}

impl<T: AssetFetcher + ?Sized> AssetFetcher for std::sync::Arc<T> {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
        on_progress: ProgressFn<'a>,
    ) -> BoxFuture<'a, Result<(), UpdateError>> {
        (**self).fetch(url, dest, on_progress)
    }
}

/// Render the download label shown next to the progress bar:
/// `Time left: 10 seconds (512 B/1.00 KiB)`.
///
/// The estimate is a straight-line extrapolation of the observed rate; when
/// the total size is unknown or nothing has arrived yet, the time left reads
/// `--`.
pub fn progress_label(progress: &DownloadProgress) -> String {
    match progress.total {
        Some(total) if progress.downloaded > 0 => {
            let remaining = total.saturating_sub(progress.downloaded);
            let time_left = progress
                .elapsed
                .mul_f64(remaining as f64 / progress.downloaded as f64);
            format!(
                "Time left: {} ({}/{})",
                HumanDuration(time_left),
                HumanBytes(progress.downloaded),
                HumanBytes(total)
            )
        }
        Some(total) => format!(
            "Time left: -- ({}/{})",
            HumanBytes(progress.downloaded),
            HumanBytes(total)
        ),
        None => format!("Time left: -- ({}/--)", HumanBytes(progress.downloaded)),
    }
}

/// [`AssetFetcher`] implementation streaming over HTTP.
pub struct HttpAssetFetcher {
    client: Client,
}

impl HttpAssetFetcher {
    /// Create a fetcher with a dedicated HTTP client.
    ///
    /// Downloads carry no request timeout: large assets on slow links may
    /// legitimately take longer than any fixed bound, and a stalled transfer
    /// still fails through the connection itself.
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to construct HTTP client for asset download");
        Self { client }
    }
}

impl Default for HttpAssetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetFetcher for HttpAssetFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
        mut on_progress: ProgressFn<'a>,
    ) -> BoxFuture<'a, Result<(), UpdateError>> {
        Box::pin(async move {
            let download_error = |err: reqwest::Error| UpdateError::DownloadFailed {
                url: url.to_string(),
                reason: err.to_string(),
            };

            debug!("downloading {url} -> {}", dest.display());
            let started = Instant::now();

            let mut response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(download_error)?
                .error_for_status()
                .map_err(download_error)?;

            let total = response.content_length();
            let mut file = tokio::fs::File::create(dest).await?;
            let mut downloaded: u64 = 0;

            while let Some(chunk) = response.chunk().await.map_err(download_error)? {
                file.write_all(&chunk).await?;
                downloaded += chunk.len() as u64;
                on_progress(DownloadProgress {
                    elapsed: started.elapsed(),
                    downloaded,
                    total,
                });
            }

            file.flush().await?;
            debug!("downloaded {downloaded} bytes");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_extrapolates_time_left() {
        let label = progress_label(&DownloadProgress {
            elapsed: Duration::from_secs(10),
            downloaded: 50,
            total: Some(100),
        });
        // 50 bytes took 10s, so the remaining 50 take another 10s.
        assert!(label.starts_with("Time left:"), "{label}");
        assert!(label.contains("10 seconds"), "{label}");
        assert!(label.contains('/'), "{label}");
    }

    #[test]
    fn label_degrades_without_a_total() {
        let label = progress_label(&DownloadProgress {
            elapsed: Duration::from_secs(1),
            downloaded: 42,
            total: None,
        });
        assert!(label.contains("--"), "{label}");
    }

    #[test]
    fn label_degrades_before_first_byte() {
        let label = progress_label(&DownloadProgress {
            elapsed: Duration::ZERO,
            downloaded: 0,
            total: Some(100),
        });
        assert!(label.contains("--"), "{label}");
    }
}
