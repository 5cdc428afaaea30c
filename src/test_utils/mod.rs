//! Mock collaborators for pipeline tests.
//!
//! Available to unit tests and, behind the `test-utils` feature, to the
//! integration suite. Everything here is deterministic and network-free.

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::BoxFuture;

use crate::catalog::ReleaseAsset;
use crate::core::UpdateError;
use crate::fetch::{AssetFetcher, DownloadProgress, ProgressFn};
use crate::install::{Handoff, ProcessReplacer};
use crate::source::{ReleaseSource, RemoteRelease};
use crate::utils::progress::ProgressSink;

/// Build a [`RemoteRelease`] from a tag and asset names, with download URLs
/// derived from the asset names.
pub fn remote_release(tag: &str, assets: &[&str]) -> RemoteRelease {
    RemoteRelease {
        tag_name: tag.to_string(),
        assets: assets
            .iter()
            .map(|name| ReleaseAsset {
                name: (*name).to_string(),
                browser_download_url: format!("https://example.invalid/{name}"),
            })
            .collect(),
    }
}

/// Release source serving a canned listing.
pub struct StaticSource {
    releases: Vec<RemoteRelease>,
}

impl StaticSource {
    pub fn new(releases: Vec<RemoteRelease>) -> Self {
        Self { releases }
    }

    /// A source with no releases at all.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl ReleaseSource for StaticSource {
    fn list_releases<'a>(
        &'a self,
        _owner: &'a str,
        _repo: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RemoteRelease>, UpdateError>> {
        Box::pin(async move { Ok(self.releases.clone()) })
    }
}

/// Release source that always fails with a network error.
pub struct FailingSource;

impl ReleaseSource for FailingSource {
    fn list_releases<'a>(
        &'a self,
        _owner: &'a str,
        _repo: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RemoteRelease>, UpdateError>> {
        Box::pin(async move {
            Err(UpdateError::NetworkError {
                operation: "list releases".to_string(),
                reason: "connection refused".to_string(),
            })
        })
    }
}

/// Asset fetcher that writes a small payload and emits synthetic progress,
/// or fails without touching the destination.
pub struct MockFetcher {
    succeed: bool,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn succeeding() -> Self {
        Self {
            succeed: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `fetch` has been invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AssetFetcher for MockFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
        mut on_progress: ProgressFn<'a>,
    ) -> BoxFuture<'a, Result<(), UpdateError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.succeed {
                return Err(UpdateError::DownloadFailed {
                    url: url.to_string(),
                    reason: "simulated failure".to_string(),
                });
            }
            for downloaded in [25u64, 50, 100] {
                on_progress(DownloadProgress {
                    elapsed: Duration::from_millis(downloaded),
                    downloaded,
                    total: Some(100),
                });
            }
            tokio::fs::write(dest, b"new binary").await?;
            Ok(())
        })
    }
}

/// Progress sink recording the events it receives.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressSink for RecordingSink {
    fn start(&self, title: &str, length: u64, _label: &str) {
        self.record(format!("start:{title}:{length}"));
    }

    fn set_value(&self, value: f64) {
        self.record(format!("value:{value:.0}"));
    }

    fn set_label(&self, label: &str) {
        self.record(format!("label:{label}"));
    }

    fn done(&self) {
        self.record("done".to_string());
    }
}

/// Process replacer that records the swap instead of performing it.
#[derive(Default)]
pub struct MockReplacer {
    calls: AtomicUsize,
}

impl MockReplacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProcessReplacer for MockReplacer {
    fn replace(
        &self,
        _update_file: &Path,
        _executable: &Path,
    ) -> Result<Handoff, UpdateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Handoff::ready())
    }
}
