use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;
use updraft_cli::config::UpdateConfig;
use updraft_cli::pipeline::{UpdateHooks, UpdatePipeline};
use updraft_cli::test_utils::{
    MockFetcher, MockReplacer, RecordingSink, StaticSource, remote_release,
};
use updraft_cli::version::Channel;

/// A beta-channel upgrade from 0.0.3 runs through every stage and ends in a
/// restart handoff, with the asset staged next to the executable.
#[tokio::test]
async fn beta_upgrade_runs_end_to_end() {
    let temp = TempDir::new().unwrap();
    let replacer = Arc::new(MockReplacer::new());
    let cancels = Arc::new(AtomicUsize::new(0));

    let config = UpdateConfig::new(
        "acme",
        "app",
        "0.0.3",
        temp.path().join("app"),
        "example.zip",
    )
    .channel(Channel::Beta)
    .auto_update(true)
    .download_dir(temp.path());

    let hook_cancels = Arc::clone(&cancels);
    let mut pipeline = UpdatePipeline::new(
        config,
        Box::new(StaticSource::new(vec![
            remote_release("v0.0.3-beta.x.1", &["example.zip"]),
            remote_release("v0.0.4-beta.x.1", &["example.zip"]),
        ])),
        Box::new(MockFetcher::succeeding()),
        Box::new(RecordingSink::new()),
        Box::new(Arc::clone(&replacer)),
    )
    .unwrap()
    .with_hooks(UpdateHooks::new().cancel(move || {
        hook_cancels.fetch_add(1, Ordering::SeqCst);
    }));

    let handoff = pipeline.run_cycle().await.unwrap();
    assert!(handoff.is_some());
    assert_eq!(
        pipeline.latest_candidate().unwrap().version().raw(),
        "0.0.4-beta.x.1"
    );
    assert!(temp.path().join("update").exists());
    assert_eq!(replacer.calls(), 1);
    assert_eq!(cancels.load(Ordering::SeqCst), 0);
}

/// A rejecting pre-update hook stops the cycle before any download and the
/// cancel hook fires exactly once.
#[tokio::test]
async fn rejected_update_never_downloads() {
    let temp = TempDir::new().unwrap();
    let fetcher = Arc::new(MockFetcher::succeeding());
    let cancels = Arc::new(AtomicUsize::new(0));

    let config = UpdateConfig::new(
        "acme",
        "app",
        "0.0.1",
        temp.path().join("app"),
        "example.zip",
    )
    .auto_update(true)
    .download_dir(temp.path());

    let hook_cancels = Arc::clone(&cancels);
    let mut pipeline = UpdatePipeline::new(
        config,
        Box::new(StaticSource::new(vec![remote_release(
            "0.0.2",
            &["example.zip"],
        )])),
        Box::new(Arc::clone(&fetcher)),
        Box::new(RecordingSink::new()),
        Box::new(MockReplacer::new()),
    )
    .unwrap()
    .with_hooks(
        UpdateHooks::new()
            .pre_update(|| false)
            .cancel(move || {
                hook_cancels.fetch_add(1, Ordering::SeqCst);
            }),
    );

    let handoff = pipeline.run_cycle().await.unwrap();
    assert!(handoff.is_none());
    assert_eq!(fetcher.calls(), 0);
    assert_eq!(cancels.load(Ordering::SeqCst), 1);
}

/// Running against an up-to-date install is a clean no-op: no cancel, no
/// download, no handoff.
#[tokio::test]
async fn up_to_date_install_is_a_no_op() {
    let temp = TempDir::new().unwrap();
    let cancels = Arc::new(AtomicUsize::new(0));

    let config = UpdateConfig::new(
        "acme",
        "app",
        "0.0.2",
        temp.path().join("app"),
        "example.zip",
    )
    .auto_update(true)
    .download_dir(temp.path());

    let hook_cancels = Arc::clone(&cancels);
    let mut pipeline = UpdatePipeline::new(
        config,
        Box::new(StaticSource::new(vec![remote_release(
            "0.0.2",
            &["example.zip"],
        )])),
        Box::new(MockFetcher::succeeding()),
        Box::new(RecordingSink::new()),
        Box::new(MockReplacer::new()),
    )
    .unwrap()
    .with_hooks(UpdateHooks::new().cancel(move || {
        hook_cancels.fetch_add(1, Ordering::SeqCst);
    }));

    let handoff = pipeline.run_cycle().await.unwrap();
    assert!(handoff.is_none());
    assert_eq!(pipeline.latest_remote().unwrap().raw(), "0.0.2");
    assert_eq!(cancels.load(Ordering::SeqCst), 0);
}
