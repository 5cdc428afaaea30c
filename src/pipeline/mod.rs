//! The update pipeline: one cancellable cycle from version check to restart
//! handoff.
//!
//! [`UpdatePipeline`] orchestrates the four stages of an update over
//! injected collaborators:
//!
//! 1. **Check** - fetch the release listing, rebuild the catalog, run
//!    candidate selection
//! 2. **Process** - consult the pre-update hook, pick the upgrade target
//! 3. **Download** - stream the matching asset while driving the progress
//!    sink
//! 4. **Install** - hand off to the process replacer, which arranges the
//!    swap-and-restart
//!
//! Stages run strictly sequentially; no stage starts before its predecessor
//! has completed. Concurrent cycles on one pipeline are ruled out by the
//! `&mut self` receivers - callers wanting parallelism need separate
//! pipelines, each with its own progress sink.
//!
//! Every stage that can fail or be rejected invokes the optional cancel hook
//! through a per-cycle guard, so the hook fires exactly once per cycle no
//! matter how many stages subsequently give up. Nothing is retried
//! automatically; a caller that wants another attempt starts a new cycle
//! with [`UpdatePipeline::check_for_update`].

use tracing::{debug, error, info, warn};

use crate::catalog::{Release, ReleaseCatalog};
use crate::config::UpdateConfig;
use crate::core::UpdateError;
use crate::fetch::{AssetFetcher, DownloadProgress, progress_label};
use crate::install::{Handoff, ProcessReplacer};
use crate::selector::CandidateSelector;
use crate::source::ReleaseSource;
use crate::utils::progress::ProgressSink;
use crate::version::{Channel, Version};


/// Pre-update hook: returning `false` cancels the cycle before any download
/// is committed. This is the designed cancellation point.
pub type PreUpdateFn = Box<dyn Fn() -> bool + Send + Sync>;

/// Cancel hook: invoked exactly once per cycle when any stage fails or is
/// rejected.
pub type CancelFn = Box<dyn Fn() + Send + Sync>;

/// Post-check hook: receives the result of candidate processing.
pub type PostCheckFn = Box<dyn Fn(bool) + Send + Sync>;

/// Optional hooks a pipeline invokes synchronously within its stages.
#[derive(Default)]
pub struct UpdateHooks {
    pre_update: Option<PreUpdateFn>,
    cancel: Option<CancelFn>,
    post_check: Option<PostCheckFn>,
}

impl UpdateHooks {
    /// No hooks registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the pre-update hook; if it returns `false` the update
    /// cancels before download.
    pub fn pre_update(mut self, hook: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.pre_update = Some(Box::new(hook));
        self
    }

    /// Register the hook run when the update is cancelled at any point.
    pub fn cancel(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.cancel = Some(Box::new(hook));
        self
    }

    /// Register the hook run after candidate processing with its result.
    pub fn post_check(mut self, hook: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.post_check = Some(Box::new(hook));
        self
    }
}

/// Observable position of a pipeline within its current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// No cycle running.
    Idle,
    /// Fetching the release listing and building candidates.
    Checking,
    /// Check finished without finding an upgrade candidate.
    NoUpdate,
    /// Check finished with at least one candidate.
    CandidatesFound,
    /// The pre-update hook approved (or was not registered).
    Approved,
    /// The pre-update hook rejected the cycle.
    Cancelled,
    /// Asset download in flight.
    Downloading,
    /// Download finished; the update can be installed.
    ReadyToInstall,
    /// Download failed; nothing to install.
    DownloadFailed,
    /// Handing off to the process replacer.
    Installing,
}

/// Orchestrates update cycles for one executable against one repository.
///
/// # Examples
///
/// ```rust,no_run
/// use updraft_cli::config::UpdateConfig;
/// use updraft_cli::fetch::HttpAssetFetcher;
/// use updraft_cli::install::ScriptRestarter;
/// use updraft_cli::pipeline::{UpdateHooks, UpdatePipeline};
/// use updraft_cli::source::GithubReleaseSource;
/// use updraft_cli::utils::progress::IndicatifSink;
///
/// # async fn example() -> Result<(), updraft_cli::core::UpdateError> {
/// let config = UpdateConfig::new("owner", "repo", "0.1.0", "./app", "app.zip")
///     .auto_update(true);
///
/// let mut pipeline = UpdatePipeline::new(
///     config,
///     Box::new(GithubReleaseSource::new()),
///     Box::new(HttpAssetFetcher::new()),
///     Box::new(IndicatifSink::new()),
///     Box::new(ScriptRestarter::new()),
/// )?
/// .with_hooks(UpdateHooks::new().cancel(|| eprintln!("update cancelled")));
///
/// if let Some(handoff) = pipeline.run_cycle().await? {
///     handoff.exit();
/// }
/// # Ok(())
/// # }
/// ```
pub struct UpdatePipeline {
    config: UpdateConfig,
    source: Box<dyn ReleaseSource>,
    fetcher: Box<dyn AssetFetcher>,
    progress: Box<dyn ProgressSink>,
    replacer: Box<dyn ProcessReplacer>,
    hooks: UpdateHooks,
    selector: CandidateSelector,
    latest_candidate: Option<Release>,
    ready_to_install: bool,
    cancel_fired: bool,
    state: CycleState,
}

impl UpdatePipeline {
    /// Build a pipeline from its configuration and collaborators.
    ///
    /// Fails fast with a version-construction error when
    /// `config.current_version` is not a valid channel-classified version.
    pub fn new(
        config: UpdateConfig,
        source: Box<dyn ReleaseSource>,
        fetcher: Box<dyn AssetFetcher>,
        progress: Box<dyn ProgressSink>,
        replacer: Box<dyn ProcessReplacer>,
    ) -> Result<Self, UpdateError> {
        let current = Version::parse(&config.current_version)?;
        let mut selector = CandidateSelector::new(current, config.channel);
        if config.branch.is_some() {
            selector = selector.with_branch_override(config.branch.clone());
        }

        Ok(Self {
            config,
            source,
            fetcher,
            progress,
            replacer,
            hooks: UpdateHooks::default(),
            selector,
            latest_candidate: None,
            ready_to_install: false,
            cancel_fired: false,
            state: CycleState::Idle,
        })
    }

    /// Attach hooks to the pipeline.
    pub fn with_hooks(mut self, hooks: UpdateHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Stage 1: fetch the release listing and build the candidate set.
    ///
    /// Starts a new cycle: resets the ready flag, the cancel guard, and any
    /// previously selected candidate. Returns whether an upgrade candidate
    /// exists. As a side effect [`latest_remote`](Self::latest_remote) is
    /// updated even when nothing qualifies as an upgrade.
    ///
    /// A collaborator failure (network, malformed remote version) fires the
    /// cancel hook and surfaces as the error - there is no retry.
    pub async fn check_for_update(&mut self) -> Result<bool, UpdateError> {
        self.state = CycleState::Checking;
        self.cancel_fired = false;
        self.ready_to_install = false;
        self.latest_candidate = None;

        match self.run_check().await {
            Ok(found) => {
                self.state = if found {
                    CycleState::CandidatesFound
                } else {
                    CycleState::NoUpdate
                };
                Ok(found)
            }
            Err(err) => {
                self.fire_cancel();
                self.state = CycleState::Idle;
                Err(err)
            }
        }
    }

    async fn run_check(&mut self) -> Result<bool, UpdateError> {
        info!(
            "checking for new version on channel: {}",
            self.selector.channel()
        );

        debug!("querying release listing");
        let releases = self
            .source
            .list_releases(&self.config.repo_owner, &self.config.repo_name)
            .await?;

        if releases.is_empty() {
            error!(
                "no release found for \"{}/{}\"",
                self.config.repo_owner, self.config.repo_name
            );
        }

        let available = ReleaseCatalog::from_remote(releases)?;
        let found = self.selector.build_candidates(&available);

        if found {
            info!("new version found, following up");
        } else {
            info!("no new version found");
        }
        Ok(found)
    }

    /// Stage 2: consult the pre-update hook and select the upgrade target.
    ///
    /// Without candidates this fires the cancel hook and returns `false`.
    /// A registered pre-update hook returning `false` also cancels, leaving
    /// the selection state untouched. Otherwise the latest candidate becomes
    /// the target and the result is `true` iff its version differs from the
    /// current one. The post-check hook receives the result either way.
    pub fn process_candidates(&mut self) -> bool {
        let result = self.evaluate_candidates();
        if let Some(post_check) = &self.hooks.post_check {
            post_check(result);
        }
        result
    }

    fn evaluate_candidates(&mut self) -> bool {
        if self.selector.candidates().is_empty() {
            debug!("no release candidate");
            self.fire_cancel();
            self.state = CycleState::Idle;
            return false;
        }

        if let Some(pre_update) = &self.hooks.pre_update {
            debug!("running pre-update hook");
            if !pre_update() {
                debug!("pre-update hook returned false, cancelling update");
                self.fire_cancel();
                self.state = CycleState::Cancelled;
                return false;
            }
        }
        self.state = CycleState::Approved;

        let Some(release) = self.selector.latest_candidate().cloned() else {
            // Candidates were non-empty above; defensive only.
            self.fire_cancel();
            self.state = CycleState::Idle;
            return false;
        };

        debug!("latest candidate: {}", release.version());
        let newer = release.version() != self.selector.current();
        self.latest_candidate = Some(release);
        newer
    }

    /// Stage 3: download the selected candidate's asset.
    ///
    /// Looks up the configured asset filename case-insensitively among the
    /// candidate's assets. A missing asset is logged and leaves the ready
    /// flag false (the cancel hook fires later, at the install stage). A
    /// failed download fires the cancel hook immediately. Returns whether
    /// the update is now ready to install.
    pub async fn download_latest(&mut self) -> Result<bool, UpdateError> {
        self.ready_to_install = false;

        let Some(release) = self.latest_candidate.clone() else {
            warn!("no release to download");
            self.fire_cancel();
            return Ok(false);
        };

        let Some(url) = release.asset_download_url(&self.config.asset_name) else {
            error!(
                "no asset found with filename: {}",
                self.config.asset_name
            );
            return Ok(false);
        };

        self.state = CycleState::Downloading;
        debug!("downloading latest release asset");
        let dest = self.config.download_path();

        self.progress.start("Downloading latest version", 100, "");
        let sink = self.progress.as_ref();
        let on_progress = Box::new(move |data: DownloadProgress| {
            sink.set_label(&progress_label(&data));
            if let Some(total) = data.total
                && total > 0
            {
                sink.set_value(data.downloaded as f64 / total as f64 * 100.0);
            }
        });

        let outcome = self.fetcher.fetch(url, &dest, on_progress).await;
        self.progress.done();

        match outcome {
            Ok(()) => {
                info!("update downloaded to {}", dest.display());
                self.ready_to_install = true;
                self.state = CycleState::ReadyToInstall;
                Ok(true)
            }
            Err(err) => {
                error!("download failed: {err}");
                self.fire_cancel();
                self.state = CycleState::DownloadFailed;
                Ok(false)
            }
        }
    }

    /// Stage 4: hand off to the process replacer.
    ///
    /// With the ready flag set this returns the [`Handoff`] token; the
    /// caller must exit through it, as the swap script is already running.
    /// Without a ready update the cancel hook fires and `None` is returned.
    pub fn install_update(&mut self) -> Result<Option<Handoff>, UpdateError> {
        if !self.ready_to_install {
            debug!("no update to install");
            self.fire_cancel();
            self.state = CycleState::Idle;
            return Ok(None);
        }

        self.state = CycleState::Installing;
        debug!("installing update");
        let update_file = self.config.download_path();
        match self.replacer.replace(&update_file, &self.config.executable) {
            Ok(handoff) => Ok(Some(handoff)),
            Err(err) => {
                self.fire_cancel();
                self.state = CycleState::Idle;
                Err(err)
            }
        }
    }

    /// Run a full cycle: check, process, and - when `auto_update` is
    /// enabled - download and install.
    ///
    /// Returns the handoff token when an update was installed; `None` when
    /// there was nothing to do or the cycle was cancelled along the way.
    pub async fn run_cycle(&mut self) -> Result<Option<Handoff>, UpdateError> {
        if !self.check_for_update().await? {
            return Ok(None);
        }
        if !self.process_candidates() {
            return Ok(None);
        }
        if !self.config.auto_update {
            debug!("auto-update disabled, version check done");
            return Ok(None);
        }
        if !self.download_latest().await? {
            return Ok(None);
        }
        self.install_update()
    }

    /// Run a check and report the best remote version alongside update
    /// availability.
    ///
    /// The two answers are deliberately distinct: the remote version is the
    /// best channel/branch-compatible release out there, whether or not it
    /// exceeds the current version.
    pub async fn get_latest_remote(
        &mut self,
    ) -> Result<(Option<String>, bool), UpdateError> {
        let available = self.check_for_update().await?;
        let latest = self
            .selector
            .latest_remote()
            .map(|version| version.raw().to_string());
        Ok((latest, available))
    }

    /// Process, download and install using the candidates from the previous
    /// check, without re-fetching the release listing.
    pub async fn install_latest_remote(&mut self) -> Result<Option<Handoff>, UpdateError> {
        if !self.process_candidates() {
            return Ok(None);
        }
        if !self.download_latest().await? {
            return Ok(None);
        }
        self.install_update()
    }

    /// Invoke the cancel hook, at most once per cycle.
    fn fire_cancel(&mut self) {
        if self.cancel_fired {
            return;
        }
        self.cancel_fired = true;
        if let Some(cancel) = &self.hooks.cancel {
            debug!("invoking cancel hook");
            cancel();
        }
    }

    /// The version the pipeline compares releases against.
    pub fn current_version(&self) -> &Version {
        self.selector.current()
    }

    /// The channel this pipeline accepts releases from.
    pub fn channel(&self) -> Channel {
        self.selector.channel()
    }

    /// Best remote version seen by the last check, upgrade or not.
    pub fn latest_remote(&self) -> Option<&Version> {
        self.selector.latest_remote()
    }

    /// The selected upgrade target, once candidate processing has run.
    pub fn latest_candidate(&self) -> Option<&Release> {
        self.latest_candidate.as_ref()
    }

    /// Whether a downloaded update is staged and ready to install.
    pub fn is_ready_to_install(&self) -> bool {
        self.ready_to_install
    }

    /// Where the pipeline currently is within its cycle.
    pub fn state(&self) -> CycleState {
        self.state
    }
}
