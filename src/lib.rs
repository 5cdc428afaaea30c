//! # Updraft - Self-Update Client for GitHub-Released Binaries
//!
//! Updraft keeps a deployed executable current: it lists the releases of a
//! GitHub repository, decides whether a newer release exists on a configured
//! release channel (and optional feature branch), downloads the matching
//! release asset with progress reporting, and hands off to a swap-and-restart
//! script that atomically replaces the running executable.
//!
//! # Architecture
//!
//! The crate is organized around a small set of components:
//!
//! - [`version`] - Semantic version model with channel/branch extraction and
//!   a total ordering that ignores build metadata
//! - [`catalog`] - The set of known remote releases, keyed by version string,
//!   with channel and branch filtering
//! - [`selector`] - Candidate selection: which releases qualify as upgrade
//!   targets for a given current version and channel
//! - [`pipeline`] - The update cycle itself: version-check, candidate
//!   processing, download, and install as strictly sequential async stages
//!   with pre-update/cancel hooks
//!
//! The collaborators a cycle depends on are injected as traits so they can be
//! substituted in tests:
//!
//! - [`source`] - Release listing ([`source::GithubReleaseSource`] talks to
//!   the GitHub API)
//! - [`fetch`] - Asset download with progress callbacks
//! - [`utils::progress`] - Progress sink driving a terminal progress bar
//! - [`install`] - Process replacement via a terminal handoff token
//!
//! # Update Cycle
//!
//! ```text
//! check_for_update ──> process_candidates ──> download_latest ──> install_update
//!       │                     │                     │                    │
//!       │ no update           │ no candidates /     │ download           │ handoff:
//!       │                     │ hook rejected       │ failed             │ swap script
//!       ▼                     ▼                     ▼                    │ + restart
//!     done                cancel hook           cancel hook              ▼
//!                                                                  process exits
//! ```
//!
//! Any stage that fails or is rejected invokes the cancel hook exactly once
//! per cycle. There are no automatic retries; callers re-invoke
//! [`pipeline::UpdatePipeline::check_for_update`] if they want another
//! attempt.
//!
//! # Example
//!
//! ```rust,no_run
//! use updraft_cli::config::UpdateConfig;
//! use updraft_cli::fetch::HttpAssetFetcher;
//! use updraft_cli::install::ScriptRestarter;
//! use updraft_cli::pipeline::UpdatePipeline;
//! use updraft_cli::source::GithubReleaseSource;
//! use updraft_cli::utils::progress::IndicatifSink;
//! use updraft_cli::version::Channel;
//!
//! # async fn example() -> Result<(), updraft_cli::core::UpdateError> {
//! let config = UpdateConfig::new("owner", "repo", "0.1.0", "./app", "app.zip")
//!     .channel(Channel::Stable)
//!     .auto_update(true);
//!
//! let mut pipeline = UpdatePipeline::new(
//!     config,
//!     Box::new(GithubReleaseSource::new()),
//!     Box::new(HttpAssetFetcher::new()),
//!     Box::new(IndicatifSink::new()),
//!     Box::new(ScriptRestarter::new()),
//! )?;
//!
//! if let Some(handoff) = pipeline.run_cycle().await? {
//!     handoff.exit(); // does not return; the restart script takes over
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod fetch;
pub mod install;
pub mod pipeline;
pub mod selector;
pub mod source;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
