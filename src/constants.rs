//! Shared constants for the updraft crate.

/// Base URL for the GitHub REST API.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// User agent sent with every request; GitHub rejects anonymous agents.
pub const USER_AGENT: &str = concat!("updraft/", env!("CARGO_PKG_VERSION"));

/// Media type GitHub recommends for REST API requests.
pub const GITHUB_ACCEPT_HEADER: &str = "application/vnd.github+json";

/// Header carrying the GitHub REST API version.
pub const GITHUB_API_VERSION_HEADER: &str = "x-github-api-version";

/// API version updraft pins itself to.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Timeout applied to release listing and download requests, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Filename the downloaded asset is staged under before installation.
pub const DOWNLOAD_FILENAME: &str = "update";

/// Windows batch script performing the swap-and-restart.
pub const RESTART_BATCH: &str = "update.bat";

/// Windows VBScript that runs the batch file without a console window.
pub const RESTART_SILENCER: &str = "update.vbs";

/// Unix shell script performing the swap-and-restart.
pub const RESTART_SHELL: &str = "update.sh";
