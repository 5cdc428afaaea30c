//! Configuration for an update pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::DOWNLOAD_FILENAME;
use crate::version::Channel;

/// Everything a pipeline needs to know about the repository it updates from
/// and the executable it updates.
///
/// # Examples
///
/// ```rust
/// use updraft_cli::config::UpdateConfig;
/// use updraft_cli::version::Channel;
///
/// let config = UpdateConfig::new("owner", "repo", "0.1.0", "./app", "app.zip")
///     .channel(Channel::Beta)
///     .auto_update(true);
/// assert_eq!(config.channel, Channel::Beta);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// GitHub repository owner.
    pub repo_owner: String,
    /// GitHub repository name.
    pub repo_name: String,
    /// Version of the currently running executable.
    pub current_version: String,
    /// Path to the executable the update replaces (usually self).
    pub executable: PathBuf,
    /// Name of the release asset to download, matched case-insensitively.
    /// Usually identical to the executable name.
    pub asset_name: String,
    /// Channel releases must rank at least as high as. Defaults to stable.
    #[serde(default)]
    pub channel: Channel,
    /// Branch constraint override. When unset, the branch carried by the
    /// current version (if any) applies.
    #[serde(default)]
    pub branch: Option<String>,
    /// Whether a cycle proceeds past the version check into download and
    /// install. Off by default: checking is cheap, replacing a binary is
    /// not a thing to do implicitly.
    #[serde(default)]
    pub auto_update: bool,
    /// Directory the downloaded asset is staged in. Defaults to the
    /// executable's directory.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

impl UpdateConfig {
    /// Create a configuration with the required fields; everything else
    /// takes its default.
    pub fn new(
        repo_owner: impl Into<String>,
        repo_name: impl Into<String>,
        current_version: impl Into<String>,
        executable: impl Into<PathBuf>,
        asset_name: impl Into<String>,
    ) -> Self {
        Self {
            repo_owner: repo_owner.into(),
            repo_name: repo_name.into(),
            current_version: current_version.into(),
            executable: executable.into(),
            asset_name: asset_name.into(),
            channel: Channel::default(),
            branch: None,
            auto_update: false,
            download_dir: None,
        }
    }

    /// Set the release channel.
    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// Override the branch constraint.
    pub fn branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    /// Enable or disable download-and-install after a successful check.
    pub fn auto_update(mut self, auto_update: bool) -> Self {
        self.auto_update = auto_update;
        self
    }

    /// Stage downloads in `dir` instead of the executable's directory.
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    /// Full path the downloaded asset is staged under.
    pub fn download_path(&self) -> PathBuf {
        let dir = match &self.download_dir {
            Some(dir) => dir.clone(),
            None => self
                .executable
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf(),
        };
        dir.join(DOWNLOAD_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let config = UpdateConfig::new("o", "r", "0.1.0", "/opt/app/app", "app.zip");
        assert_eq!(config.channel, Channel::Stable);
        assert!(!config.auto_update);
        assert!(config.branch.is_none());
    }

    #[test]
    fn download_path_defaults_next_to_the_executable() {
        let config = UpdateConfig::new("o", "r", "0.1.0", "/opt/app/app", "app.zip");
        assert_eq!(config.download_path(), PathBuf::from("/opt/app/update"));

        let config = config.download_dir("/tmp/stage");
        assert_eq!(config.download_path(), PathBuf::from("/tmp/stage/update"));
    }

    #[test]
    fn bare_executable_name_stages_in_the_current_directory() {
        let config = UpdateConfig::new("o", "r", "0.1.0", "app", "app.zip");
        assert_eq!(config.download_path(), PathBuf::from("./update"));
    }
}
