//! The set of known remote releases.
//!
//! A [`ReleaseCatalog`] maps raw version strings to [`Release`] entries -
//! one entry per distinct version string, later insertions overwriting
//! earlier ones. The catalog is rebuilt from scratch on every version-check
//! cycle; it is never partially updated, and iteration order carries no
//! meaning beyond the `BTreeMap` key order.
//!
//! Filtering follows the channel rank order from [`crate::version::Channel`]:
//! a filter for channel `C` keeps every entry whose channel ranks at least as
//! high as `C`. Branch filtering additionally drops branch-tagged entries
//! whose branch differs from the caller's - including when the caller has no
//! branch at all.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::core::UpdateError;
use crate::version::{Channel, Version};

/// A named downloadable file attached to a release, as served by the
/// GitHub-style release listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset filename, e.g. `app-x86_64-linux.tar.gz`.
    pub name: String,
    /// Direct download URL for the asset bytes.
    pub browser_download_url: String,
}

/// A single remote release: a parsed version plus its downloadable assets.
#[derive(Debug, Clone)]
pub struct Release {
    version: Version,
    assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Create a release from an already-parsed version and its assets.
    pub fn new(version: Version, assets: Vec<ReleaseAsset>) -> Self {
        Self { version, assets }
    }

    /// The release version.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// All assets attached to the release.
    pub fn assets(&self) -> &[ReleaseAsset] {
        &self.assets
    }

    /// Download URL of the asset whose name matches `filename`.
    ///
    /// The match is a case-insensitive exact comparison: requesting
    /// `example.zip` finds an asset named `EXAMPLE.ZIP`. Returns `None` when
    /// no asset matches.
    pub fn asset_download_url(&self, filename: &str) -> Option<&str> {
        debug!("found {} assets", self.assets.len());
        for asset in &self.assets {
            debug!("eval asset: {}", asset.name);
            if asset.name.eq_ignore_ascii_case(filename) {
                debug!(
                    "asset found, returning download url: {}",
                    asset.browser_download_url
                );
                return Some(&asset.browser_download_url);
            }
        }
        None
    }
}

/// Mutable collection of remote releases, keyed by raw version string.
///
/// Invariant: every entry's key equals `entry.version().raw()`.
#[derive(Debug, Clone, Default)]
pub struct ReleaseCatalog {
    entries: BTreeMap<String, Release>,
}

impl ReleaseCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from raw release-listing entries.
    ///
    /// Tag names may carry a leading `v` (GitHub convention); it is stripped
    /// before parsing. Fails fast on the first tag that is not a valid
    /// channel-classified version.
    pub fn from_remote(
        releases: Vec<crate::source::RemoteRelease>,
    ) -> Result<Self, UpdateError> {
        let mut catalog = Self::new();
        for remote in releases {
            let tag = remote
                .tag_name
                .strip_prefix('v')
                .unwrap_or(&remote.tag_name);
            let version = Version::parse(tag)?;
            debug!("release found: {} ({})", version, version.channel());
            catalog.insert(Release::new(version, remote.assets));
        }
        Ok(catalog)
    }

    /// Insert a release, silently overwriting any entry with the same raw
    /// version string. Returns the displaced entry, if any.
    pub fn insert(&mut self, release: Release) -> Option<Release> {
        self.entries
            .insert(release.version().raw().to_string(), release)
    }

    /// Strict insertion: fails with [`UpdateError::DuplicateVersion`] when an
    /// entry with the same raw version string already exists.
    pub fn try_insert(&mut self, release: Release) -> Result<(), UpdateError> {
        let key = release.version().raw().to_string();
        if self.entries.contains_key(&key) {
            return Err(UpdateError::DuplicateVersion { version: key });
        }
        self.entries.insert(key, release);
        Ok(())
    }

    /// Look up a release by its raw version string.
    pub fn get(&self, raw: &str) -> Option<&Release> {
        self.entries.get(raw)
    }

    /// Number of releases in the catalog.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no releases.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the releases.
    pub fn iter(&self) -> impl Iterator<Item = &Release> {
        self.entries.values()
    }

    /// Keep only releases whose channel ranks at least as high as `channel`.
    ///
    /// Requesting `alpha` keeps everything; requesting `stable` keeps only
    /// stable releases.
    pub fn filter_by_channel(&self, channel: Channel) -> Self {
        let mut filtered = Self::new();
        for release in self.iter() {
            if release.version().channel() < channel {
                debug!(
                    "skipping release on channel: {}",
                    release.version().channel()
                );
                continue;
            }
            filtered.insert(release.clone());
        }
        filtered
    }

    /// Channel filter followed by a branch compatibility filter.
    ///
    /// An entry that carries a branch survives only when it equals `branch`;
    /// in particular a branch-tagged entry is dropped whenever the caller's
    /// branch is absent. Entries without a branch (stable/dev/rc) always
    /// pass.
    pub fn filter_by_branch(&self, channel: Channel, branch: Option<&str>) -> Self {
        let mut filtered = Self::new();
        for release in self.filter_by_channel(channel).iter() {
            if let Some(release_branch) = release.version().branch()
                && branch != Some(release_branch)
            {
                debug!(
                    "skipping different branch; own: {:?} remote: {}",
                    branch, release_branch
                );
                continue;
            }
            filtered.insert(release.clone());
        }
        filtered
    }

    /// The release with the highest version, or `None` on an empty catalog.
    pub fn latest(&self) -> Option<&Release> {
        self.entries
            .values()
            .max_by(|a, b| a.version().cmp(b.version()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(raw: &str) -> Release {
        Release::new(Version::parse(raw).unwrap(), Vec::new())
    }

    fn catalog(versions: &[&str]) -> ReleaseCatalog {
        let mut catalog = ReleaseCatalog::new();
        for raw in versions {
            catalog.insert(release(raw));
        }
        catalog
    }

    #[test]
    fn insert_overwrites_silently() {
        let mut catalog = ReleaseCatalog::new();
        assert!(catalog.insert(release("0.0.1")).is_none());
        assert!(catalog.insert(release("0.0.1")).is_some());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn try_insert_rejects_duplicates() {
        let mut catalog = ReleaseCatalog::new();
        catalog.try_insert(release("0.0.1")).unwrap();
        let err = catalog.try_insert(release("0.0.1")).unwrap_err();
        assert!(matches!(err, UpdateError::DuplicateVersion { .. }));
    }

    #[test]
    fn keys_follow_the_raw_version_string() {
        let catalog = catalog(&["0.0.1", "0.0.2-dev.1"]);
        assert!(catalog.get("0.0.2-dev.1").is_some());
        assert!(catalog.get("0.0.2").is_none());
    }

    #[test]
    fn channel_filter_keeps_higher_ranks() {
        let catalog = catalog(&[
            "0.0.1-alpha.x.1",
            "0.0.2-beta.x.1",
            "0.0.3-dev.1",
            "0.0.4-rc.1",
            "0.0.5",
        ]);

        assert_eq!(catalog.filter_by_channel(Channel::Alpha).len(), 5);
        assert_eq!(catalog.filter_by_channel(Channel::Dev).len(), 3);
        let stable = catalog.filter_by_channel(Channel::Stable);
        assert_eq!(stable.len(), 1);
        assert!(stable.get("0.0.5").is_some());
    }

    #[test]
    fn branch_filter_drops_mismatched_branches() {
        let catalog = catalog(&["0.0.1-alpha.one.1", "0.0.2-alpha.two.1", "0.0.3"]);

        let one = catalog.filter_by_branch(Channel::Alpha, Some("one"));
        assert!(one.get("0.0.1-alpha.one.1").is_some());
        assert!(one.get("0.0.2-alpha.two.1").is_none());
        // Branch-less entries always pass.
        assert!(one.get("0.0.3").is_some());
    }

    #[test]
    fn absent_caller_branch_excludes_branch_tagged_entries() {
        let catalog = catalog(&["0.0.1-alpha.one.1", "0.0.3"]);
        let filtered = catalog.filter_by_branch(Channel::Alpha, None);
        assert!(filtered.get("0.0.1-alpha.one.1").is_none());
        assert!(filtered.get("0.0.3").is_some());
    }

    #[test]
    fn latest_picks_the_highest_version() {
        let catalog = catalog(&["0.0.1", "0.0.3", "0.0.2", "0.0.3-rc.1"]);
        assert_eq!(catalog.latest().unwrap().version().raw(), "0.0.3");
        assert!(ReleaseCatalog::new().latest().is_none());
    }

    #[test]
    fn asset_lookup_is_case_insensitive() {
        let release = Release::new(
            Version::parse("0.0.2").unwrap(),
            vec![ReleaseAsset {
                name: "EXAMPLE.ZIP".to_string(),
                browser_download_url: "https://example.invalid/example.zip".to_string(),
            }],
        );
        assert_eq!(
            release.asset_download_url("example.zip"),
            Some("https://example.invalid/example.zip")
        );
        assert!(release.asset_download_url("other.zip").is_none());
    }
}
