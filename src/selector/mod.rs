//! Candidate selection for one version-check cycle.
//!
//! Given the current version, a requested channel, and a fresh
//! [`ReleaseCatalog`], the [`CandidateSelector`] computes two things:
//!
//! - `latest_remote`: the highest version among all channel- and
//!   branch-compatible releases, whether or not it exceeds the current
//!   version. This is the "what's out there" answer for reporting.
//! - `candidates`: the subset that additionally exceeds the current version
//!   strictly. The highest candidate is the actual upgrade target.
//!
//! The asymmetry is deliberate: a caller can tell "a qualifying release
//! exists" apart from "it's actually newer than what I have".

use tracing::debug;

use crate::catalog::{Release, ReleaseCatalog};
use crate::version::{Channel, Version};

/// Per-cycle candidate state. Rebuilt by [`build_candidates`] on every check;
/// holding one across cycles only makes sense between a check and the
/// download/install that follows it.
///
/// [`build_candidates`]: CandidateSelector::build_candidates
#[derive(Debug)]
pub struct CandidateSelector {
    current: Version,
    channel: Channel,
    branch: Option<String>,
    candidates: ReleaseCatalog,
    latest_remote: Option<Version>,
}

impl CandidateSelector {
    /// Create a selector for `current` on `channel`. The branch constraint
    /// defaults to the branch carried by `current` (if any).
    pub fn new(current: Version, channel: Channel) -> Self {
        let branch = current.branch().map(str::to_string);
        Self {
            current,
            channel,
            branch,
            candidates: ReleaseCatalog::new(),
            latest_remote: None,
        }
    }

    /// Override the branch constraint instead of deriving it from the
    /// current version.
    pub fn with_branch_override(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    /// Scan `available` and rebuild the candidate set.
    ///
    /// For each release: skip it when its channel ranks below the requested
    /// channel; skip it when a branch constraint is set and the release's
    /// branch differs. Among the survivors, track the maximum version as
    /// `latest_remote` *before* the strictly-greater-than-current filter;
    /// releases that also exceed the current version become candidates.
    ///
    /// Returns `true` iff at least one candidate was found.
    pub fn build_candidates(&mut self, available: &ReleaseCatalog) -> bool {
        self.candidates = ReleaseCatalog::new();
        self.latest_remote = None;

        for release in available.iter() {
            let version = release.version();

            if version.channel() < self.channel {
                debug!("skipping release on channel: {}", version.channel());
                continue;
            }

            if let Some(branch) = self.branch.as_deref()
                && version.branch() != Some(branch)
            {
                debug!(
                    "skipping different branch; own: {} remote: {:?}",
                    branch,
                    version.branch()
                );
                continue;
            }

            if self.latest_remote.as_ref().map_or(true, |latest| latest < version) {
                self.latest_remote = Some(version.clone());
                debug!("latest remote: \"{version}\"");
            }

            debug!(
                "comparing current with remote: \"{}\" vs \"{version}\"",
                self.current
            );
            if version > &self.current {
                debug!("this version is newer: {version}");
                self.candidates.insert(release.clone());
            }
        }

        match &self.latest_remote {
            Some(latest) => debug!("latest remote version: {}", latest.raw()),
            None => debug!("no remote version found"),
        }

        !self.candidates.is_empty()
    }

    /// The highest-ordered candidate - the upgrade target - or `None` when
    /// no candidate survived the filters.
    pub fn latest_candidate(&self) -> Option<&Release> {
        self.candidates.latest()
    }

    /// The best channel/branch-compatible remote version seen, even when it
    /// does not exceed the current version.
    pub fn latest_remote(&self) -> Option<&Version> {
        self.latest_remote.as_ref()
    }

    /// The candidate set built by the last [`build_candidates`] call.
    ///
    /// [`build_candidates`]: CandidateSelector::build_candidates
    pub fn candidates(&self) -> &ReleaseCatalog {
        &self.candidates
    }

    /// The version this selector compares against.
    pub fn current(&self) -> &Version {
        &self.current
    }

    /// The requested channel.
    pub fn channel(&self) -> Channel {
        self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(versions: &[&str]) -> ReleaseCatalog {
        let mut catalog = ReleaseCatalog::new();
        for raw in versions {
            catalog.insert(Release::new(Version::parse(raw).unwrap(), Vec::new()));
        }
        catalog
    }

    fn selector(current: &str, channel: Channel) -> CandidateSelector {
        CandidateSelector::new(Version::parse(current).unwrap(), channel)
    }

    #[test]
    fn simple_stable_upgrade() {
        let mut sel = selector("0.0.1", Channel::Stable);
        assert!(sel.build_candidates(&catalog(&["0.0.2"])));
        assert_eq!(sel.latest_candidate().unwrap().version().raw(), "0.0.2");
    }

    #[test]
    fn prerelease_of_current_is_not_an_upgrade() {
        // 0.0.2-dev.1 passes the stable < dev rank filter but sorts below
        // the 0.0.2 release, so no candidate remains.
        let mut sel = selector("0.0.2", Channel::Stable);
        assert!(!sel.build_candidates(&catalog(&["0.0.2-dev.1"])));
        assert!(sel.latest_candidate().is_none());
    }

    #[test]
    fn channel_matrix_against_fixture_catalog() {
        let available = catalog(&[
            "0.0.2",
            "0.0.3-dev.1",
            "0.0.4-beta.main.1",
            "0.0.6-alpha.main.3",
        ]);
        let cases = [
            ("0.0.1", Channel::Stable, true),
            ("0.0.2", Channel::Stable, false),
            ("0.0.2", Channel::Dev, true),
            ("0.0.3", Channel::Dev, false),
            ("0.0.3", Channel::Beta, true),
            ("0.0.4", Channel::Beta, false),
            ("0.0.4", Channel::Alpha, true),
            ("0.0.6", Channel::Alpha, false),
        ];
        for (current, channel, expected) in cases {
            let mut sel = selector(current, channel);
            assert_eq!(
                sel.build_candidates(&available),
                expected,
                "current={current} channel={channel}"
            );
        }
    }

    #[test]
    fn branch_must_match_when_current_carries_one() {
        let mut sel = selector("0.0.1-alpha.branch1.1", Channel::Alpha);
        assert!(sel.build_candidates(&catalog(&["0.0.2-alpha.branch1.2"])));

        let mut sel = selector("0.0.1-alpha.branch1.1", Channel::Alpha);
        assert!(!sel.build_candidates(&catalog(&["0.0.2-alpha.branch2.3"])));
        assert!(sel.latest_remote().is_none());
    }

    #[test]
    fn branchless_current_accepts_branch_tagged_releases() {
        // A current version without a branch places no branch constraint.
        let mut sel = selector("0.0.3", Channel::Beta);
        assert!(sel.build_candidates(&catalog(&["0.0.4-beta.x.1"])));
    }

    #[test]
    fn branch_override_replaces_the_derived_constraint() {
        let mut sel =
            selector("0.0.3", Channel::Beta).with_branch_override(Some("x".to_string()));
        assert!(sel.build_candidates(&catalog(&["0.0.4-beta.x.1"])));

        let mut sel =
            selector("0.0.3", Channel::Beta).with_branch_override(Some("y".to_string()));
        assert!(!sel.build_candidates(&catalog(&["0.0.4-beta.x.1"])));
    }

    #[test]
    fn latest_remote_tracks_even_without_candidates() {
        let mut sel = selector("0.0.5", Channel::Stable);
        assert!(!sel.build_candidates(&catalog(&["0.0.3", "0.0.4"])));
        assert_eq!(sel.latest_remote().unwrap().raw(), "0.0.4");
        assert!(sel.latest_candidate().is_none());
    }

    #[test]
    fn rebuild_replaces_previous_state() {
        let mut sel = selector("0.0.1", Channel::Stable);
        assert!(sel.build_candidates(&catalog(&["0.0.2"])));
        assert!(!sel.build_candidates(&catalog(&[])));
        assert!(sel.latest_candidate().is_none());
        assert!(sel.latest_remote().is_none());
    }
}
