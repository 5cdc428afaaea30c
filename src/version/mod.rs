//! Semantic version model with release channels and feature branches.
//!
//! Updraft versions are plain semantic versions whose prerelease segment
//! encodes the release channel and, for alpha/beta builds, the feature branch
//! they were cut from:
//!
//! | Version string           | Channel  | Branch   |
//! |--------------------------|----------|----------|
//! | `1.2.3`                  | stable   | -        |
//! | `1.2.3-rc.1`             | rc       | -        |
//! | `1.2.3-dev.42`           | dev      | -        |
//! | `1.2.3-beta.trunk.7`     | beta     | `trunk`  |
//! | `1.2.3-alpha.test.15`    | alpha    | `test`   |
//!
//! Channels form a total rank order (alpha < beta < dev < rc < stable) used
//! when filtering acceptable upgrade sources: requesting channel `C` accepts
//! any release whose channel ranks at least as high as `C`, so `alpha`
//! surfaces everything and `stable` only stable releases.
//!
//! Ordering of [`Version`] values follows semantic-version precedence. Build
//! metadata is preserved in the string form but never participates in
//! ordering or equality: `0.0.0+1 == 0.0.0+999`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::UpdateError;

/// Release maturity tier, ordered from least to most stable.
///
/// The declaration order is the rank order, so the derived `Ord` matches the
/// channel weights used for filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Early feature builds, always tagged with a branch.
    Alpha,
    /// Feature builds considered ready for wider testing, branch-tagged.
    Beta,
    /// Development snapshots from the main line.
    Dev,
    /// Release candidates.
    Rc,
    /// Final releases (no prerelease segment).
    #[default]
    Stable,
}

impl Channel {
    /// Numeric rank of the channel; higher means more stable.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Alpha => 0,
            Self::Beta => 1,
            Self::Dev => 2,
            Self::Rc => 3,
            Self::Stable => 4,
        }
    }

    /// Lowercase channel name, as accepted by [`Channel::from_str`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Dev => "dev",
            Self::Rc => "rc",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = UpdateError;

    /// Parse a channel name. Names are case-sensitive lowercase; anything
    /// else fails with [`UpdateError::UnknownChannel`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpha" => Ok(Self::Alpha),
            "beta" => Ok(Self::Beta),
            "dev" => Ok(Self::Dev),
            "rc" => Ok(Self::Rc),
            "stable" => Ok(Self::Stable),
            _ => Err(UpdateError::UnknownChannel {
                channel: s.to_string(),
            }),
        }
    }
}

/// An immutable version value: the source string, its parsed form, and the
/// channel/branch classification derived from the prerelease segment.
///
/// # Construction
///
/// [`Version::parse`] fails with [`UpdateError::InvalidVersionFormat`] when
/// the string is not valid semver, and with
/// [`UpdateError::UnknownPrereleasePrefix`] when the prerelease segment does
/// not start with a recognized channel prefix.
///
/// # Ordering
///
/// Total order by semantic-version precedence: numeric comparison of
/// major/minor/patch, then prerelease precedence where the absence of a
/// prerelease sorts *above* its presence (a release is newer than any of its
/// own prereleases). Build metadata is ignored for both ordering and
/// equality.
///
/// # Examples
///
/// ```rust
/// use updraft_cli::version::{Channel, Version};
///
/// let version = Version::parse("0.0.0-alpha.test.15").unwrap();
/// assert_eq!(version.channel(), Channel::Alpha);
/// assert_eq!(version.branch(), Some("test"));
/// assert_eq!(version.raw(), "0.0.0-alpha.test.15");
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    parsed: semver::Version,
    channel: Channel,
    branch: Option<String>,
}

impl Version {
    /// Parse a version string and classify its channel and branch.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::InvalidVersionFormat`] when `raw` is not valid
    ///   semantic-version syntax
    /// - [`UpdateError::UnknownPrereleasePrefix`] when the prerelease segment
    ///   matches none of `alpha.`, `beta.`, `dev`, `rc`
    pub fn parse(raw: &str) -> Result<Self, UpdateError> {
        let parsed =
            semver::Version::parse(raw).map_err(|_| UpdateError::InvalidVersionFormat {
                version: raw.to_string(),
            })?;

        let (channel, branch) =
            classify_prerelease(parsed.pre.as_str()).ok_or_else(|| {
                UpdateError::UnknownPrereleasePrefix {
                    version: raw.to_string(),
                    prerelease: parsed.pre.to_string(),
                }
            })?;

        Ok(Self {
            raw: raw.to_string(),
            parsed,
            channel,
            branch,
        })
    }

    /// The exact source string this version was parsed from, build metadata
    /// included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The release channel derived from the prerelease segment.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// The feature branch, present only on alpha/beta versions.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }
}

/// Derive channel and branch from a prerelease segment.
///
/// The branch is the identifier immediately following the `alpha.`/`beta.`
/// prefix: `alpha.test.15` yields `test`.
fn classify_prerelease(pre: &str) -> Option<(Channel, Option<String>)> {
    if pre.is_empty() {
        return Some((Channel::Stable, None));
    }
    if let Some(rest) = pre.strip_prefix("alpha.") {
        return Some((Channel::Alpha, Some(branch_token(rest))));
    }
    if let Some(rest) = pre.strip_prefix("beta.") {
        return Some((Channel::Beta, Some(branch_token(rest))));
    }
    if pre.starts_with("dev") {
        return Some((Channel::Dev, None));
    }
    if pre.starts_with("rc") {
        return Some((Channel::Rc, None));
    }
    None
}

fn branch_token(rest: &str) -> String {
    match rest.split_once('.') {
        Some((token, _)) => token.to_string(),
        None => rest.to_string(),
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = UpdateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Ord for Version {
    /// Semantic-version precedence; build metadata never participates.
    fn cmp(&self, other: &Self) -> Ordering {
        let a = &self.parsed;
        let b = &other.parsed;
        a.major
            .cmp(&b.major)
            .then_with(|| a.minor.cmp(&b.minor))
            .then_with(|| a.patch.cmp(&b.patch))
            .then_with(|| match (a.pre.is_empty(), b.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                // A release version is newer than any of its prereleases.
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => a.pre.cmp(&b.pre),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_the_source_string() {
        for raw in ["0.0.0+1", "0.0.0-dev.13", "0.0.0-alpha.test.15", "1.2.3"] {
            let version = Version::parse(raw).unwrap();
            assert_eq!(version.raw(), raw);
            assert_eq!(version.to_string(), raw);
        }
    }

    #[test]
    fn channel_and_branch_classification() {
        let cases = [
            ("0.0.0+1", Channel::Stable, None),
            ("0.0.0-dev.13", Channel::Dev, None),
            ("0.0.0-alpha.test.15", Channel::Alpha, Some("test")),
            ("0.0.0-beta.test.15", Channel::Beta, Some("test")),
            ("0.0.0-rc.15", Channel::Rc, None),
        ];
        for (raw, channel, branch) in cases {
            let version = Version::parse(raw).unwrap();
            assert_eq!(version.channel(), channel, "channel of {raw}");
            assert_eq!(version.branch(), branch, "branch of {raw}");
        }
    }

    #[test]
    fn branch_is_the_token_after_the_channel_prefix() {
        let version = Version::parse("0.0.1-beta.branch1.2").unwrap();
        assert_eq!(version.branch(), Some("branch1"));

        // No trailing component after the branch token.
        let version = Version::parse("0.0.1-alpha.x").unwrap();
        assert_eq!(version.branch(), Some("x"));
    }

    #[test]
    fn malformed_strings_fail_with_invalid_format() {
        for raw in ["0.0", "0.0.0.0", "0+0.0"] {
            let err = Version::parse(raw).unwrap_err();
            assert!(
                matches!(err, UpdateError::InvalidVersionFormat { .. }),
                "{raw} should be invalid format, got {err:?}"
            );
        }
    }

    #[test]
    fn unrecognized_prerelease_prefix_fails() {
        // Valid semver grammar, but "alpha" without the trailing dot is not a
        // recognized channel prefix.
        let err = Version::parse("0.0.1-alpha+test.15").unwrap_err();
        assert!(matches!(err, UpdateError::UnknownPrereleasePrefix { .. }));

        let err = Version::parse("1.0.0-nightly.1").unwrap_err();
        assert!(matches!(err, UpdateError::UnknownPrereleasePrefix { .. }));
    }

    #[test]
    fn ordering_follows_semver_precedence() {
        let ordered = [
            "0.0.0-alpha.test.15",
            "0.0.0-beta.test.15",
            "0.0.0-dev.13",
            "0.0.0",
            "0.0.1-alpha.test.15",
            "0.0.1-alpha.test.16",
            "0.0.1",
        ];
        for pair in ordered.windows(2) {
            let lower = Version::parse(pair[0]).unwrap();
            let higher = Version::parse(pair[1]).unwrap();
            assert!(lower < higher, "{lower} should order below {higher}");
            assert!(higher > lower, "{higher} should order above {lower}");
        }
    }

    #[test]
    fn stable_orders_above_its_own_prereleases() {
        let release = Version::parse("0.0.2").unwrap();
        let dev = Version::parse("0.0.2-dev.1").unwrap();
        assert!(dev < release);
    }

    #[test]
    fn build_metadata_is_ignored_for_equality() {
        let pairs = [
            ("0.0.0-alpha.test.15", "0.0.0-alpha.test.15+1"),
            ("0.0.0-dev.1", "0.0.0-dev.1+some-text"),
            ("0.0.1", "0.0.1+15-some-text"),
            ("0.0.0+1", "0.0.0+999"),
        ];
        for (a, b) in pairs {
            assert_eq!(Version::parse(a).unwrap(), Version::parse(b).unwrap());
        }
    }

    #[test]
    fn channel_rank_order() {
        assert!(Channel::Alpha < Channel::Beta);
        assert!(Channel::Beta < Channel::Dev);
        assert!(Channel::Dev < Channel::Rc);
        assert!(Channel::Rc < Channel::Stable);
        assert_eq!(Channel::Alpha.rank(), 0);
        assert_eq!(Channel::Stable.rank(), 4);
    }

    #[test]
    fn channel_names_are_case_sensitive() {
        assert_eq!("beta".parse::<Channel>().unwrap(), Channel::Beta);
        for bad in ["Alpha", "_beta", "STABLE", "random", ""] {
            assert!(
                matches!(
                    bad.parse::<Channel>(),
                    Err(UpdateError::UnknownChannel { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }
}
