//! Release source abstraction.
//!
//! A [`ReleaseSource`] supplies the raw release listing for a repository.
//! The pipeline only ever sees [`RemoteRelease`] values - a tag name plus
//! the attached assets - and parses them into the catalog itself, so tests
//! can hand the pipeline a canned listing without any network involved.

pub mod github;

use futures::future::BoxFuture;
use serde::Deserialize;

use crate::catalog::ReleaseAsset;
use crate::core::UpdateError;

pub use github::GithubReleaseSource;

/// One entry of a release listing, mirroring the GitHub wire shape.
///
/// Unknown fields in the listing are ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRelease {
    /// The release tag, e.g. `v0.4.0` or `0.4.0-beta.x.1`.
    pub tag_name: String,
    /// Downloadable assets attached to the release.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Supplies the sequence of releases published for a repository.
///
/// Implementations must be side-effect free from the pipeline's point of
/// view: every call returns the full current listing, and the pipeline
/// rebuilds its catalog from scratch each cycle. No caching, no retries.
pub trait ReleaseSource: Send + Sync {
    /// List all releases of `owner`/`repo`.
    ///
    /// An empty vector is a valid answer (the repository has no releases);
    /// network or protocol failures surface as
    /// [`UpdateError::NetworkError`].
    fn list_releases<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RemoteRelease>, UpdateError>>;
}

impl<T: ReleaseSource + ?Sized> ReleaseSource for std::sync::Arc<T> {
    fn list_releases<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RemoteRelease>, UpdateError>> {
        (**self).list_releases(owner, repo)
    }
}
