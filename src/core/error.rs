//! Error handling for updraft.
//!
//! [`UpdateError`] enumerates every failure mode in the crate. Each variant
//! carries the context a caller needs to report the problem without digging
//! through nested sources.
//!
//! # Error Categories
//!
//! - **Version construction**: [`UpdateError::InvalidVersionFormat`],
//!   [`UpdateError::UnknownPrereleasePrefix`], [`UpdateError::UnknownChannel`]
//! - **Catalog**: [`UpdateError::DuplicateVersion`] (strict insertion only)
//! - **Network**: [`UpdateError::NetworkError`], [`UpdateError::DownloadFailed`]
//! - **Installation**: [`UpdateError::AssetNotFound`], [`UpdateError::InstallFailed`]
//! - **File system**: [`UpdateError::IoError`] from [`std::io::Error`]
//!
//! Construction failures are fail-fast: a malformed version string or an
//! unknown channel name rejects the call synchronously, before any network
//! or filesystem work happens.

use thiserror::Error;

/// The error type for all updraft operations.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// A version string does not conform to semantic-version grammar.
    ///
    /// Raised at construction time; the caller must not proceed with the
    /// value. `0.0`, `0.0.0.0` and `0+0.0` all land here.
    #[error("invalid semantic version: {version}")]
    InvalidVersionFormat {
        /// The offending version string.
        version: String,
    },

    /// A prerelease segment matches no recognized channel prefix.
    ///
    /// Valid prefixes are `alpha.`, `beta.`, `dev` and `rc`. Anything else
    /// (including a bare `alpha` without the trailing dot) fails fast.
    #[error("unrecognized prerelease prefix '{prerelease}' in version {version}")]
    UnknownPrereleasePrefix {
        /// The full version string being parsed.
        version: String,
        /// The prerelease segment that could not be classified.
        prerelease: String,
    },

    /// A channel name is not one of `alpha`, `beta`, `dev`, `rc`, `stable`.
    ///
    /// Channel names are case-sensitive; `Alpha` and `STABLE` are rejected.
    #[error("unknown release channel: {channel}")]
    UnknownChannel {
        /// The channel name that was not recognized.
        channel: String,
    },

    /// Strict catalog insertion found the version already present.
    ///
    /// Only [`ReleaseCatalog::try_insert`](crate::catalog::ReleaseCatalog::try_insert)
    /// raises this; the default `insert` overwrites silently.
    #[error("release {version} is already present in the catalog")]
    DuplicateVersion {
        /// The raw version string of the duplicate entry.
        version: String,
    },

    /// No asset with the configured filename exists in the selected release.
    #[error("no asset named '{asset}' in release {version}")]
    AssetNotFound {
        /// The asset filename that was looked up (case-insensitively).
        asset: String,
        /// The version of the release that was searched.
        version: String,
    },

    /// A network operation against the release host failed.
    #[error("network error during {operation}: {reason}")]
    NetworkError {
        /// The operation that failed (e.g. "list releases").
        operation: String,
        /// The underlying failure description.
        reason: String,
    },

    /// Downloading an asset failed partway through or before it started.
    #[error("download failed for {url}: {reason}")]
    DownloadFailed {
        /// The asset URL being fetched.
        url: String,
        /// The underlying failure description.
        reason: String,
    },

    /// The swap-and-restart handoff could not be prepared.
    #[error("install failed: {reason}")]
    InstallFailed {
        /// Why the handoff could not be prepared.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_context() {
        let err = UpdateError::InvalidVersionFormat {
            version: "0.0".to_string(),
        };
        assert_eq!(err.to_string(), "invalid semantic version: 0.0");

        let err = UpdateError::UnknownChannel {
            channel: "nightly".to_string(),
        };
        assert_eq!(err.to_string(), "unknown release channel: nightly");

        let err = UpdateError::AssetNotFound {
            asset: "example.zip".to_string(),
            version: "0.0.2".to_string(),
        };
        assert!(err.to_string().contains("example.zip"));
        assert!(err.to_string().contains("0.0.2"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: UpdateError = io.into();
        assert!(matches!(err, UpdateError::IoError(_)));
    }
}
