//! Build Error Types
//!
//! This module provides structured errors using `exn` for automatic
//! location tracking and error tree construction, following the workspace
//! error conventions. Cross-crate wrapping embeds the inner kind in the
//! outer variant (keeping the inner `Exn` frame as a child in the tree)
//! so a single display line names the failing stage, the offending
//! archive and the underlying cause.

use derive_more::{Display, Error};
use fontpack_archive::error::{Error as ArchiveError, ErrorKind as ArchiveErrorKind};
use fontpack_fetch::error::{Error as FetchError, ErrorKind as FetchErrorKind};
use std::path::PathBuf;

/// A build error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for build operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories, one per pipeline stage.
///
/// Every one of these is unrecoverable for the current run: the pipeline
/// never produces partial builds. Failures before the materializer leave
/// the previously published output untouched; a materializer failure
/// aborts before the atomic rename and does the same.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Downloading or verifying an archive failed.
    #[display("fetch failed for archive `{archive}`: {cause}")]
    Fetch { archive: String, cause: FetchErrorKind },
    /// Unpacking an archive failed.
    #[display("extract failed for archive `{archive}`: {cause}")]
    Extract { archive: String, cause: ArchiveErrorKind },
    /// Publishing the output tree failed.
    #[display("write failed for `{}`: {cause}", path.display())]
    Write { path: PathBuf, cause: String },
    /// A scratch workspace operation failed.
    #[display("scratch workspace error: {_0}")]
    Scratch(#[error(not(source))] String),
}

impl ErrorKind {
    /// Wrap a fetch error, preserving its frame as a child in the tree.
    #[track_caller]
    pub fn fetch(archive: &str, err: FetchError) -> Error {
        let cause = (*err).clone();
        err.raise(ErrorKind::Fetch { archive: archive.to_string(), cause })
    }

    /// Wrap an extraction error, preserving its frame as a child in the tree.
    #[track_caller]
    pub fn extract(archive: &str, err: ArchiveError) -> Error {
        let cause = (*err).clone();
        err.raise(ErrorKind::Extract { archive: archive.to_string(), cause })
    }

    /// Filesystem failure while publishing the output tree.
    #[track_caller]
    pub fn write(path: impl Into<PathBuf>, err: std::io::Error) -> Error {
        exn::Exn::from(ErrorKind::Write { path: path.into(), cause: err.to_string() })
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch { cause, .. } => cause.is_retryable(),
            Self::Extract { cause, .. } => cause.is_retryable(),
            Self::Write { .. } | Self::Scratch(_) => true,
        }
    }
}
