//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic
//! location tracking and error tree construction, following the workspace
//! error conventions.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally. Any of them aborts the whole build; there is no partial
/// extraction.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file is not in any recognized archive format.
    #[display("unsupported archive format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// The archive is damaged or lies about its contents. Don't retry
    /// with the same input.
    #[display("corrupt archive: {_0}")]
    Corrupt(#[error(not(source))] String),
    /// An entry path is absolute, escapes the extraction root, or is
    /// otherwise unusable.
    #[display("invalid entry path: {_0}")]
    InvalidEntry(#[error(not(source))] String),
    /// Nested archives recurse deeper than the configured limit.
    #[display("nested archives exceed depth limit of {_0}")]
    NestingLimit(#[error(not(source))] usize),
    /// An I/O operation failed while unpacking.
    #[display("I/O error: {_0}")]
    Io(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    #[track_caller]
    pub(crate) fn io(err: std::io::Error) -> Error {
        exn::Exn::from(Self::Io(err.to_string()))
    }
}
