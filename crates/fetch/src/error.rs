//! Fetch Error Types
//!
//! This module provides structured errors using `exn` for automatic
//! location tracking and error tree construction, following the workspace
//! error conventions.

use derive_more::{Display, Error};

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally. All of them abort the build; `is_retryable` marks the
/// ones where a later run might succeed without operator action.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server answered with a non-success status code.
    #[display("unexpected HTTP status {_0}")]
    Status(#[error(not(source))] u16),
    /// Connection or protocol failure before the body completed.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The transfer did not finish within the configured timeout.
    #[display("request timed out")]
    Timeout,
    /// Fewer bytes arrived than the server advertised.
    #[display("truncated transfer: expected {expected} bytes, received {actual}")]
    Truncated { expected: u64, actual: u64 },
    /// The payload is implausibly small for this archive.
    #[display("transfer too small: expected at least {minimum} bytes, received {actual}")]
    TooSmall { minimum: u64, actual: u64 },
    /// The payload does not match the pinned checksum.
    #[display("checksum mismatch: expected {expected}, computed {actual}")]
    Integrity { expected: String, actual: String },
    /// Reading or writing the cache failed.
    #[display("I/O error: {_0}")]
    Io(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout | Self::Truncated { .. } | Self::Io(_) => true,
            Self::Status(status) => *status >= 500,
            Self::TooSmall { .. } | Self::Integrity { .. } => false,
        }
    }

    #[track_caller]
    pub(crate) fn io(err: std::io::Error) -> Error {
        exn::Exn::from(Self::Io(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Status(503).to_string(), "unexpected HTTP status 503");
        assert_eq!(
            ErrorKind::Truncated { expected: 100, actual: 42 }.to_string(),
            "truncated transfer: expected 100 bytes, received 42"
        );
        assert_eq!(ErrorKind::Timeout.to_string(), "request timed out");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(ErrorKind::Status(502).is_retryable());
        assert!(!ErrorKind::Status(404).is_retryable());
        assert!(
            !ErrorKind::Integrity { expected: "aa".to_string(), actual: "bb".to_string() }.is_retryable()
        );
    }
}
