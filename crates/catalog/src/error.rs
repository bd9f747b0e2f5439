//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic
//! location tracking and error tree construction, following the workspace
//! error conventions.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A requested group name does not exist in the catalog.
    ///
    /// The message lists every valid name, enabled and disabled, so the
    /// user can self-correct without consulting documentation.
    #[display("unknown font group `{name}`, valid groups are: {}", valid.join(", "))]
    UnknownGroup {
        /// The offending name, exactly as the user wrote it.
        name: String,
        /// Every group the catalog knows.
        valid: Vec<String>,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
