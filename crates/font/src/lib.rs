//! Font file inspection.
//!
//! The build pipeline needs exactly two facts about a font file: what it
//! *is* (family and style, read from the embedded name table) and what it
//! *contains* (a content hash). Both live here so the rest of the
//! workspace never touches font internals directly.
//!
//! Inspection is deliberately infallible: a file whose metadata cannot be
//! read is still a font file worth shipping, it just can't participate in
//! family-based deduplication.

mod meta;
#[cfg(any(test, feature = "testfonts"))]
pub mod testfont;

pub use crate::meta::{FamilyStyle, inspect};

/// BLAKE3 hex digest of a font file's raw bytes.
#[must_use]
pub fn content_hash(data: &[u8]) -> String {
    blake3::hash(data).to_string()
}
