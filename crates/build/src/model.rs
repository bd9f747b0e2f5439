//! Pipeline data model.

use fontpack_font::FamilyStyle;
use std::path::PathBuf;

/// A font file pulled out of an upstream archive, ready for selection.
///
/// Created by the extraction stage and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Catalog id of the source archive.
    pub archive: String,
    /// Archive-relative path, normalized and wrapper-stripped.
    pub relative: PathBuf,
    /// Location of the bytes in the scratch workspace.
    pub scratch: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// BLAKE3 content hash.
    pub hash: String,
    /// Family and style from the name table; `None` when unreadable.
    /// Unknown-family files fall back to content-hash deduplication only.
    pub family: Option<FamilyStyle>,
}

/// An [`ExtractedFile`] annotated with the requested groups it satisfies.
///
/// After deduplication exactly one `ResolvedFile` survives per distinct
/// installable font; its `file` field records the canonical provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub file: ExtractedFile,
    /// Requested groups that matched, in catalog order. Duplicate merges
    /// union the group annotations of the files they collapse.
    pub groups: Vec<String>,
}

/// Per-group report line for operator diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStat {
    pub name: String,
    pub description: String,
    /// Whether the group is part of this run's selection.
    pub enabled: bool,
    /// Extracted files claimed by the group.
    pub files: usize,
    /// Total size of those files in bytes.
    pub bytes: u64,
}
