//! Duplicate collapse.
//!
//! Two files are the same installable font when their content hashes are
//! equal, or when both carry known, equal (family, style) metadata.
//! Candidates are ordered by catalog archive priority, then relative
//! path, then hash before collapsing, so the surviving copy is a
//! function of the inputs alone and never of directory iteration or
//! task completion order.

use crate::model::ResolvedFile;
use derive_more::Display;
use fontpack_catalog::Catalog;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Why a file was dropped in favour of another.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DupReason {
    /// Byte-identical content.
    #[display("identical content")]
    Content,
    /// Same (family, style) metadata.
    #[display("same family and style")]
    Family,
}

/// Record of a dropped duplicate, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropped {
    pub archive: String,
    pub relative: PathBuf,
    pub kept_archive: String,
    pub kept_relative: PathBuf,
    pub reason: DupReason,
}

/// Outcome of deduplication.
pub struct Deduplicated {
    /// Canonical files, in priority order.
    pub kept: Vec<ResolvedFile>,
    /// What was collapsed away, and into what.
    pub dropped: Vec<Dropped>,
}

/// Collapse the selection so each distinct installable font appears
/// exactly once. Group annotations of collapsed files are merged onto
/// the surviving copy.
pub fn dedup(catalog: &Catalog, mut files: Vec<ResolvedFile>) -> Deduplicated {
    files.sort_by(|a, b| {
        (catalog.archive_priority(&a.file.archive), &a.file.relative, &a.file.hash)
            .cmp(&(catalog.archive_priority(&b.file.archive), &b.file.relative, &b.file.hash))
    });

    let mut kept: Vec<ResolvedFile> = Vec::new();
    let mut dropped = Vec::new();
    let mut by_hash: HashMap<String, usize> = HashMap::new();
    let mut by_family: HashMap<(String, String), usize> = HashMap::new();

    for file in files {
        let family_key =
            file.file.family.as_ref().map(|meta| (meta.family.clone(), meta.style.clone()));
        let existing = by_hash.get(&file.file.hash).copied().map(|index| (index, DupReason::Content)).or_else(
            || {
                family_key
                    .as_ref()
                    .and_then(|key| by_family.get(key))
                    .copied()
                    .map(|index| (index, DupReason::Family))
            },
        );

        match existing {
            Some((index, reason)) => {
                let keeper = &mut kept[index];
                for group in &file.groups {
                    if !keeper.groups.contains(group) {
                        keeper.groups.push(group.clone());
                    }
                }
                dropped.push(Dropped {
                    archive: file.file.archive.clone(),
                    relative: file.file.relative.clone(),
                    kept_archive: keeper.file.archive.clone(),
                    kept_relative: keeper.file.relative.clone(),
                    reason,
                });
            },
            None => {
                let index = kept.len();
                by_hash.insert(file.file.hash.clone(), index);
                if let Some(key) = family_key {
                    by_family.insert(key, index);
                }
                kept.push(file);
            },
        }
    }

    debug!(kept = kept.len(), dropped = dropped.len(), "deduplication complete");
    Deduplicated { kept, dropped }
}
