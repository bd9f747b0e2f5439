//! Font extraction from upstream archives.

use crate::error::{ErrorKind, Result};
use crate::format::ArchiveFormat;
use crate::path::shared_root_depth;
use crate::reader;
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Extensions of installable font files, matched case-insensitively.
///
/// Web formats (woff, woff2) are deliberately absent; they are not
/// installable desktop fonts.
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "otc"];

/// Nested archives deeper than this abort extraction instead of
/// recursing forever into a hostile container.
const MAX_NESTING: usize = 2;

/// Directory inside the scratch workspace holding nested archives while
/// they are descended into.
const NESTED_DIR: &str = ".nested";

/// A font file unpacked into the scratch workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    /// Path relative to the archive root, wrapper directories stripped.
    pub relative: PathBuf,
    /// Where the bytes were written in the scratch workspace.
    pub scratch: PathBuf,
    /// Size in bytes.
    pub size: u64,
}

/// Whether a path names a font file the build should keep.
#[must_use]
pub fn is_font_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FONT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Unpack every font file in `archive` into `scratch`.
///
/// Non-font payloads (licenses, readmes, metadata) are skipped silently.
/// An entry that is itself a supported archive is descended into, up to
/// [`MAX_NESTING`] levels, its fonts surfacing under the nested archive's
/// parent directory. Shared root wrapper directories are stripped
/// afterwards so the returned relative paths are comparable across
/// upstreams. Duplicate entry paths within one archive keep the first
/// occurrence.
#[instrument(skip_all, fields(archive = %archive.display()))]
pub fn extract_fonts(archive: &Path, scratch: &Path) -> Result<Vec<ExtractedEntry>> {
    fs::create_dir_all(scratch).map_err(ErrorKind::io)?;
    let mut unpack = Unpack {
        scratch: scratch.to_path_buf(),
        entries: Vec::new(),
        seen: HashSet::new(),
        skipped: 0,
    };
    extract_into(archive, Path::new(""), 0, &mut unpack)?;
    debug!(fonts = unpack.entries.len(), skipped = unpack.skipped, "archive unpacked");

    let mut entries = unpack.entries;
    let relatives: Vec<PathBuf> = entries.iter().map(|entry| entry.relative.clone()).collect();
    let depth = shared_root_depth(&relatives);
    if depth > 0 {
        for entry in &mut entries {
            entry.relative = entry.relative.components().skip(depth).collect();
        }
    }
    Ok(entries)
}

struct Unpack {
    scratch: PathBuf,
    entries: Vec<ExtractedEntry>,
    seen: HashSet<PathBuf>,
    skipped: usize,
}

fn extract_into(archive: &Path, prefix: &Path, depth: usize, unpack: &mut Unpack) -> Result<()> {
    if depth > MAX_NESTING {
        exn::bail!(ErrorKind::NestingLimit(MAX_NESTING));
    }
    let mut reader = reader::open(archive)?;
    // Nested archives are collected first and descended into once the
    // borrow on the outer reader ends.
    let mut nested = Vec::new();
    reader.for_each(&mut |entry, data| {
        let relative = prefix.join(&entry.path);
        if is_font_path(&entry.path) {
            if !unpack.seen.insert(relative.clone()) {
                unpack.skipped += 1;
                return Ok(());
            }
            let target = unpack.scratch.join(&relative);
            let size = write_entry(data, &target)?;
            unpack.entries.push(ExtractedEntry { relative, scratch: target, size });
        } else if let Some(format) = ArchiveFormat::from_path(&entry.path) {
            let target = unpack.scratch.join(NESTED_DIR).join(&relative);
            write_entry(data, &target)?;
            let parent = relative.parent().map(Path::to_path_buf).unwrap_or_default();
            nested.push((target, format, parent));
        } else {
            unpack.skipped += 1;
        }
        Ok(())
    })?;
    for (target, format, parent) in nested {
        debug!(nested = %target.display(), %format, "descending into nested archive");
        extract_into(&target, &parent, depth + 1, unpack)?;
    }
    Ok(())
}

fn write_entry(data: &mut dyn std::io::Read, target: &Path) -> Result<u64> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(ErrorKind::io)?;
    }
    let mut file = File::create(target).map_err(ErrorKind::io)?;
    std::io::copy(data, &mut file).map_err(ErrorKind::io)
}
