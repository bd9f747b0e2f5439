//! Entry path normalization.
//!
//! Archive members arrive with whatever separators and wrapper
//! directories the upstream vendor happened to use. Everything is
//! reduced to clean relative paths before the rest of the pipeline sees
//! it, so paths stay comparable across archives.

use crate::error::{ErrorKind, Result};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Normalize a raw archive entry name into a safe relative path.
///
/// - Backslashes count as separators (zip files written on Windows).
/// - `.` and root components are dropped; `..` resolves within the entry.
/// - Entries that escape the extraction root, contain null bytes, carry a
///   drive prefix, or normalize to nothing are rejected as
///   [`InvalidEntry`](ErrorKind::InvalidEntry).
pub fn normalize_entry(raw: &str) -> Result<PathBuf> {
    if raw.contains('\0') {
        exn::bail!(ErrorKind::InvalidEntry(raw.to_string()));
    }
    let unified = raw.replace('\\', "/");
    let mut components = Vec::new();
    for component in Path::new(&unified).components() {
        match component {
            Component::Normal(part) => components.push(part.to_os_string()),
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidEntry(raw.to_string())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidEntry(raw.to_string()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidEntry(raw.to_string())),
        false => Ok(components.into_iter().collect()),
    }
}

/// How many leading components every path shares.
///
/// Vendors routinely wrap payloads in a versioned top directory
/// (`CascadiaCode-2404.23/ttf/...`); stripping that many components keeps
/// relative paths comparable across archives. The depth never consumes a
/// file name: a path reduced to its final component stops the count.
pub fn shared_root_depth(paths: &[PathBuf]) -> usize {
    let mut depth = 0;
    loop {
        let mut shared: Option<OsString> = None;
        for path in paths {
            let mut components = path.components().skip(depth);
            let Some(first) = components.next() else { return depth };
            if components.next().is_none() {
                return depth;
            }
            match &shared {
                None => shared = Some(first.as_os_str().to_os_string()),
                Some(existing) if existing.as_os_str() == first.as_os_str() => {},
                Some(_) => return depth,
            }
        }
        if shared.is_none() {
            return depth;
        }
        depth += 1;
    }
}
