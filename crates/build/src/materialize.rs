//! Output tree materialization.
//!
//! The output directory is regenerated from scratch on every build: the
//! selected files are staged into a temporary sibling directory, the
//! previous output is removed, and the staging directory is renamed into
//! place. Any failure before the rename leaves the previously published
//! output untouched, so the install step never mirrors a half-built
//! tree.

use crate::error::{ErrorKind, Result};
use crate::model::ResolvedFile;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Directory for fonts whose name table was unreadable.
const UNKNOWN_FAMILY_DIR: &str = "Unknown";
/// Hash prefix length used to break residual file-name collisions.
const DISAMBIGUATION_CHARS: usize = 8;

/// Outcome of a successful materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub path: PathBuf,
    pub files: usize,
    pub bytes: u64,
}

/// Write the deduplicated font set to `output_dir`, replacing any
/// previous build output entirely.
///
/// Files land under `<output>/<family>/<file name>`, families taken from
/// the detected metadata. The layout is a function of the inputs alone,
/// so identical inputs produce identical trees. `output_dir` must be
/// absolute.
#[instrument(skip(files))]
pub async fn materialize(files: &[ResolvedFile], output_dir: &Path) -> Result<Materialized> {
    if !output_dir.is_absolute() {
        exn::bail!(ErrorKind::Write {
            path: output_dir.to_path_buf(),
            cause: "output directory must be absolute".to_string(),
        });
    }
    let Some(parent) = output_dir.parent() else {
        exn::bail!(ErrorKind::Write {
            path: output_dir.to_path_buf(),
            cause: "output directory has no parent".to_string(),
        });
    };
    tokio::fs::create_dir_all(parent).await.map_err(|err| ErrorKind::write(output_dir, err))?;

    let staging = tempfile::Builder::new()
        .prefix(".fontpack-staging-")
        .tempdir_in(parent)
        .map_err(|err| ErrorKind::write(output_dir, err))?;

    // Deterministic write order; also keeps collision fallback stable.
    let mut ordered: Vec<&ResolvedFile> = files.iter().collect();
    ordered.sort_by_key(|file| (family_dir(file), file_name(file), file.file.hash.clone()));

    let mut taken: HashSet<PathBuf> = HashSet::new();
    let mut bytes = 0u64;
    for file in &ordered {
        let directory = family_dir(file);
        let mut name = file_name(file);
        if taken.contains(&PathBuf::from(&directory).join(&name)) {
            name = disambiguate(&name, &file.file.hash);
        }
        let destination = PathBuf::from(&directory).join(&name);
        taken.insert(destination.clone());

        let target = staging.path().join(&destination);
        if let Some(dir) = target.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(|err| ErrorKind::write(&target, err))?;
        }
        bytes += tokio::fs::copy(&file.file.scratch, &target)
            .await
            .map_err(|err| ErrorKind::write(&target, err))?;
    }

    // Publish: drop the old tree, then rename the fully staged one into
    // place. The staged tree is complete by this point, so an interrupted
    // build can lose the published output entirely but never halve it.
    match tokio::fs::metadata(output_dir).await {
        Ok(metadata) if metadata.is_dir() => {
            tokio::fs::remove_dir_all(output_dir).await.map_err(|err| ErrorKind::write(output_dir, err))?;
        },
        Ok(_) => exn::bail!(ErrorKind::Write {
            path: output_dir.to_path_buf(),
            cause: "output path exists and is not a directory".to_string(),
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
        Err(err) => return Err(ErrorKind::write(output_dir, err)),
    }

    let staged = staging.keep();
    if let Err(err) = tokio::fs::rename(&staged, output_dir).await {
        let _ = tokio::fs::remove_dir_all(&staged).await;
        return Err(ErrorKind::write(output_dir, err));
    }

    debug!(files = ordered.len(), bytes, "output tree published");
    Ok(Materialized { path: output_dir.to_path_buf(), files: ordered.len(), bytes })
}

fn family_dir(file: &ResolvedFile) -> String {
    file.file
        .family
        .as_ref()
        .map(|meta| sanitize_component(&meta.family))
        .unwrap_or_else(|| UNKNOWN_FAMILY_DIR.to_string())
}

fn file_name(file: &ResolvedFile) -> String {
    file.file
        .relative
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "font".to_string())
}

/// Family directory names stay boring: separators and control characters
/// become dashes, leading and trailing dots or spaces are trimmed, and
/// empty results fall into the unknown bucket.
fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    match trimmed.is_empty() {
        true => UNKNOWN_FAMILY_DIR.to_string(),
        false => trimmed.to_string(),
    }
}

fn disambiguate(name: &str, hash: &str) -> String {
    let tag: String = hash.chars().take(DISAMBIGUATION_CHARS).collect();
    match name.rsplit_once('.') {
        Some((stem, extension)) => format!("{stem}-{tag}.{extension}"),
        None => format!("{name}-{tag}"),
    }
}
