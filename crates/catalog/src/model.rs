//! Catalog data model.

use crate::matcher::Matcher;
use std::path::Path;

/// An upstream archive pinned in the catalog.
///
/// Declaration order in the catalog doubles as the deduplication
/// priority order: when the same font appears in several archives, the
/// copy from the archive declared first wins.
#[derive(Debug, Clone)]
pub struct ArchiveSource {
    /// Short identifier used in scratch paths, logs and diagnostics.
    pub id: String,
    /// Fixed upstream URL.
    pub url: String,
    /// File name of the local cache copy.
    pub filename: String,
    /// Transfers below this size are rejected as truncated mirrors.
    pub min_size: u64,
    /// Pinned BLAKE3 digest for versioned artifacts, when known.
    pub checksum: Option<String>,
}

impl ArchiveSource {
    /// Describe an upstream archive. The cache file name defaults to the
    /// final path segment of the URL.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        let filename = url.rsplit('/').next().unwrap_or("archive").to_string();
        Self { id: id.into(), url, filename, min_size: 1, checksum: None }
    }

    #[must_use]
    pub fn min_size(mut self, bytes: u64) -> Self {
        self.min_size = bytes;
        self
    }

    #[must_use]
    pub fn checksum(mut self, digest: impl Into<String>) -> Self {
        self.checksum = Some(digest.into());
        self
    }

    /// Override the cache file name, for URLs whose final segment is
    /// unhelpful (tagged tarball downloads and the like).
    #[must_use]
    pub fn cache_name(mut self, name: impl Into<String>) -> Self {
        self.filename = name.into();
        self
    }
}

/// A named, user-selectable subset of fonts.
#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub description: String,
    /// Included when the user requests no explicit selection.
    pub default: bool,
    matchers: Vec<Matcher>,
}

impl Group {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into(), default: false, matchers: Vec::new() }
    }

    #[must_use]
    pub fn enabled_by_default(mut self) -> Self {
        self.default = true;
        self
    }

    #[must_use]
    pub fn matcher(mut self, matcher: Matcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// Whether this group claims the given archive-relative file.
    pub fn matches(&self, archive: &str, relative: &Path) -> bool {
        self.matchers.iter().any(|matcher| matcher.matches(archive, relative))
    }
}
