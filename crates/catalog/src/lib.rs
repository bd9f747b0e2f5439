//! The static font catalog: which archives exist upstream, which groups
//! they feed, and how a user's group request resolves against them.
//!
//! The catalog is an explicit immutable value loaded once at startup and
//! threaded through the pipeline; membership rules live here and nowhere
//! else. See [`Catalog::builtin`] for the shipped table and
//! [`Catalog::resolve`] for selection semantics.

mod builtin;
pub mod error;
mod matcher;
mod model;

pub use crate::matcher::Matcher;
pub use crate::model::{ArchiveSource, Group};

use crate::error::{ErrorKind, Result};
use std::path::Path;

/// The immutable catalog, loaded once per run.
#[derive(Debug, Clone)]
pub struct Catalog {
    archives: Vec<ArchiveSource>,
    groups: Vec<Group>,
}

impl Catalog {
    /// Assemble a catalog from archives (in priority order) and groups.
    pub fn new(archives: Vec<ArchiveSource>, groups: Vec<Group>) -> Self {
        Self { archives, groups }
    }

    pub fn archives(&self) -> &[ArchiveSource] {
        &self.archives
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Deduplication priority of an archive: its declaration position.
    ///
    /// Unknown ids sort last. The pipeline never invents archive ids, so
    /// those only come from hand-built fixtures.
    pub fn archive_priority(&self, id: &str) -> usize {
        self.archives.iter().position(|archive| archive.id == id).unwrap_or(usize::MAX)
    }

    /// Names of every group that claims the file, in catalog order.
    pub fn matching_groups(&self, archive: &str, relative: &Path) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|group| group.matches(archive, relative))
            .map(|group| group.name.as_str())
            .collect()
    }

    /// Groups included when the user requests nothing explicit.
    pub fn default_groups(&self) -> Vec<&str> {
        self.groups.iter().filter(|group| group.default).map(|group| group.name.as_str()).collect()
    }

    /// Resolve a comma-separated group request against the catalog.
    ///
    /// Empty or missing input selects the default set. Any unknown name
    /// fails with [`ErrorKind::UnknownGroup`] listing every valid name;
    /// bad input is never silently ignored.
    pub fn resolve(&self, requested: Option<&str>) -> Result<SelectionSet> {
        let mut picked: Vec<&str> = Vec::new();
        if let Some(list) = requested {
            for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
                if self.group(name).is_none() {
                    exn::bail!(ErrorKind::UnknownGroup {
                        name: name.to_string(),
                        valid: self.groups.iter().map(|group| group.name.clone()).collect(),
                    });
                }
                if !picked.contains(&name) {
                    picked.push(name);
                }
            }
        }
        if picked.is_empty() {
            picked = self.default_groups();
        }
        // Catalog order, not request order, so downstream reporting stays
        // stable no matter how the user spelled the selection.
        let names = self
            .groups
            .iter()
            .filter(|group| picked.contains(&group.name.as_str()))
            .map(|group| group.name.clone())
            .collect();
        Ok(SelectionSet { names })
    }
}

/// The resolved set of requested groups for one run, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    names: Vec<String>,
}

impl SelectionSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
