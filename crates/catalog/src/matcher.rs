//! Group membership rules.

use regex::Regex;
use std::path::{Path, PathBuf};

/// A single membership rule, optionally scoped to one archive.
///
/// Rules are evaluated against an extracted file's archive id and
/// archive-relative path. A file belongs to a group when any of the
/// group's matchers accepts it; a file may satisfy zero, one or several
/// groups.
#[derive(Debug, Clone)]
pub struct Matcher {
    archive: Option<String>,
    rule: Rule,
}

#[derive(Debug, Clone)]
enum Rule {
    /// Component-wise relative path prefix (`ttf`, `fonts/ttf`).
    Prefix(PathBuf),
    /// Case-insensitive glob over the file name (`NotoSans*.ttf`).
    Glob(Regex),
    /// Exact relative path.
    File(PathBuf),
}

impl Matcher {
    /// Match files under a relative directory prefix.
    pub fn prefix(archive: Option<&str>, prefix: impl AsRef<Path>) -> Self {
        Self { archive: archive.map(str::to_string), rule: Rule::Prefix(prefix.as_ref().to_path_buf()) }
    }

    /// Match file names against a glob (`*` and `?` wildcards).
    pub fn glob(archive: Option<&str>, pattern: &str) -> Self {
        Self { archive: archive.map(str::to_string), rule: Rule::Glob(compile_glob(pattern)) }
    }

    /// Match one exact relative path.
    pub fn file(archive: Option<&str>, path: impl AsRef<Path>) -> Self {
        Self { archive: archive.map(str::to_string), rule: Rule::File(path.as_ref().to_path_buf()) }
    }

    /// Whether this rule claims the given archive-relative file.
    pub fn matches(&self, archive: &str, relative: &Path) -> bool {
        if let Some(scope) = &self.archive
            && scope != archive
        {
            return false;
        }
        match &self.rule {
            Rule::Prefix(prefix) => relative.starts_with(prefix),
            Rule::Glob(pattern) => relative
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| pattern.is_match(name))
                .unwrap_or(false),
            Rule::File(path) => relative == path,
        }
    }
}

/// Translate a file-name glob into an anchored, case-insensitive regex.
///
/// The translation only ever emits escaped literals and the fixed
/// `.*`/`.` wildcard tokens, so the resulting pattern is always valid.
fn compile_glob(pattern: &str) -> Regex {
    let mut translated = String::from("(?i)^");
    for ch in pattern.chars() {
        match ch {
            '*' => translated.push_str(".*"),
            '?' => translated.push('.'),
            other => translated.push_str(&regex::escape(&other.to_string())),
        }
    }
    translated.push('$');
    Regex::new(&translated).expect("glob translation emits valid patterns")
}
