//! Configuration loading and validation.
//!
//! Settings are layered, later sources winning: compiled defaults, then
//! an optional `fontpack.toml` in the working directory, then
//! `FONTPACK_*` environment variables. The group selection rides the
//! same mechanism (`FONTPACK_GROUPS=sans,cjk`), with the CLI flag
//! applied on top by the binary.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration file consulted in the working directory.
pub const CONFIG_FILE: &str = "fontpack.toml";
/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "FONTPACK_";

const DEFAULT_JOBS: usize = 4;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Build settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where the finished font tree is published.
    pub output_dir: PathBuf,
    /// Downloaded archives, kept across runs.
    pub cache_dir: PathBuf,
    /// Extraction workspace, recreated on each run.
    pub scratch_dir: PathBuf,
    /// Bounded concurrency for the fetch and extract stages.
    pub jobs: usize,
    /// Per-download timeout in seconds.
    pub timeout_secs: u64,
    /// Comma-separated group selection; `None` means catalog defaults.
    pub groups: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let cache_root = ProjectDirs::from("dev", "fontpack", "fontpack")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".fontpack"));
        Self {
            output_dir: PathBuf::from("output"),
            cache_dir: cache_root.join("archives"),
            scratch_dir: cache_root.join("scratch"),
            jobs: DEFAULT_JOBS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            groups: None,
        }
    }
}

impl Config {
    /// Load the layered configuration.
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config =
            figment.extract().map_err(|err| exn::Exn::from(ErrorKind::Invalid(err.to_string())))?;
        if config.jobs == 0 {
            exn::bail!(ErrorKind::Invalid("jobs must be at least 1".to_string()));
        }
        if config.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid("timeout_secs must be at least 1".to_string()));
        }
        tracing::debug!(?config, "configuration resolved");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.jobs > 0);
        assert!(config.timeout_secs > 0);
        assert_eq!(config.groups, None);
        assert_ne!(config.cache_dir, config.scratch_dir);
    }

    #[test]
    fn environment_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FONTPACK_GROUPS", "sans,cjk");
            jail.set_env("FONTPACK_JOBS", "2");
            let config = Config::load().expect("config loads");
            assert_eq!(config.groups.as_deref(), Some("sans,cjk"));
            assert_eq!(config.jobs, 2);
            Ok(())
        });
    }

    #[test]
    fn toml_layer_applies_under_environment() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    output_dir = "/srv/fonts"
                    timeout_secs = 30
                "#,
            )?;
            jail.set_env("FONTPACK_TIMEOUT_SECS", "60");
            let config = Config::load().expect("config loads");
            assert_eq!(config.output_dir, PathBuf::from("/srv/fonts"));
            // Environment wins over the file.
            assert_eq!(config.timeout_secs, 60);
            Ok(())
        });
    }

    #[test]
    fn zero_jobs_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FONTPACK_JOBS", "0");
            let err = Config::load().expect_err("zero jobs is invalid");
            assert!(matches!(&*err, ErrorKind::Invalid(_)));
            Ok(())
        });
    }
}
