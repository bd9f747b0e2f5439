//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "fontpack",
    version,
    about = "Builds curated, de-duplicated font collections from upstream archives"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download, filter and materialize the font collection.
    Build(BuildArgs),
    /// List the available font groups.
    Groups,
}

#[derive(Debug, Args, Default)]
pub struct BuildArgs {
    /// Comma-separated font groups to include (defaults to the catalog's
    /// default set).
    #[arg(long)]
    pub groups: Option<String>,
    /// Output directory for the finished font tree.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Archives fetched and extracted concurrently.
    #[arg(long)]
    pub jobs: Option<usize>,
    /// Per-download timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_build_flags() {
        let cli =
            Cli::try_parse_from(["fontpack", "build", "--groups", "sans,cjk", "--jobs", "2"]).unwrap();
        match cli.command {
            Command::Build(args) => {
                assert_eq!(args.groups.as_deref(), Some("sans,cjk"));
                assert_eq!(args.jobs, Some(2));
                assert_eq!(args.output, None);
            },
            Command::Groups => panic!("expected build subcommand"),
        }
    }

    #[test]
    fn parses_groups_subcommand() {
        let cli = Cli::try_parse_from(["fontpack", "groups"]).unwrap();
        assert!(matches!(cli.command, Command::Groups));
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["fontpack", "build", "--nope"]).is_err());
    }
}
