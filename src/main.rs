//! fontpack: builds curated, de-duplicated font collections from
//! upstream archives, ready for a sync-style install step to mirror.
//!
//! The binary wires configuration, the static catalog and the HTTP
//! transport into the pipeline from `fontpack-build`, reports progress,
//! and maps any stage failure to a non-zero exit with a single clear
//! error line.

mod cli;
mod report;

use crate::cli::{BuildArgs, Cli, Command};
use clap::Parser;
use fontpack_build::{Context, build};
use fontpack_catalog::Catalog;
use fontpack_config::Config;
use fontpack_fetch::{HttpTransport, TransportHandle};
use futures::{StreamExt, pin_mut};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let catalog = Catalog::builtin();
    match cli.command {
        Command::Groups => {
            report::list_groups(&catalog);
            Ok(())
        },
        Command::Build(args) => run_build(&catalog, args).await,
    }
}

async fn run_build(catalog: &Catalog, args: BuildArgs) -> Result<(), Box<dyn Error>> {
    let config = merge(Config::load()?, args);

    // Bad group names fail here, before any network or filesystem work.
    let selection = catalog.resolve(config.groups.as_deref())?;

    report::list_groups(catalog);
    println!("\nBuilding font groups: {}.\n", selection.names().join(", "));

    let transport: TransportHandle =
        Arc::new(HttpTransport::new(Duration::from_secs(config.timeout_secs))?);
    let ctx = Context::new(config.cache_dir, config.scratch_dir, absolute(config.output_dir)?, config.jobs);

    let started = Instant::now();
    let events = build(&transport, catalog, &selection, &ctx);
    pin_mut!(events);
    while let Some(event) = events.next().await {
        report::event(&event?);
    }
    println!("\nBuild finished in {} (H:M:S).", report::elapsed(started.elapsed()));
    Ok(())
}

/// Command-line flags override the layered configuration.
fn merge(mut config: Config, args: BuildArgs) -> Config {
    if let Some(groups) = args.groups {
        config.groups = Some(groups);
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs.max(1);
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout.max(1);
    }
    config
}

/// The materializer requires an absolute output directory; resolve a
/// relative one against the working directory up front.
fn absolute(path: PathBuf) -> Result<PathBuf, Box<dyn Error>> {
    match path.is_absolute() {
        true => Ok(path),
        false => Ok(std::env::current_dir()?.join(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let config = Config {
            groups: Some("sans".to_string()),
            jobs: 4,
            ..Config::default()
        };
        let args = BuildArgs {
            groups: Some("cjk".to_string()),
            output: Some(PathBuf::from("/srv/fonts")),
            jobs: Some(0),
            timeout: None,
        };
        let merged = merge(config, args);
        assert_eq!(merged.groups.as_deref(), Some("cjk"));
        assert_eq!(merged.output_dir, PathBuf::from("/srv/fonts"));
        // Nonsense values are clamped rather than crashing mid-build.
        assert_eq!(merged.jobs, 1);
    }

    #[test]
    fn absent_flags_keep_config() {
        let config = Config { groups: Some("sans".to_string()), ..Config::default() };
        let merged = merge(config.clone(), BuildArgs::default());
        assert_eq!(merged, config);
    }
}
