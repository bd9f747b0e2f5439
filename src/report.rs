//! Human-readable progress and diagnostics output.

use fontpack_build::{BuildEvent, GroupStat};
use fontpack_catalog::Catalog;
use std::time::Duration;

/// `12.34 MiB` style size formatting, used for all size reporting.
pub fn mib(bytes: u64) -> String {
    format!("{:.2} MiB", bytes as f64 / (1024.0 * 1024.0))
}

/// `H:MM:SS` elapsed-time formatting for the build footer.
pub fn elapsed(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, total / 60 % 60, total % 60)
}

/// Operator-facing listing of every group the catalog knows.
pub fn list_groups(catalog: &Catalog) {
    println!("Available font groups (* = enabled by default):");
    for group in catalog.groups() {
        let marker = if group.default { '*' } else { ' ' };
        println!("{marker} {:<8} {}", group.name, group.description);
    }
}

/// Enabled/disabled group report with the sizes observed this run.
fn group_report(stats: &[GroupStat]) {
    for enabled in [true, false] {
        let section: Vec<&GroupStat> = stats.iter().filter(|stat| stat.enabled == enabled).collect();
        if section.is_empty() {
            continue;
        }
        let total: u64 = section.iter().map(|stat| stat.bytes).sum();
        let label = if enabled { "Enabled" } else { "Disabled" };
        println!("{label} font groups ({}):", mib(total));
        for stat in &section {
            let sign = if enabled { '+' } else { '-' };
            println!("{sign} {}: {} files, {}", stat.name, stat.files, mib(stat.bytes));
        }
        println!();
    }
}

/// One progress line (or block) per pipeline event.
pub fn event(event: &BuildEvent) {
    match event {
        BuildEvent::Started { archives } => println!("Fetching {archives} upstream archives..."),
        BuildEvent::ArchiveCached { archive, bytes } => println!("* {archive}: cached ({})", mib(*bytes)),
        BuildEvent::ArchiveFetched { archive, bytes } => {
            println!("* {archive}: downloaded ({})", mib(*bytes));
        },
        BuildEvent::ArchiveExtracted { archive, fonts } => println!("* {archive}: {fonts} font files"),
        BuildEvent::Selected { files, bytes, stats } => {
            println!();
            group_report(stats);
            println!("Selected {files} font files ({}).", mib(*bytes));
        },
        BuildEvent::Deduplicated { kept, dropped } => {
            for duplicate in dropped {
                println!(
                    "- duplicate {}:{} ({}; kept {}:{})",
                    duplicate.archive,
                    duplicate.relative.display(),
                    duplicate.reason,
                    duplicate.kept_archive,
                    duplicate.kept_relative.display(),
                );
            }
            println!("{kept} unique fonts after deduplication.");
        },
        BuildEvent::Materialized(materialized) => {
            println!(
                "Materialized {} fonts ({}) at \"{}\".",
                materialized.files,
                mib(materialized.bytes),
                materialized.path.display(),
            );
        },
        BuildEvent::Complete => {},
    }
}
