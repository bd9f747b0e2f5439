//! The build event stream.

use crate::Context;
use crate::dedup::{self, Dropped};
use crate::error::{ErrorKind, Result};
use crate::materialize::{self, Materialized};
use crate::model::{ExtractedFile, GroupStat};
use crate::select;
use async_stream::stream;
use fontpack_catalog::{ArchiveSource, Catalog, SelectionSet};
use fontpack_fetch::{Expected, TransportHandle, fetch_archive};
use futures::Stream;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::debug;

/// Progress events emitted by [`build`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started), exactly once.
/// 2. [`ArchiveCached`](Self::ArchiveCached) or
///    [`ArchiveFetched`](Self::ArchiveFetched), then
///    [`ArchiveExtracted`](Self::ArchiveExtracted), once per archive in
///    completion order.
/// 3. [`Selected`](Self::Selected), exactly once, with the per-group report.
/// 4. [`Deduplicated`](Self::Deduplicated), exactly once.
/// 5. [`Materialized`](Self::Materialized), exactly once.
/// 6. [`Complete`](Self::Complete), exactly once, signalling success.
///
/// An error terminates the stream early: remaining fetch and extract
/// work is abandoned, nothing is published, and the previously published
/// output is left untouched.
pub enum BuildEvent {
    /// The pipeline is underway; emitted exactly once, first.
    Started { archives: usize },
    /// A verified cached copy was reused without network traffic.
    ArchiveCached { archive: String, bytes: u64 },
    /// An archive was downloaded, verified and cached.
    ArchiveFetched { archive: String, bytes: u64 },
    /// An archive's fonts were unpacked and inspected.
    ArchiveExtracted { archive: String, fonts: usize },
    /// Selection finished; carries the per-group diagnostics report.
    Selected { files: usize, bytes: u64, stats: Vec<GroupStat> },
    /// Duplicates were collapsed.
    Deduplicated { kept: usize, dropped: Vec<Dropped> },
    /// The output tree was atomically published.
    Materialized(Materialized),
    /// Everything finished; the stream ends after this.
    Complete,
}

struct ArchiveOutcome {
    archive: String,
    bytes: u64,
    reused: bool,
    files: Vec<ExtractedFile>,
}

/// Run the full pipeline, yielding progress events.
///
/// Fetch and extract run one task per archive with at most `ctx.jobs` in
/// flight; waiting archives are promoted as running ones finish. The
/// stages after extraction need the complete file set and run
/// sequentially. A build is all-or-nothing: the first failure ends the
/// stream, which drops the in-flight set and with it all remaining work.
pub fn build<'a>(
    transport: &'a TransportHandle,
    catalog: &'a Catalog,
    selection: &'a SelectionSet,
    ctx: &'a Context,
) -> impl Stream<Item = Result<BuildEvent>> + 'a {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        yield Ok(BuildEvent::Started { archives: catalog.archives().len() });

        let mut waiting: Vec<_> =
            catalog.archives().iter().map(|source| process_archive(transport, source, ctx)).collect();
        let mut in_flight = FuturesUnordered::new();
        let limit = ctx.jobs.min(waiting.len());
        in_flight.extend(waiting.drain(..limit));

        let mut files: Vec<ExtractedFile> = Vec::new();
        while let Some(outcome) = in_flight.next().await {
            match outcome {
                Ok(outcome) => {
                    yield Ok(match outcome.reused {
                        true => BuildEvent::ArchiveCached { archive: outcome.archive.clone(), bytes: outcome.bytes },
                        false => BuildEvent::ArchiveFetched { archive: outcome.archive.clone(), bytes: outcome.bytes },
                    });
                    yield Ok(BuildEvent::ArchiveExtracted { archive: outcome.archive, fonts: outcome.files.len() });
                    files.extend(outcome.files);
                },
                Err(err) => {
                    // All-or-nothing: ending the stream drops `in_flight`
                    // and abandons every remaining task.
                    yield Err(err);
                    return;
                },
            }
            // Pop-n-push, but FIFO instead of LIFO.
            if !waiting.is_empty() {
                in_flight.push(waiting.remove(0));
            }
        }

        // Completion order must not leak into the output; restore a
        // deterministic order before anything downstream looks at it.
        files.sort_by(|a, b| {
            (catalog.archive_priority(&a.archive), &a.relative)
                .cmp(&(catalog.archive_priority(&b.archive), &b.relative))
        });

        let stats = select::group_stats(catalog, selection, &files);
        let resolved = select::select(catalog, selection, files);
        let (count, bytes) =
            resolved.iter().fold((0usize, 0u64), |(count, bytes), file| (count + 1, bytes + file.file.size));
        yield Ok(BuildEvent::Selected { files: count, bytes, stats });

        let outcome = dedup::dedup(catalog, resolved);
        yield Ok(BuildEvent::Deduplicated { kept: outcome.kept.len(), dropped: outcome.dropped });

        match materialize::materialize(&outcome.kept, &ctx.output_dir).await {
            Ok(materialized) => {
                yield Ok(BuildEvent::Materialized(materialized));
            },
            Err(err) => {
                yield Err(err);
                return;
            },
        }

        // Scratch is per-run state; the archive cache is all that persists.
        if let Err(err) = tokio::fs::remove_dir_all(&ctx.scratch_dir).await
            && err.kind() != std::io::ErrorKind::NotFound
        {
            debug!("failed to clean scratch workspace: {err}");
        }

        yield Ok(BuildEvent::Complete);
    })
}

/// Fetch one archive into the cache, unpack its fonts into a fresh
/// per-archive scratch directory, and inspect each font file.
async fn process_archive(
    transport: &TransportHandle,
    source: &ArchiveSource,
    ctx: &Context,
) -> Result<ArchiveOutcome> {
    let destination = ctx.cache_dir.join(&source.filename);
    let expected = Expected { min_size: source.min_size, checksum: source.checksum.clone() };
    let fetched = fetch_archive(transport, &source.url, &destination, &expected)
        .await
        .map_err(|err| ErrorKind::fetch(&source.id, err))?;

    // Stale scratch from an aborted run would shadow this run's entries.
    let scratch = ctx.scratch_dir.join(&source.id);
    match tokio::fs::remove_dir_all(&scratch).await {
        Ok(()) => {},
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
        Err(err) => exn::bail!(ErrorKind::Scratch(err.to_string())),
    }

    let archive_path = fetched.path.clone();
    let scratch_dir = scratch.clone();
    let entries =
        tokio::task::spawn_blocking(move || fontpack_archive::extract_fonts(&archive_path, &scratch_dir))
            .await
            .map_err(|err| exn::Exn::from(ErrorKind::Scratch(format!("extraction task failed: {err}"))))?
            .map_err(|err| ErrorKind::extract(&source.id, err))?;

    let mut files = Vec::with_capacity(entries.len());
    for entry in entries {
        let data = tokio::fs::read(&entry.scratch)
            .await
            .map_err(|err| exn::Exn::from(ErrorKind::Scratch(format!("{}: {err}", entry.scratch.display()))))?;
        files.push(ExtractedFile {
            archive: source.id.clone(),
            relative: entry.relative,
            scratch: entry.scratch,
            size: entry.size,
            hash: fontpack_font::content_hash(&data),
            family: fontpack_font::inspect(&data),
        });
    }

    debug!(archive = %source.id, fonts = files.len(), "archive processed");
    Ok(ArchiveOutcome { archive: source.id.clone(), bytes: fetched.bytes, reused: fetched.reused, files })
}
