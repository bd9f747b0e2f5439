//! Selection: apply the resolved group set to the extracted files.

use crate::model::{ExtractedFile, GroupStat, ResolvedFile};
use fontpack_catalog::{Catalog, SelectionSet};
use tracing::debug;

/// Keep the files whose matched groups intersect the selection,
/// annotated with the requested groups that claimed them.
///
/// Files claimed by no requested group are dropped here, by design;
/// collapsing true duplicates is the deduplicator's job.
pub fn select(catalog: &Catalog, selection: &SelectionSet, files: Vec<ExtractedFile>) -> Vec<ResolvedFile> {
    let mut resolved = Vec::new();
    let mut unclaimed = 0usize;
    for file in files {
        let groups: Vec<String> = catalog
            .matching_groups(&file.archive, &file.relative)
            .into_iter()
            .filter(|name| selection.contains(name))
            .map(str::to_string)
            .collect();
        if groups.is_empty() {
            unclaimed += 1;
            continue;
        }
        resolved.push(ResolvedFile { file, groups });
    }
    debug!(selected = resolved.len(), unclaimed, "selection applied");
    resolved
}

/// Report line for every catalog group, enabled and disabled, with the
/// file counts and sizes observed in this run's extraction.
pub fn group_stats(catalog: &Catalog, selection: &SelectionSet, files: &[ExtractedFile]) -> Vec<GroupStat> {
    catalog
        .groups()
        .iter()
        .map(|group| {
            let claimed = files.iter().filter(|file| group.matches(&file.archive, &file.relative));
            let (count, bytes) = claimed.fold((0usize, 0u64), |(count, bytes), file| {
                (count + 1, bytes + file.size)
            });
            GroupStat {
                name: group.name.clone(),
                description: group.description.clone(),
                enabled: selection.contains(&group.name),
                files: count,
                bytes,
            }
        })
        .collect()
}
