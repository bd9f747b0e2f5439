//! The font collection build pipeline.
//!
//! Control flow: fetch and extract run concurrently per archive (bounded
//! by the [`Context`]), then selection, deduplication and
//! materialization run sequentially over the complete extracted set.
//! The pipeline is all-or-nothing: any stage failure aborts the run
//! before anything is published, and the previously published output
//! survives untouched.
//!
//! The primary entry point is [`build`], which yields [`BuildEvent`]s as
//! the stages progress. All state lives in the explicit [`Context`]
//! value; nothing here is ambient or process-wide.

mod dedup;
pub mod error;
mod materialize;
mod model;
mod select;
mod stream;

pub use crate::dedup::{Deduplicated, DupReason, Dropped, dedup};
pub use crate::materialize::{Materialized, materialize};
pub use crate::model::{ExtractedFile, GroupStat, ResolvedFile};
pub use crate::select::{group_stats, select};
pub use crate::stream::{BuildEvent, build};

use std::path::PathBuf;

/// Explicit build context threaded through the pipeline stages.
#[derive(Debug, Clone)]
pub struct Context {
    /// Downloaded archives, kept across runs.
    pub cache_dir: PathBuf,
    /// Extraction workspace; recreated per archive on each run.
    pub scratch_dir: PathBuf,
    /// Where the finished tree is published. Must be absolute.
    pub output_dir: PathBuf,
    /// Concurrent fetch and extract tasks.
    pub jobs: usize,
}

impl Context {
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        scratch_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        jobs: usize,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            scratch_dir: scratch_dir.into(),
            output_dir: output_dir.into(),
            jobs: jobs.max(1),
        }
    }
}
