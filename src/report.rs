//! Run-level result bookkeeping.
//!
//! One [`FileReport`] is produced per enumerated source file and folded into
//! a [`RunSummary`]. The tally is the tool's only run-level state; it exists
//! in memory for the duration of the run and is reported at the end.
//!
//! Invariant: `success + failed + skipped` always equals the number of
//! enumerated files.

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of processing a single source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOutcome {
    /// Converted content was written to the mirrored output path.
    Success,
    /// The output path already existed; no API call was made and the
    /// existing content was left untouched.
    Skipped,
    /// Cleaning, the API call, sanitising, or the write failed.
    Failed,
}

/// Per-file record of what happened during the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Path relative to the source root (mirrored under the output root).
    pub relative_path: PathBuf,
    /// What happened to this file.
    pub outcome: FileOutcome,
    /// Whether the cleaning transform was applied before the API call.
    pub cleaned: bool,
    /// Wall-clock time spent on this file, including the API call.
    pub duration_ms: u64,
    /// The failure cause when `outcome == Failed`.
    pub error: Option<FileError>,
}

/// Aggregated counters for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files whose converted content was written.
    pub success: usize,
    /// Files that failed (oversized, API error, empty reply, write error).
    pub failed: usize,
    /// Files whose output already existed.
    pub skipped: usize,
}

impl RunSummary {
    /// Total number of files processed, in any outcome.
    pub fn total(&self) -> usize {
        self.success + self.failed + self.skipped
    }

    /// Fold one file outcome into the tally.
    pub fn record(mut self, outcome: FileOutcome) -> Self {
        match outcome {
            FileOutcome::Success => self.success += 1,
            FileOutcome::Failed => self.failed += 1,
            FileOutcome::Skipped => self.skipped += 1,
        }
        self
    }
}

/// Everything a run produced, returned by [`crate::convert::convert_dir`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-file records, in processing order.
    pub files: Vec<FileReport>,
    /// Aggregated counters.
    pub summary: RunSummary,
    /// Total wall-clock duration of the run, inter-file delays included.
    pub total_duration_ms: u64,
}

impl RunReport {
    /// First failure cause in processing order, if any file failed.
    pub fn first_error(&self) -> Option<&FileError> {
        self.files.iter().find_map(|f| f.error.as_ref())
    }
}
