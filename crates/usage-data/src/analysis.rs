//! Sequential single-period pipeline.
//!
//! Decodes and processes each file in order, skipping files that cannot be
//! decoded, then aggregates the rest into an [`AggregatedStats`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use usage_core::error::{ReportError, Result};
use usage_core::models::{AggregatedStats, ProcessedFile};

use crate::aggregator::UsageAggregator;
use crate::processor::FileProcessor;

// ── Public types ──────────────────────────────────────────────────────────────

/// A file left out of a run, with the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

impl SkippedFile {
    pub fn new(path: &Path, error: &ReportError) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: error.to_string(),
        }
    }
}

/// The complete output of [`analyze_files`].
#[derive(Debug, Clone)]
pub struct PeriodAnalysis {
    pub stats: AggregatedStats,
    /// Successfully processed files, in input order.
    pub processed_files: Vec<ProcessedFile>,
    pub skipped: Vec<SkippedFile>,
    /// Wall-clock seconds spent decoding and processing files.
    pub load_time_seconds: f64,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Process every file in `paths` and aggregate the results.
///
/// Per-file failures are logged and collected in
/// [`PeriodAnalysis::skipped`]; aggregation failures are returned.
pub fn analyze_files(paths: &[PathBuf]) -> Result<PeriodAnalysis> {
    let load_start = Instant::now();
    let mut processed_files = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();

    for path in paths {
        match FileProcessor::process_path(path) {
            Ok(file) => processed_files.push(file),
            Err(e) if e.is_per_file() => {
                warn!("Skipping {}: {}", path.display(), e);
                skipped.push(SkippedFile::new(path, &e));
            }
            Err(e) => return Err(e),
        }
    }
    let load_time_seconds = load_start.elapsed().as_secs_f64();

    let stats = aggregate_processed(&processed_files)?;

    Ok(PeriodAnalysis {
        stats,
        processed_files,
        skipped,
        load_time_seconds,
    })
}

/// Aggregate already-processed files, logging a one-line summary.
pub fn aggregate_processed(files: &[ProcessedFile]) -> Result<AggregatedStats> {
    let stats = UsageAggregator::aggregate(files)?;
    info!(
        "Aggregated {} files: {} servers, {} calls",
        stats.file_count,
        stats.server_count(),
        stats.total_calls
    );
    Ok(stats)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
