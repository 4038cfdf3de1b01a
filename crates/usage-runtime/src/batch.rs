//! Parallel per-file processing.
//!
//! Each file runs on tokio's blocking pool; results are collected in the
//! original file order so the outcome matches the sequential pipeline.

use std::path::PathBuf;

use tokio::task::JoinHandle;
use usage_core::error::Result;
use usage_core::models::ProcessedFile;
use usage_data::analysis::SkippedFile;
use usage_data::processor::FileProcessor;

/// Files that were processed and files that were skipped, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub files: Vec<ProcessedFile>,
    pub skipped: Vec<SkippedFile>,
}

/// Process every file in `paths` concurrently.
///
/// Decoding failures, panics and cancelled tasks never fail the batch; the
/// affected files are reported in [`BatchOutcome::skipped`].
pub async fn process_files(paths: &[PathBuf]) -> BatchOutcome {
    let tasks: Vec<(PathBuf, JoinHandle<Result<ProcessedFile>>)> = paths
        .iter()
        .map(|path| {
            let owned = path.clone();
            let handle = tokio::task::spawn_blocking(move || FileProcessor::process_path(&owned));
            (path.clone(), handle)
        })
        .collect();

    let mut outcome = BatchOutcome::default();
    for (path, handle) in tasks {
        match handle.await {
            Ok(Ok(file)) => outcome.files.push(file),
            Ok(Err(e)) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping file");
                outcome.skipped.push(SkippedFile::new(&path, &e));
            }
            Err(join_err) => {
                tracing::warn!(path = %path.display(), error = %join_err, "file task failed");
                outcome.skipped.push(SkippedFile {
                    path,
                    reason: format!("processing task failed: {join_err}"),
                });
            }
        }
    }

    tracing::debug!(
        processed = outcome.files.len(),
        skipped = outcome.skipped.len(),
        "batch complete"
    );
    outcome
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use usage_data::analysis::analyze_files;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let tmp = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..8)
            .map(|i| {
                write(
                    &tmp,
                    &format!("f{i}.csv"),
                    &format!("SERVER,IDLE\nhost-{i},{i}\n"),
                )
            })
            .collect();

        let outcome = process_files(&paths).await;
        let names: Vec<&str> = outcome.files.iter().map(|f| f.file_name.as_str()).collect();
        let expected: Vec<String> = (0..8).map(|i| format!("f{i}.csv")).collect();
        assert_eq!(names, expected);
        assert!(outcome.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_skipped_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let good = write(&tmp, "good.csv", "SERVER,IDLE\na,1\n");
        let bad = write(&tmp, "bad.json", "{");
        let missing = tmp.path().join("gone.csv");

        let outcome = process_files(&[bad.clone(), good, missing.clone()]).await;
        assert_eq!(outcome.files.len(), 1);
        let skipped: Vec<&PathBuf> = outcome.skipped.iter().map(|s| &s.path).collect();
        assert_eq!(skipped, vec![&bad, &missing]);
    }

    #[tokio::test]
    async fn test_matches_sequential_pipeline() {
        let tmp = TempDir::new().unwrap();
        let paths = vec![
            write(&tmp, "a.csv", "SERVER,IDLE,BUSY,FAULT\nx,3,1,0\ny,5,0,2\n"),
            write(&tmp, "b.csv", "SERVER,IDLE,BUSY,FAULT\nx,1,1,1\n"),
        ];

        let outcome = process_files(&paths).await;
        let parallel = usage_data::aggregator::UsageAggregator::aggregate(&outcome.files).unwrap();
        let sequential = analyze_files(&paths).unwrap().stats;
        assert_eq!(parallel, sequential);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let outcome = process_files(&[]).await;
        assert!(outcome.files.is_empty());
        assert!(outcome.skipped.is_empty());
    }
}
