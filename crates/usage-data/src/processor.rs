//! Per-file processing: decoded rows → [`ProcessedFile`].
//!
//! Each file is handled on its own with no shared state, so files of a batch
//! can be processed in any order or in parallel.

use std::path::Path;

use tracing::debug;
use usage_core::error::Result;
use usage_core::models::{ProcessedFile, RawRow};
use usage_core::normalizer::{DiscardReason, NormalizedRow, RowNormalizer};

use crate::reader;

/// Stateless helper that normalizes the rows of a single file.
pub struct FileProcessor;

impl FileProcessor {
    /// Decode the file at `path` and process its rows.
    ///
    /// Decoding failures are returned as errors; the caller decides whether
    /// to skip the file.
    pub fn process_path(path: &Path) -> Result<ProcessedFile> {
        let rows = reader::read_rows(path)?;
        Ok(Self::process_rows(&display_name(path), &rows))
    }

    /// Normalize `rows` in order.
    ///
    /// Server rows are kept in encounter order. When a file carries several
    /// total rows, the last one replaces the earlier ones.
    pub fn process_rows(file_name: &str, rows: &[RawRow]) -> ProcessedFile {
        let mut processed = ProcessedFile {
            file_name: file_name.to_string(),
            ..Default::default()
        };
        let mut blank = 0usize;
        let mut unattributed = 0usize;
        let mut total_rows = 0usize;

        for row in rows {
            match RowNormalizer::normalize(row) {
                NormalizedRow::Server(record) => processed.records.push(record),
                NormalizedRow::Total(record) => {
                    total_rows += 1;
                    processed.file_total_row = Some(record);
                }
                NormalizedRow::Discard(DiscardReason::Blank) => blank += 1,
                NormalizedRow::Discard(DiscardReason::NoServer) => unattributed += 1,
            }
        }

        debug!(
            "File {}: {} rows, {} servers, {} total rows, {} blank, {} without server",
            file_name,
            rows.len(),
            processed.records.len(),
            total_rows,
            blank,
            unattributed,
        );

        processed
    }
}

/// File name used in reports; falls back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use usage_core::error::ReportError;

    fn row(server: &str, date: &str, idle: u64) -> RawRow {
        RawRow::new()
            .with("Date", date)
            .with("Server", server)
            .with("Idle", idle)
    }

    #[test]
    fn test_server_rows_kept_in_encounter_order() {
        let rows = vec![
            row("10.0.0.3", "2024-01-31", 1),
            row("10.0.0.1", "2024-01-31", 2),
            row("10.0.0.2", "2024-01-31", 3),
        ];
        let file = FileProcessor::process_rows("jan.csv", &rows);
        let servers: Vec<&str> = file.records.iter().map(|r| r.server_ip.as_str()).collect();
        assert_eq!(servers, vec!["10.0.0.3", "10.0.0.1", "10.0.0.2"]);
        assert!(file.file_total_row.is_none());
    }

    #[test]
    fn test_total_rows_excluded_and_last_one_wins() {
        let rows = vec![
            row("TOTAL", "", 10),
            row("10.0.0.1", "2024-01-31", 2),
            row("10.0.0.2", "Total", 20),
        ];
        let file = FileProcessor::process_rows("jan.csv", &rows);
        assert_eq!(file.records.len(), 1);
        assert_eq!(file.records[0].server_ip, "10.0.0.1");
        let total = file.file_total_row.expect("total row");
        assert_eq!(total.idle, 20);
        assert_eq!(total.server_ip, "10.0.0.2");
    }

    #[test]
    fn test_blank_and_unattributed_rows_dropped() {
        let rows = vec![
            row("", "", 5),
            row("", "2024-01-31", 5),
            row("10.0.0.1", "", 0),
        ];
        let file = FileProcessor::process_rows("jan.csv", &rows);
        assert_eq!(file.records.len(), 1);
        assert!(file.has_usable_data());
    }

    #[test]
    fn test_only_blank_rows_yields_unusable_file() {
        let rows = vec![row("", "", 0), RawRow::new()];
        let file = FileProcessor::process_rows("blank.csv", &rows);
        assert!(!file.has_usable_data());
    }

    #[test]
    fn test_process_path_csv() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("march.csv");
        fs::write(
            &path,
            "DATE,SERVER,IDLE,BUSY,FAULT,TOTAL\n\
             2024-03-31,10.0.0.1,100,50,10,160\n\
             TOTAL,,100,50,10,160\n",
        )
        .unwrap();

        let file = FileProcessor::process_path(&path).unwrap();
        assert_eq!(file.file_name, "march.csv");
        assert_eq!(file.records.len(), 1);
        assert_eq!(file.records[0].busy, 50);
        assert_eq!(file.file_total_row.unwrap().total, 160);
    }

    #[test]
    fn test_process_path_corrupt_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{\"SERVER\": ").unwrap();
        let err = FileProcessor::process_path(&path).unwrap_err();
        assert!(matches!(err, ReportError::Decode { .. }));
        assert!(err.is_per_file());
    }
}
