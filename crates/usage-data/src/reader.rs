//! Sheet file discovery and decoding.
//!
//! Turns delimited-text and JSON metric files into ordered sequences of
//! [`RawRow`]s. Decoding is purely structural: cell values are passed on
//! loosely typed and only interpreted by the row normalizer.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};
use usage_core::error::{ReportError, Result};
use usage_core::models::{CellValue, RawRow};

// ── SheetFormat ───────────────────────────────────────────────────────────────

/// Supported input encodings, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Comma-separated text with a header line (`.csv`, `.txt`).
    Csv,
    /// Tab-separated text with a header line (`.tsv`).
    Tsv,
    /// A JSON array of row objects, or a single row object (`.json`).
    Json,
    /// One JSON row object per line (`.jsonl`, `.ndjson`).
    JsonLines,
}

impl SheetFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(SheetFormat::Csv),
            "tsv" => Some(SheetFormat::Tsv),
            "json" => Some(SheetFormat::Json),
            "jsonl" | "ndjson" => Some(SheetFormat::JsonLines),
            _ => None,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all supported sheet files recursively under `dir`, sorted by path.
pub fn find_sheet_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Input path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file() && SheetFormat::from_path(entry.path()).is_some()
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Expand directories into the sheet files they contain.
///
/// Plain file paths are kept as given, in order, so that an unsupported or
/// unreadable file surfaces later as a skipped-file warning rather than
/// silently disappearing.
pub fn expand_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut expanded = Vec::with_capacity(paths.len());
    for path in paths {
        if path.is_dir() {
            let found = find_sheet_files(path);
            debug!("{}: {} sheet files", path.display(), found.len());
            expanded.extend(found);
        } else {
            expanded.push(path.clone());
        }
    }
    expanded
}

/// Read and decode one file into rows.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let format =
        SheetFormat::from_path(path).ok_or_else(|| ReportError::UnsupportedFormat(path.to_path_buf()))?;

    let bytes = std::fs::read(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    decode_rows(path, &bytes, format)
}

/// Decode in-memory file contents. `path` is only used in error messages.
pub fn decode_rows(path: &Path, bytes: &[u8], format: SheetFormat) -> Result<Vec<RawRow>> {
    match format {
        SheetFormat::Csv => decode_delimited(path, bytes, b','),
        SheetFormat::Tsv => decode_delimited(path, bytes, b'\t'),
        SheetFormat::Json => decode_json(path, bytes),
        SheetFormat::JsonLines => decode_json_lines(path, bytes),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn decode_error(path: &Path, reason: impl ToString) -> ReportError {
    ReportError::Decode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Header line → column names; each following record → one row. Short rows
/// simply lack the trailing columns.
fn decode_delimited(path: &Path, bytes: &[u8], delimiter: u8) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| decode_error(path, e))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| decode_error(path, e))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header, text_cell(cell)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn decode_json(path: &Path, bytes: &[u8]) -> Result<Vec<RawRow>> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| decode_error(path, e))?;
    match &value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                object_row(item)
                    .ok_or_else(|| decode_error(path, format!("row {} is not an object", i + 1)))
            })
            .collect(),
        Value::Object(_) => Ok(object_row(&value).into_iter().collect()),
        _ => Err(decode_error(path, "expected an array of row objects")),
    }
}

fn decode_json_lines(path: &Path, bytes: &[u8]) -> Result<Vec<RawRow>> {
    let text = std::str::from_utf8(bytes).map_err(|e| decode_error(path, e))?;
    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(trimmed)
            .map_err(|e| decode_error(path, format!("line {}: {}", i + 1, e)))?;
        let row = object_row(&value)
            .ok_or_else(|| decode_error(path, format!("line {} is not an object", i + 1)))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Convert a JSON object into a row; `None` for any other JSON value.
fn object_row(value: &Value) -> Option<RawRow> {
    let map = value.as_object()?;
    Some(
        map.iter()
            .map(|(key, cell)| (key.as_str(), json_cell(cell)))
            .collect(),
    )
}

fn json_cell(value: &Value) -> CellValue {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => CellValue::Empty,
        Value::Bool(b) => CellValue::Bool(*b),
        Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or_default(),
        Value::String(s) => CellValue::Text(s.clone()),
    }
}

fn text_cell(cell: &str) -> CellValue {
    if cell.trim().is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(cell.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
