//! Conversion of loosely-typed sheet rows into canonical [`ServerRecord`]s.
//!
//! Column names are resolved case-insensitively after trimming, numeric cells
//! never fail to convert, and each row is classified as a server row, a file
//! total row, or discarded.

use crate::models::{CellValue, RawRow, ServerRecord};

/// Marker that flags a pre-aggregated summary line.
const TOTAL_MARKER: &str = "TOTAL";

// ── Column ────────────────────────────────────────────────────────────────────

/// The recognised columns. Anything else in a row is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Date,
    Server,
    Idle,
    Busy,
    Fault,
    Total,
}

impl Column {
    const COUNT: usize = 6;

    fn from_header(header: &str) -> Option<Self> {
        match header.trim().to_uppercase().as_str() {
            "DATE" => Some(Column::Date),
            "SERVER" => Some(Column::Server),
            "IDLE" => Some(Column::Idle),
            "BUSY" => Some(Column::Busy),
            "FAULT" => Some(Column::Fault),
            "TOTAL" => Some(Column::Total),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Cells of one row looked up by canonical column. A later column that
/// resolves to the same name replaces an earlier one.
struct CanonicalCells<'a> {
    cells: [Option<&'a CellValue>; Column::COUNT],
}

impl<'a> CanonicalCells<'a> {
    fn collect(row: &'a RawRow) -> Self {
        let mut cells = [None; Column::COUNT];
        for (header, value) in row.iter() {
            if let Some(column) = Column::from_header(header) {
                cells[column.index()] = Some(value);
            }
        }
        Self { cells }
    }

    fn text(&self, column: Column) -> String {
        self.cells[column.index()].map(cell_text).unwrap_or_default()
    }

    fn count(&self, column: Column) -> u64 {
        self.cells[column.index()].map(cell_count).unwrap_or(0)
    }
}

// ── NormalizedRow ─────────────────────────────────────────────────────────────

/// Why a row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Both the server identifier and the date are empty.
    Blank,
    /// The row has content but no server to attribute it to.
    NoServer,
}

/// Outcome of normalizing one [`RawRow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedRow {
    /// A per-server data row.
    Server(ServerRecord),
    /// A file-level summary row, kept apart from the server rows.
    Total(ServerRecord),
    Discard(DiscardReason),
}

// ── RowNormalizer ─────────────────────────────────────────────────────────────

/// Maps raw sheet rows onto the canonical record shape.
pub struct RowNormalizer;

impl RowNormalizer {
    /// Classify and convert a single row.
    ///
    /// * Both `SERVER` and `DATE` empty → [`DiscardReason::Blank`].
    /// * `SERVER` or `DATE` contains `TOTAL` (any case) → [`NormalizedRow::Total`],
    ///   even if a server identifier is present.
    /// * Non-empty `SERVER` → [`NormalizedRow::Server`], even when every
    ///   numeric field is zero.
    /// * Otherwise → [`DiscardReason::NoServer`].
    pub fn normalize(row: &RawRow) -> NormalizedRow {
        let cells = CanonicalCells::collect(row);

        let server_ip = cells.text(Column::Server);
        let date = cells.text(Column::Date);

        if server_ip.is_empty() && date.is_empty() {
            return NormalizedRow::Discard(DiscardReason::Blank);
        }

        let is_total = Self::is_total_marker(&server_ip) || Self::is_total_marker(&date);

        let record = ServerRecord {
            date,
            server_ip,
            idle: cells.count(Column::Idle),
            busy: cells.count(Column::Busy),
            fault: cells.count(Column::Fault),
            total: cells.count(Column::Total),
        };

        if is_total {
            NormalizedRow::Total(record)
        } else if record.server_ip.is_empty() {
            NormalizedRow::Discard(DiscardReason::NoServer)
        } else {
            NormalizedRow::Server(record)
        }
    }

    /// `true` when `value` contains the total marker, case-insensitively.
    pub fn is_total_marker(value: &str) -> bool {
        value.to_uppercase().contains(TOTAL_MARKER)
    }
}

// ── Cell coercion ─────────────────────────────────────────────────────────────

/// Render a cell as trimmed text. Integral numbers drop the fractional part
/// so spreadsheet serials read `44927`, not `44927.0`.
fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Number(n) if !n.is_finite() => String::new(),
        CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        CellValue::Number(n) => n.to_string(),
    }
}

/// Coerce a cell into a non-negative count. Missing, non-numeric, negative
/// and non-finite values become `0`; fractions round to the nearest integer.
fn cell_count(value: &CellValue) -> u64 {
    match value {
        CellValue::Number(n) => count_from_f64(*n),
        CellValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(count_from_f64)
            .unwrap_or(0),
        CellValue::Empty | CellValue::Bool(_) => 0,
    }
}

fn count_from_f64(n: f64) -> u64 {
    if n.is_finite() && n > 0.0 {
        n.round() as u64
    } else {
        0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
