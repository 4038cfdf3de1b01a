use std::path::PathBuf;

use chrono::Month;
use serde::{Deserialize, Serialize};

/// A single primitive cell value produced by the sheet decoder.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing, null, or an empty cell.
    #[default]
    Empty,
    /// Any numeric cell.
    Number(f64),
    /// Any textual cell, untrimmed.
    Text(String),
    /// A boolean cell.
    Bool(bool),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        CellValue::Number(value as f64)
    }
}

/// One decoded spreadsheet line: column name → cell, in column order.
///
/// Column names are kept exactly as they appear in the source file; case and
/// surrounding whitespace are only resolved by the normalizer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell and return the row (builder style).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.push((column.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Canonical per-server usage record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    /// Reporting date as it appeared in the source file.
    #[serde(default)]
    pub date: String,
    /// Server identifier (usually an IP address).
    pub server_ip: String,
    #[serde(default)]
    pub idle: u64,
    #[serde(default)]
    pub busy: u64,
    #[serde(default)]
    pub fault: u64,
    #[serde(default)]
    pub total: u64,
}

impl ServerRecord {
    /// Sum of the idle, busy and fault components, clamped at `u64::MAX`.
    pub fn component_sum(&self) -> u64 {
        self.idle.saturating_add(self.busy).saturating_add(self.fault)
    }

    /// `true` when `total` equals the sum of its components.
    pub fn is_reconciled(&self) -> bool {
        self.total == self.component_sum()
    }
}

/// The normalized content of one input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFile {
    pub file_name: String,
    /// Server rows in the order they were encountered.
    pub records: Vec<ServerRecord>,
    /// The file's designated total row (the last one seen), if any.
    pub file_total_row: Option<ServerRecord>,
}

impl ProcessedFile {
    /// A file is usable when it has at least one server row or a total row.
    pub fn has_usable_data(&self) -> bool {
        !self.records.is_empty() || self.file_total_row.is_some()
    }
}

/// Idle / busy / fault share of all calls, in percent.
///
/// Values are stored at full precision; use [`Utilization::rounded`] for
/// display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Utilization {
    pub idle: f64,
    pub busy: f64,
    pub fault: f64,
}

impl Utilization {
    /// Compute each category's share of `total_calls`.
    ///
    /// All three values are `0.0` when `total_calls` is zero.
    pub fn from_totals(idle: u64, busy: u64, fault: u64, total_calls: u64) -> Self {
        if total_calls == 0 {
            return Self::default();
        }
        let total = total_calls as f64;
        Self {
            idle: idle as f64 / total * 100.0,
            busy: busy as f64 / total * 100.0,
            fault: fault as f64 / total * 100.0,
        }
    }

    /// Two-decimal presentation values.
    pub fn rounded(&self) -> Self {
        Self {
            idle: crate::formatting::round_to(self.idle, 2),
            busy: crate::formatting::round_to(self.busy, 2),
            fault: crate::formatting::round_to(self.fault, 2),
        }
    }

    pub fn sum(&self) -> f64 {
        self.idle + self.busy + self.fault
    }
}

/// A file's own total row, carried alongside the aggregate for cross-checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceTotal {
    pub file_name: String,
    pub record: ServerRecord,
}

/// Summary statistics for one reporting period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedStats {
    pub total_idle: u64,
    pub total_busy: u64,
    pub total_fault: u64,
    pub total_calls: u64,
    /// Averaged per-server rows, sorted by server identifier.
    pub servers: Vec<ServerRecord>,
    pub utilization: Utilization,
    /// Number of files the averages were divided by.
    pub file_count: usize,
    #[serde(default)]
    pub source_totals: Vec<SourceTotal>,
}

impl AggregatedStats {
    /// The grand-total row as a [`ServerRecord`] labelled `TOTAL`.
    pub fn total_row(&self) -> ServerRecord {
        ServerRecord {
            date: String::new(),
            server_ip: "TOTAL".to_string(),
            idle: self.total_idle,
            busy: self.total_busy,
            fault: self.total_fault,
            total: self.total_calls,
        }
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }
}

/// A labelled reporting month with its input files and, once computed, its
/// statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPeriod {
    pub id: String,
    /// Calendar month, 1–12.
    pub month: u32,
    pub year: i32,
    pub files: Vec<PathBuf>,
    pub stats: Option<AggregatedStats>,
}

impl ComparisonPeriod {
    pub fn new(id: impl Into<String>, month: u32, year: i32, files: Vec<PathBuf>) -> Self {
        Self {
            id: id.into(),
            month,
            year,
            files,
            stats: None,
        }
    }

    /// Return a copy of this period holding `stats`.
    pub fn with_stats(self, stats: AggregatedStats) -> Self {
        Self {
            stats: Some(stats),
            ..self
        }
    }

    /// Human-readable label, e.g. `"January 2024"`.
    pub fn label(&self) -> String {
        period_label(self.month, self.year)
    }

    /// Fault utilization of the attached stats, if computed.
    pub fn fault_utilization(&self) -> Option<f64> {
        self.stats.as_ref().map(|s| s.utilization.fault)
    }
}

/// Direction of fault utilization between the first and last period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increased,
    /// Also used when fault utilization did not change.
    Decreased,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increased => write!(f, "increased"),
            TrendDirection::Decreased => write!(f, "decreased"),
        }
    }
}

/// Multi-period fault-utilization insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendInsight {
    pub direction: TrendDirection,
    /// Absolute percentage-point difference between first and last period.
    pub magnitude: f64,
    pub baseline_label: String,
    pub current_label: String,
    pub baseline_fault: f64,
    pub current_fault: f64,
    /// Index of the peak period in the caller's period sequence.
    pub peak_index: usize,
    pub peak_period_id: String,
    pub peak_label: String,
    pub peak_fault: f64,
}

/// Change between two periods' statistics.
///
/// Count metrics are relative changes in percent; utilization metrics are
/// percentage-point differences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDelta {
    pub total_calls_pct: f64,
    pub idle_pct: f64,
    pub busy_pct: f64,
    pub fault_pct: f64,
    pub idle_utilization_pp: f64,
    pub busy_utilization_pp: f64,
    pub fault_utilization_pp: f64,
    pub server_count_change: i64,
}

/// A [`StatsDelta`] between two labelled periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDelta {
    pub from_id: String,
    pub to_id: String,
    pub from_label: String,
    pub to_label: String,
    pub delta: StatsDelta,
}

/// Format a month/year pair as `"March 2024"`.
///
/// Out-of-range months fall back to `"Month 13 2024"`.
pub fn period_label(month: u32, year: i32) -> String {
    match u8::try_from(month).ok().and_then(|m| Month::try_from(m).ok()) {
        Some(m) => format!("{} {}", m.name(), year),
        None => format!("Month {} {}", month, year),
    }
}
