//! Cross-file aggregation of per-server usage into one period's statistics.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;
use usage_core::error::{ReportError, Result};
use usage_core::models::{AggregatedStats, ProcessedFile, ServerRecord, SourceTotal, Utilization};

// ── ServerSums ────────────────────────────────────────────────────────────────

/// Raw per-server totals accumulated across all files.
#[derive(Debug, Clone, Default)]
struct ServerSums {
    /// Date of the first record seen for this server.
    date: String,
    idle: u64,
    busy: u64,
    fault: u64,
    /// Sum of the source `TOTAL` column. Only used for diagnostics.
    source_total: u64,
}

impl ServerSums {
    fn add(&mut self, record: &ServerRecord) {
        if self.date.is_empty() {
            self.date = record.date.clone();
        }
        self.idle = self.idle.saturating_add(record.idle);
        self.busy = self.busy.saturating_add(record.busy);
        self.fault = self.fault.saturating_add(record.fault);
        self.source_total = self.source_total.saturating_add(record.total);
    }
}

// ── UsageAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that merges processed files into [`AggregatedStats`].
pub struct UsageAggregator;

impl UsageAggregator {
    /// Aggregate `files` into per-server averages and grand totals.
    ///
    /// * Fails with [`ReportError::NoUsableData`] when no file has a server
    ///   row or a total row.
    /// * Each server's sums are divided by the number of files, so a server
    ///   missing from a file counts as zero for that file.
    /// * Averages are rounded per component and the server total is the sum
    ///   of the rounded components.
    /// * Grand totals are sums of the rounded per-server values.
    pub fn aggregate(files: &[ProcessedFile]) -> Result<AggregatedStats> {
        if !files.iter().any(ProcessedFile::has_usable_data) {
            return Err(ReportError::NoUsableData);
        }

        let file_count = files.len();
        let sums = Self::sum_by_server(files);

        let mut servers: Vec<ServerRecord> = sums
            .into_iter()
            .map(|(server_ip, sums)| Self::average(server_ip, &sums, file_count))
            .collect();
        servers.sort_by(|a, b| compare_server_ids(&a.server_ip, &b.server_ip));

        let total_idle = saturating_sum(servers.iter().map(|s| s.idle));
        let total_busy = saturating_sum(servers.iter().map(|s| s.busy));
        let total_fault = saturating_sum(servers.iter().map(|s| s.fault));
        let total_calls = saturating_sum(servers.iter().map(|s| s.total));

        let source_totals = files
            .iter()
            .filter_map(|f| {
                f.file_total_row.as_ref().map(|record| SourceTotal {
                    file_name: f.file_name.clone(),
                    record: record.clone(),
                })
            })
            .collect();

        debug!(
            "Aggregated {} servers from {} files: {} calls",
            servers.len(),
            file_count,
            total_calls
        );

        Ok(AggregatedStats {
            total_idle,
            total_busy,
            total_fault,
            total_calls,
            servers,
            utilization: Utilization::from_totals(total_idle, total_busy, total_fault, total_calls),
            file_count,
            source_totals,
        })
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Sum every server record across all files, keyed by trimmed identifier.
    fn sum_by_server(files: &[ProcessedFile]) -> HashMap<String, ServerSums> {
        let mut map: HashMap<String, ServerSums> = HashMap::new();
        for record in files.iter().flat_map(|f| f.records.iter()) {
            let key = record.server_ip.trim();
            if key.is_empty() {
                continue;
            }
            map.entry(key.to_string()).or_default().add(record);
        }
        map
    }

    fn average(server_ip: String, sums: &ServerSums, file_count: usize) -> ServerRecord {
        let idle = rounded_mean(sums.idle, file_count);
        let busy = rounded_mean(sums.busy, file_count);
        let fault = rounded_mean(sums.fault, file_count);
        let total = idle.saturating_add(busy).saturating_add(fault);

        let source_mean = rounded_mean(sums.source_total, file_count);
        if source_mean != total {
            debug!(
                "Server {}: reconciled total {} differs from source average {}",
                server_ip, total, source_mean
            );
        }

        ServerRecord {
            date: sums.date.clone(),
            server_ip,
            idle,
            busy,
            fault,
            total,
        }
    }
}

/// Sum of counts, clamped at `u64::MAX`.
fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

/// `sum / count` rounded to the nearest integer, halves rounding up.
/// Returns `0` when `count` is zero.
pub fn rounded_mean(sum: u64, count: usize) -> u64 {
    if count == 0 {
        return 0;
    }
    let sum = sum as u128;
    let count = count as u128;
    ((2 * sum + count) / (2 * count)) as u64
}

/// Locale-style ordering for server identifiers: case-insensitive first, with
/// lowercase sorting ahead of uppercase when two ids differ only in case.
pub fn compare_server_ids(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
