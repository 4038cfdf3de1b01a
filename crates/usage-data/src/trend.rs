//! Period-over-period comparison and the multi-period fault trend.

use tracing::debug;
use usage_core::models::{
    AggregatedStats, ComparisonPeriod, PeriodDelta, StatsDelta, TrendDirection, TrendInsight,
};

/// Relative change from `previous` to `current`, in percent.
///
/// Returns `0.0` when both are zero and `100.0` when only `previous` is zero.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return if current == 0.0 { 0.0 } else { 100.0 };
    }
    (current - previous) / previous * 100.0
}

/// Percentage-point difference, used for utilization metrics.
pub fn point_change(previous: f64, current: f64) -> f64 {
    current - previous
}

/// Stateless helper comparing aggregated periods.
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// Change from `previous` to `current`.
    pub fn compare(previous: &AggregatedStats, current: &AggregatedStats) -> StatsDelta {
        let pct = |a: u64, b: u64| percent_change(a as f64, b as f64);
        StatsDelta {
            total_calls_pct: pct(previous.total_calls, current.total_calls),
            idle_pct: pct(previous.total_idle, current.total_idle),
            busy_pct: pct(previous.total_busy, current.total_busy),
            fault_pct: pct(previous.total_fault, current.total_fault),
            idle_utilization_pp: point_change(previous.utilization.idle, current.utilization.idle),
            busy_utilization_pp: point_change(previous.utilization.busy, current.utilization.busy),
            fault_utilization_pp: point_change(
                previous.utilization.fault,
                current.utilization.fault,
            ),
            server_count_change: current.server_count() as i64 - previous.server_count() as i64,
        }
    }

    /// Delta of each period against the closest earlier period with stats.
    /// Periods without stats are skipped on both sides.
    pub fn period_deltas(periods: &[ComparisonPeriod]) -> Vec<PeriodDelta> {
        let mut deltas = Vec::new();
        let mut previous: Option<(&ComparisonPeriod, &AggregatedStats)> = None;

        for period in periods {
            let Some(stats) = period.stats.as_ref() else {
                continue;
            };
            if let Some((prev_period, prev_stats)) = previous {
                deltas.push(PeriodDelta {
                    from_id: prev_period.id.clone(),
                    to_id: period.id.clone(),
                    from_label: prev_period.label(),
                    to_label: period.label(),
                    delta: Self::compare(prev_stats, stats),
                });
            }
            previous = Some((period, stats));
        }

        deltas
    }

    /// Fault-utilization trend from the first to the last period with stats.
    ///
    /// Returns `None` when fewer than two periods carry stats. A zero
    /// difference reports [`TrendDirection::Decreased`]. The peak is the
    /// first period holding the maximum fault utilization.
    pub fn insight(periods: &[ComparisonPeriod]) -> Option<TrendInsight> {
        let with_stats: Vec<(usize, &ComparisonPeriod, f64)> = periods
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.fault_utilization().map(|fault| (i, p, fault)))
            .collect();

        if with_stats.len() < 2 {
            return None;
        }

        let (_, first, baseline_fault) = with_stats[0];
        let (_, last, current_fault) = with_stats[with_stats.len() - 1];
        let diff = current_fault - baseline_fault;
        let direction = if diff > 0.0 {
            TrendDirection::Increased
        } else {
            TrendDirection::Decreased
        };

        let mut peak = with_stats[0];
        for candidate in &with_stats[1..] {
            if candidate.2 > peak.2 {
                peak = *candidate;
            }
        }
        let (peak_index, peak_period, peak_fault) = peak;

        debug!(
            "Fault trend {} by {:.2} pp; peak {} at index {}",
            direction,
            diff.abs(),
            peak_period.id,
            peak_index
        );

        Some(TrendInsight {
            direction,
            magnitude: diff.abs(),
            baseline_label: first.label(),
            current_label: last.label(),
            baseline_fault,
            current_fault,
            peak_index,
            peak_period_id: peak_period.id.clone(),
            peak_label: peak_period.label(),
            peak_fault,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use usage_core::models::{ServerRecord, Utilization};

    fn stats(idle: u64, busy: u64, fault: u64, servers: usize) -> AggregatedStats {
        let total_calls = idle + busy + fault;
        AggregatedStats {
            total_idle: idle,
            total_busy: busy,
            total_fault: fault,
            total_calls,
            servers: (0..servers)
                .map(|i| ServerRecord {
                    server_ip: format!("10.0.0.{}", i + 1),
                    ..Default::default()
                })
                .collect(),
            utilization: Utilization::from_totals(idle, busy, fault, total_calls),
            file_count: 1,
            source_totals: Vec::new(),
        }
    }

    /// A period whose fault utilization equals `fault` percent.
    fn period_with_fault(month: u32, fault: u64) -> ComparisonPeriod {
        ComparisonPeriod::new(format!("2024-{:02}", month), month, 2024, Vec::new())
            .with_stats(stats(100 - fault, 0, fault, 1))
    }

    // ── percent_change / point_change ─────────────────────────────────────────

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(0.0, 5.0), 100.0);
        assert!((percent_change(200.0, 250.0) - 25.0).abs() < 1e-9);
        assert!((percent_change(200.0, 150.0) + 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_change() {
        assert!((point_change(6.25, 4.0) + 2.25).abs() < 1e-9);
    }

    // ── compare ───────────────────────────────────────────────────────────────

    #[test]
    fn test_compare_counts_and_utilization() {
        let previous = stats(80, 10, 10, 2);
        let current = stats(150, 30, 20, 3);
        let delta = TrendAnalyzer::compare(&previous, &current);

        assert!((delta.total_calls_pct - 100.0).abs() < 1e-9);
        assert!((delta.idle_pct - 87.5).abs() < 1e-9);
        assert!((delta.busy_pct - 200.0).abs() < 1e-9);
        assert!((delta.fault_pct - 100.0).abs() < 1e-9);
        assert!((delta.idle_utilization_pp - -5.0).abs() < 1e-9);
        assert!((delta.busy_utilization_pp - 5.0).abs() < 1e-9);
        assert!((delta.fault_utilization_pp - 0.0).abs() < 1e-9);
        assert_eq!(delta.server_count_change, 1);
    }

    #[test]
    fn test_compare_from_empty_period() {
        let delta = TrendAnalyzer::compare(&stats(0, 0, 0, 0), &stats(0, 0, 0, 0));
        assert_eq!(delta, StatsDelta::default());
    }

    // ── period_deltas ─────────────────────────────────────────────────────────

    #[test]
    fn test_period_deltas_skip_periods_without_stats() {
        let periods = vec![
            period_with_fault(1, 2),
            ComparisonPeriod::new("2024-02", 2, 2024, Vec::new()),
            period_with_fault(3, 5),
        ];
        let deltas = TrendAnalyzer::period_deltas(&periods);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].from_id, "2024-01");
        assert_eq!(deltas[0].to_id, "2024-03");
        assert_eq!(deltas[0].to_label, "March 2024");
        assert!((deltas[0].delta.fault_utilization_pp - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_period_deltas_single_period_is_empty() {
        assert!(TrendAnalyzer::period_deltas(&[period_with_fault(1, 2)]).is_empty());
    }

    // ── insight ───────────────────────────────────────────────────────────────

    #[test]
    fn test_insight_increase_with_interior_peak() {
        let periods = vec![
            period_with_fault(1, 2),
            period_with_fault(2, 5),
            period_with_fault(3, 3),
        ];
        let insight = TrendAnalyzer::insight(&periods).unwrap();

        assert_eq!(insight.direction, TrendDirection::Increased);
        assert!((insight.magnitude - 1.0).abs() < 1e-9);
        assert_eq!(insight.baseline_label, "January 2024");
        assert_eq!(insight.current_label, "March 2024");
        assert_eq!(insight.peak_index, 1);
        assert_eq!(insight.peak_period_id, "2024-02");
        assert!((insight.peak_fault - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_insight_zero_difference_is_decreased() {
        let periods = vec![period_with_fault(1, 4), period_with_fault(2, 4)];
        let insight = TrendAnalyzer::insight(&periods).unwrap();
        assert_eq!(insight.direction, TrendDirection::Decreased);
        assert_eq!(insight.magnitude, 0.0);
        // Tie resolves to the first occurrence.
        assert_eq!(insight.peak_index, 0);
    }

    #[test]
    fn test_insight_decrease() {
        let periods = vec![period_with_fault(1, 9), period_with_fault(2, 1)];
        let insight = TrendAnalyzer::insight(&periods).unwrap();
        assert_eq!(insight.direction, TrendDirection::Decreased);
        assert!((insight.magnitude - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_insight_peak_index_counts_periods_without_stats() {
        let periods = vec![
            ComparisonPeriod::new("2023-12", 12, 2023, Vec::new()),
            period_with_fault(1, 1),
            period_with_fault(2, 7),
        ];
        let insight = TrendAnalyzer::insight(&periods).unwrap();
        assert_eq!(insight.peak_index, 2);
        assert_eq!(insight.baseline_label, "January 2024");
    }

    #[test]
    fn test_insight_requires_two_periods_with_stats() {
        assert!(TrendAnalyzer::insight(&[]).is_none());
        assert!(TrendAnalyzer::insight(&[period_with_fault(1, 3)]).is_none());
        let periods = vec![
            period_with_fault(1, 3),
            ComparisonPeriod::new("2024-02", 2, 2024, Vec::new()),
        ];
        assert!(TrendAnalyzer::insight(&periods).is_none());
    }
}
