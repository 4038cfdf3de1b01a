//! Non-interactive report output for `--format text` and `--format json`.

use usage_core::formatting::format_percent;
use usage_runtime::session::SessionReport;
use usage_ui::comparison_view::comparison_text;
use usage_ui::table_view::server_table_text;

/// Plain-text rendering of the whole report.
///
/// Title and summary first, then the current period's utilization and
/// server table, then the comparison table when several periods are shown.
pub fn render_text(report: &SessionReport) -> String {
    let mut out = vec![report.draft.title.clone(), report.draft.summary.clone()];

    if let Some((period, stats)) = report
        .current()
        .and_then(|p| p.stats.as_ref().map(|s| (p, s)))
    {
        let u = stats.utilization;
        out.push(String::new());
        out.push(format!(
            "{} ({} file{})",
            period.label(),
            stats.file_count,
            if stats.file_count == 1 { "" } else { "s" }
        ));
        out.push(format!(
            "Idle {}  Busy {}  Fault {}",
            format_percent(u.idle),
            format_percent(u.busy),
            format_percent(u.fault)
        ));
        out.push(String::new());
        out.push(server_table_text(stats));
    }

    if report.is_comparison() {
        out.push(String::new());
        out.push(comparison_text(
            &report.periods,
            &report.deltas,
            report.insight.as_ref(),
        ));
    }

    out.join("\n")
}

/// Pretty-printed JSON of the exportable report document.
pub fn render_json(report: &SessionReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&report.document())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use usage_core::models::{AggregatedStats, ComparisonPeriod, ServerRecord, Utilization};
    use usage_core::report::ReportDraft;
    use usage_runtime::data::trend::TrendAnalyzer;

    fn period(month: u32, idle: u64, fault: u64) -> ComparisonPeriod {
        let server = ServerRecord {
            date: format!("2024-{:02}-28", month),
            server_ip: "10.0.0.1".to_string(),
            idle,
            busy: 0,
            fault,
            total: idle + fault,
        };
        ComparisonPeriod::new(format!("2024-{:02}", month), month, 2024, Vec::new()).with_stats(
            AggregatedStats {
                total_idle: idle,
                total_fault: fault,
                total_calls: idle + fault,
                utilization: Utilization::from_totals(idle, 0, fault, idle + fault),
                servers: vec![server],
                file_count: 2,
                ..Default::default()
            },
        )
    }

    fn report(periods: Vec<ComparisonPeriod>) -> SessionReport {
        SessionReport {
            deltas: TrendAnalyzer::period_deltas(&periods),
            insight: TrendAnalyzer::insight(&periods),
            draft: ReportDraft::for_periods(&periods).unwrap(),
            skipped: Vec::new(),
            periods,
        }
    }

    #[test]
    fn test_render_text_single_period() {
        let text = render_text(&report(vec![period(1, 96, 4)]));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Server Usage Report \u{2014} January 2024");
        assert!(lines[1].contains("96.00%"));
        assert!(text.contains("January 2024 (2 files)"));
        assert!(text.contains("Idle 96.00%  Busy 0.00%  Fault 4.00%"));
        assert!(text.contains("TOTAL"));
        assert!(!text.contains("Fault utilization"));
    }

    #[test]
    fn test_render_text_comparison_includes_insight() {
        let text = render_text(&report(vec![period(1, 98, 2), period(2, 95, 5)]));
        assert!(text.contains("February 2024 (2 files)"));
        assert!(text.contains("Period"));
        assert!(text.contains("Fault utilization increased by 3.00 pp"));
    }

    #[test]
    fn test_render_json_is_camel_case_document() {
        let json = render_json(&report(vec![period(1, 98, 2), period(2, 95, 5)])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["periods"].as_array().unwrap().len(), 2);
        assert_eq!(value["periods"][0]["stats"]["totalCalls"], 100);
        assert_eq!(value["insight"]["direction"], "increased");
        assert!(value["generatedAt"].is_string());
    }
}
