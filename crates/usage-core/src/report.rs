//! Report draft text and the export document handed to the document writer.
//!
//! The title and summary are free text: each defaults to a template built from
//! the computed statistics and can be overridden independently.

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::formatting;
use crate::models::{AggregatedStats, ComparisonPeriod, PeriodDelta, TrendInsight};

// ── ReportDraft ───────────────────────────────────────────────────────────────

/// User-editable report text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDraft {
    pub title: String,
    pub summary: String,
}

impl ReportDraft {
    /// Default title for a period label.
    pub fn default_title(label: &str) -> String {
        format!("Server Usage Report \u{2014} {}", label)
    }

    /// Default summary embedding the rounded idle utilization.
    pub fn default_summary(label: &str, idle_utilization: f64) -> String {
        format!(
            "Servers were idle for {} of all calls during {}.",
            formatting::format_percent(idle_utilization),
            label
        )
    }

    /// Build the templated draft for one period.
    pub fn for_period(label: &str, stats: &AggregatedStats) -> Self {
        Self {
            title: Self::default_title(label),
            summary: Self::default_summary(label, stats.utilization.idle),
        }
    }

    /// Build the templated draft for a sequence of periods.
    ///
    /// Uses only periods that carry stats. The label spans the first to the
    /// last of them and the idle figure is the last (current) period's.
    /// Returns `None` when no period has stats.
    pub fn for_periods(periods: &[ComparisonPeriod]) -> Option<Self> {
        let mut with_stats = periods.iter().filter(|p| p.stats.is_some());
        let first = with_stats.next()?;
        let last = with_stats.last();

        let label = match last {
            None => first.label(),
            Some(last) => format!("{} to {}", first.label(), last.label()),
        };
        let idle = last
            .unwrap_or(first)
            .stats
            .as_ref()
            .map(|s| s.utilization.idle)
            .unwrap_or(0.0);

        Some(Self {
            title: Self::default_title(&label),
            summary: Self::default_summary(&label, idle),
        })
    }

    /// Replace the title and/or summary with caller-supplied text.
    pub fn with_overrides(mut self, title: Option<String>, summary: Option<String>) -> Self {
        if let Some(t) = title {
            self.title = t;
        }
        if let Some(s) = summary {
            self.summary = s;
        }
        self
    }
}

// ── ReportDocument ────────────────────────────────────────────────────────────

/// One period's statistics inside an exported report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSection {
    pub id: String,
    pub label: String,
    pub stats: AggregatedStats,
}

/// The complete record handed to the external document generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub title: String,
    pub summary: String,
    /// RFC 3339 timestamp when the document was assembled.
    pub generated_at: String,
    pub periods: Vec<PeriodSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deltas: Vec<PeriodDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<TrendInsight>,
}

impl ReportDocument {
    /// Assemble a document from a draft and the computed periods.
    ///
    /// Periods without stats are left out.
    pub fn assemble(
        draft: &ReportDraft,
        periods: &[ComparisonPeriod],
        deltas: Vec<PeriodDelta>,
        insight: Option<TrendInsight>,
    ) -> Self {
        let sections = periods
            .iter()
            .filter_map(|p| {
                p.stats.as_ref().map(|stats| PeriodSection {
                    id: p.id.clone(),
                    label: p.label(),
                    stats: stats.clone(),
                })
            })
            .collect();

        Self {
            title: draft.title.clone(),
            summary: draft.summary.clone(),
            generated_at: Utc::now().to_rfc3339(),
            periods: sections,
            deltas,
            insight,
        }
    }

    /// Write the document as pretty-printed JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), periods = self.periods.len(), "report exported");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Utilization;

    fn stats_with_idle(idle: f64) -> AggregatedStats {
        AggregatedStats {
            utilization: Utilization {
                idle,
                busy: 100.0 - idle,
                fault: 0.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_default_summary_embeds_rounded_idle() {
        let draft = ReportDraft::for_period("January 2024", &stats_with_idle(62.5049));
        assert_eq!(draft.title, "Server Usage Report \u{2014} January 2024");
        assert_eq!(
            draft.summary,
            "Servers were idle for 62.50% of all calls during January 2024."
        );
    }

    #[test]
    fn test_overrides_are_independent() {
        let draft = ReportDraft::for_period("May 2024", &stats_with_idle(50.0))
            .with_overrides(Some("Custom".to_string()), None);
        assert_eq!(draft.title, "Custom");
        assert!(draft.summary.contains("May 2024"));

        let draft = ReportDraft::for_period("May 2024", &stats_with_idle(50.0))
            .with_overrides(None, Some("Edited summary".to_string()));
        assert!(draft.title.contains("May 2024"));
        assert_eq!(draft.summary, "Edited summary");
    }

    #[test]
    fn test_for_periods_spans_first_to_last() {
        let periods = vec![
            ComparisonPeriod::new("a", 1, 2024, vec![]).with_stats(stats_with_idle(10.0)),
            ComparisonPeriod::new("b", 2, 2024, vec![]),
            ComparisonPeriod::new("c", 3, 2024, vec![]).with_stats(stats_with_idle(75.0)),
        ];
        let draft = ReportDraft::for_periods(&periods).unwrap();
        assert_eq!(
            draft.title,
            "Server Usage Report \u{2014} January 2024 to March 2024"
        );
        assert!(draft.summary.contains("75.00%"));
    }

    #[test]
    fn test_for_periods_single_period() {
        let periods =
            vec![ComparisonPeriod::new("a", 6, 2024, vec![]).with_stats(stats_with_idle(1.0))];
        let draft = ReportDraft::for_periods(&periods).unwrap();
        assert_eq!(draft.title, "Server Usage Report \u{2014} June 2024");
    }

    #[test]
    fn test_for_periods_with_shared_id_still_spans() {
        let periods = vec![
            ComparisonPeriod::new("dup", 1, 2024, vec![]).with_stats(stats_with_idle(10.0)),
            ComparisonPeriod::new("dup", 2, 2024, vec![]).with_stats(stats_with_idle(40.0)),
        ];
        let draft = ReportDraft::for_periods(&periods).unwrap();
        assert_eq!(
            draft.title,
            "Server Usage Report \u{2014} January 2024 to February 2024"
        );
        assert!(draft.summary.contains("40.00%"));
    }

    #[test]
    fn test_for_periods_without_stats() {
        let periods = vec![ComparisonPeriod::new("a", 6, 2024, vec![])];
        assert!(ReportDraft::for_periods(&periods).is_none());
    }

    #[test]
    fn test_assemble_skips_periods_without_stats() {
        let periods = vec![
            ComparisonPeriod::new("a", 1, 2024, vec![]).with_stats(stats_with_idle(10.0)),
            ComparisonPeriod::new("b", 2, 2024, vec![]),
        ];
        let draft = ReportDraft::for_periods(&periods).unwrap();
        let doc = ReportDocument::assemble(&draft, &periods, Vec::new(), None);
        assert_eq!(doc.periods.len(), 1);
        assert_eq!(doc.periods[0].label, "January 2024");
    }

    #[test]
    fn test_write_json_round_trip() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join("out").join("report.json");
        let periods =
            vec![ComparisonPeriod::new("a", 1, 2024, vec![]).with_stats(stats_with_idle(10.0))];
        let draft = ReportDraft::for_periods(&periods).unwrap();
        let doc = ReportDocument::assemble(&draft, &periods, Vec::new(), None);

        doc.write_json(&path).expect("write report");

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["title"], draft.title);
        assert!(value.get("insight").is_none());
        assert_eq!(value["periods"][0]["stats"]["utilization"]["idle"], 10.0);
    }
}
