//! Report session: runs a caller-owned [`ReportConfig`] end to end.
//!
//! For each period the session expands directories, processes files in
//! parallel and aggregates them. It then compares the periods and builds
//! the report draft.

use usage_core::error::{ReportError, Result};
use usage_core::models::{ComparisonPeriod, PeriodDelta, TrendInsight};
use usage_core::report::{ReportDocument, ReportDraft};
use usage_core::settings::ReportConfig;
use usage_data::aggregator::UsageAggregator;
use usage_data::analysis::SkippedFile;
use usage_data::reader::expand_inputs;
use usage_data::trend::TrendAnalyzer;

use crate::batch::process_files;

// ── Public types ──────────────────────────────────────────────────────────────

/// Everything a presentation layer needs to render or export a report.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Requested periods in order, each with its stats filled in.
    pub periods: Vec<ComparisonPeriod>,
    /// Period-over-period changes; empty for a single period.
    pub deltas: Vec<PeriodDelta>,
    pub insight: Option<TrendInsight>,
    /// Files skipped across all periods.
    pub skipped: Vec<SkippedFile>,
    pub draft: ReportDraft,
}

impl SessionReport {
    /// The last (current) period.
    pub fn current(&self) -> Option<&ComparisonPeriod> {
        self.periods.last()
    }

    pub fn is_comparison(&self) -> bool {
        self.periods.len() > 1
    }

    /// Assemble the exportable document.
    pub fn document(&self) -> ReportDocument {
        ReportDocument::assemble(
            &self.draft,
            &self.periods,
            self.deltas.clone(),
            self.insight.clone(),
        )
    }
}

// ── ReportSession ─────────────────────────────────────────────────────────────

/// Stateless runner for [`ReportConfig`]s.
pub struct ReportSession;

impl ReportSession {
    /// Run every period of `config`.
    ///
    /// Fails with [`ReportError::Config`] when no period is requested and
    /// with [`ReportError::PeriodWithoutData`] when a period has no usable
    /// data.
    pub async fn run(config: &ReportConfig) -> Result<SessionReport> {
        if config.periods.is_empty() {
            return Err(ReportError::Config("no reporting period requested".to_string()));
        }

        let mut periods = Vec::with_capacity(config.periods.len());
        let mut skipped = Vec::new();

        for spec in &config.periods {
            let period = spec.to_period();
            let paths = expand_inputs(&period.files);
            tracing::info!(
                period = %period.id,
                files = paths.len(),
                "processing period"
            );

            let outcome = process_files(&paths).await;
            skipped.extend(outcome.skipped);

            let stats = match UsageAggregator::aggregate(&outcome.files) {
                Ok(stats) => stats,
                Err(ReportError::NoUsableData) => {
                    return Err(ReportError::PeriodWithoutData {
                        period: period.label(),
                    })
                }
                Err(e) => return Err(e),
            };
            tracing::info!(
                period = %period.id,
                servers = stats.server_count(),
                calls = stats.total_calls,
                "period aggregated"
            );
            periods.push(period.with_stats(stats));
        }

        let deltas = TrendAnalyzer::period_deltas(&periods);
        let insight = TrendAnalyzer::insight(&periods);
        let draft = ReportDraft::for_periods(&periods)
            .ok_or(ReportError::NoUsableData)?
            .with_overrides(config.title.clone(), config.summary.clone());

        Ok(SessionReport {
            periods,
            deltas,
            insight,
            skipped,
            draft,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
