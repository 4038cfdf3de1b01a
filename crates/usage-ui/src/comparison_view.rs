//! Multi-period comparison table and trend insight line.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use usage_core::formatting::{
    format_count, format_number, format_percent, format_points, format_signed_percent,
};
use usage_core::models::{ComparisonPeriod, PeriodDelta, TrendDirection, TrendInsight, Utilization};

use crate::themes::Theme;

pub const HEADERS: [&str; 7] = ["Period", "Calls", "Idle", "Busy", "Fault", "Calls \u{0394}", "Fault \u{0394}"];

/// One row of the comparison table.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub id: String,
    pub label: String,
    pub total_calls: u64,
    pub utilization: Utilization,
    /// Relative change in calls against the previous period; `None` for the first.
    pub calls_change: Option<f64>,
    /// Fault utilization change in percentage points; `None` for the first.
    pub fault_change_pp: Option<f64>,
}

/// Build table rows for every period carrying stats.
pub fn comparison_rows(periods: &[ComparisonPeriod], deltas: &[PeriodDelta]) -> Vec<ComparisonRow> {
    periods
        .iter()
        .filter_map(|period| {
            let stats = period.stats.as_ref()?;
            let delta = deltas.iter().find(|d| d.to_id == period.id).map(|d| d.delta);
            Some(ComparisonRow {
                id: period.id.clone(),
                label: period.label(),
                total_calls: stats.total_calls,
                utilization: stats.utilization,
                calls_change: delta.map(|d| d.total_calls_pct),
                fault_change_pp: delta.map(|d| d.fault_utilization_pp),
            })
        })
        .collect()
}

/// One-sentence description of the fault trend.
pub fn insight_text(insight: &TrendInsight) -> String {
    let movement = match insight.direction {
        TrendDirection::Increased => "increased",
        TrendDirection::Decreased => "decreased",
    };
    format!(
        "Fault utilization {} by {} pp from {} ({}) to {} ({}). Peak: {} in {}.",
        movement,
        format_number(insight.magnitude, 2),
        insight.baseline_label,
        format_percent(insight.baseline_fault),
        insight.current_label,
        format_percent(insight.current_fault),
        format_percent(insight.peak_fault),
        insight.peak_label,
    )
}

fn row_cells(row: &ComparisonRow) -> [String; 7] {
    [
        row.label.clone(),
        format_count(row.total_calls),
        format_percent(row.utilization.idle),
        format_percent(row.utilization.busy),
        format_percent(row.utilization.fault),
        row.calls_change
            .map(format_signed_percent)
            .unwrap_or_else(|| "-".to_string()),
        row.fault_change_pp
            .map(format_points)
            .unwrap_or_else(|| "-".to_string()),
    ]
}

fn period_column_width(rows: &[ComparisonRow]) -> usize {
    rows.iter()
        .map(|r| r.label.width())
        .chain(std::iter::once("Period".width()))
        .max()
        .unwrap_or(0)
}

/// Render the comparison table with the insight line beneath it.
pub fn render_comparison_view(
    frame: &mut Frame,
    area: Rect,
    periods: &[ComparisonPeriod],
    deltas: &[PeriodDelta],
    insight: Option<&TrendInsight>,
    theme: &Theme,
) {
    let rows = comparison_rows(periods, deltas);
    let [table_area, insight_area] =
        Layout::vertical([Constraint::Min(4), Constraint::Length(2)]).areas(area);

    let header = Row::new(
        HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    );

    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let base = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let [label, calls, idle, busy, fault, calls_change, fault_change] = row_cells(row);
            Row::new(vec![
                Cell::from(label),
                Cell::from(calls),
                Cell::from(idle),
                Cell::from(busy),
                Cell::from(fault).style(theme.fault_style(row.utilization.fault)),
                Cell::from(calls_change),
                Cell::from(fault_change)
                    .style(theme.change_style(row.fault_change_pp.unwrap_or(0.0))),
            ])
            .style(base)
        })
        .collect();

    let widths = [
        Constraint::Length(period_column_width(&rows) as u16),
        Constraint::Length(14),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(11),
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Period Comparison "),
        )
        .style(theme.text);
    frame.render_widget(table, table_area);

    let line = match insight {
        Some(insight) => Line::from(Span::styled(
            insight_text(insight),
            theme.fault_style(insight.current_fault),
        )),
        None => Line::from(Span::styled(
            "Trend needs at least two periods with data.",
            theme.dim,
        )),
    };
    frame.render_widget(Paragraph::new(line), insight_area);
}

/// The comparison table and insight as plain text.
pub fn comparison_text(
    periods: &[ComparisonPeriod],
    deltas: &[PeriodDelta],
    insight: Option<&TrendInsight>,
) -> String {
    let rows = comparison_rows(periods, deltas);
    let cells: Vec<[String; 7]> = rows.iter().map(row_cells).collect();

    let mut widths = HEADERS.map(|h| h.width());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let format_row = |row: &[String; 7]| -> String {
        let padded: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &width))| {
                let pad = " ".repeat(width.saturating_sub(cell.width()));
                if i == 0 {
                    format!("{cell}{pad}")
                } else {
                    format!("{pad}{cell}")
                }
            })
            .collect();
        padded.join("  ")
    };

    let mut lines = vec![format_row(&HEADERS.map(str::to_string))];
    lines.push("-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    lines.extend(cells.iter().map(format_row));
    if let Some(insight) = insight {
        lines.push(String::new());
        lines.push(insight_text(insight));
    }
    lines.join("\n")
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use usage_core::models::{AggregatedStats, StatsDelta};

    fn period(month: u32, calls: u64, fault: u64) -> ComparisonPeriod {
        let idle = calls - fault;
        ComparisonPeriod::new(format!("2024-{:02}", month), month, 2024, Vec::new()).with_stats(
            AggregatedStats {
                total_idle: idle,
                total_fault: fault,
                total_calls: calls,
                utilization: Utilization::from_totals(idle, 0, fault, calls),
                file_count: 1,
                ..Default::default()
            },
        )
    }

    fn delta(from: &str, to: &str, calls_pct: f64, fault_pp: f64) -> PeriodDelta {
        PeriodDelta {
            from_id: from.to_string(),
            to_id: to.to_string(),
            from_label: String::new(),
            to_label: String::new(),
            delta: StatsDelta {
                total_calls_pct: calls_pct,
                fault_utilization_pp: fault_pp,
                ..Default::default()
            },
        }
    }

    fn insight() -> TrendInsight {
        TrendInsight {
            direction: TrendDirection::Increased,
            magnitude: 1.0,
            baseline_label: "January 2024".to_string(),
            current_label: "March 2024".to_string(),
            baseline_fault: 2.0,
            current_fault: 3.0,
            peak_index: 1,
            peak_period_id: "2024-02".to_string(),
            peak_label: "February 2024".to_string(),
            peak_fault: 5.0,
        }
    }

    #[test]
    fn test_comparison_rows_attach_deltas() {
        let periods = vec![period(1, 100, 2), period(2, 200, 10)];
        let deltas = vec![delta("2024-01", "2024-02", 100.0, 3.0)];
        let rows = comparison_rows(&periods, &deltas);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].calls_change, None);
        assert_eq!(rows[1].calls_change, Some(100.0));
        assert_eq!(rows[1].fault_change_pp, Some(3.0));
        assert_eq!(rows[1].label, "February 2024");
    }

    #[test]
    fn test_comparison_rows_skip_periods_without_stats() {
        let periods = vec![
            period(1, 100, 2),
            ComparisonPeriod::new("2024-02", 2, 2024, Vec::new()),
        ];
        assert_eq!(comparison_rows(&periods, &[]).len(), 1);
    }

    #[test]
    fn test_insight_text() {
        let text = insight_text(&insight());
        assert_eq!(
            text,
            "Fault utilization increased by 1.00 pp from January 2024 (2.00%) \
             to March 2024 (3.00%). Peak: 5.00% in February 2024."
        );
    }

    #[test]
    fn test_comparison_text() {
        let periods = vec![period(1, 100, 2), period(2, 1_000, 50)];
        let deltas = vec![delta("2024-01", "2024-02", 900.0, 3.0)];
        let insight = insight();
        let text = comparison_text(&periods, &deltas, Some(&insight));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Period"));
        assert!(lines[2].starts_with("January 2024"));
        assert!(lines[2].ends_with('-'));
        assert!(lines[3].contains("1,000"));
        assert!(lines[3].contains("+900.00%"));
        assert!(lines[3].ends_with("+3.00 pp"));
        assert!(lines.last().unwrap().starts_with("Fault utilization increased"));
    }

    #[test]
    fn test_render_comparison_view() {
        let backend = TestBackend::new(120, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let periods = vec![period(1, 100, 2), period(2, 200, 10)];
        let deltas = vec![delta("2024-01", "2024-02", 100.0, 3.0)];
        let insight = insight();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_comparison_view(frame, area, &periods, &deltas, Some(&insight), &theme);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("January 2024"));
        assert!(text.contains("Period Comparison"));
        assert!(text.contains("Fault utilization increased"));
    }

    #[test]
    fn test_render_without_insight_does_not_panic() {
        let backend = TestBackend::new(80, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::classic();
        let periods = vec![period(1, 100, 2)];

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_comparison_view(frame, area, &periods, &[], None, &theme);
            })
            .unwrap();
    }
}
