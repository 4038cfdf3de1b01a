//! Per-server usage table.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per server
//! plus a highlighted TOTAL row, and a plain-text variant of the same table
//! for non-interactive output.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use usage_core::formatting::format_count;
use usage_core::models::{AggregatedStats, ServerRecord};

use crate::themes::Theme;

pub const HEADERS: [&str; 6] = ["Server", "Date", "Idle", "Busy", "Fault", "Total"];

const MIN_SERVER_WIDTH: usize = 8;
const MAX_SERVER_WIDTH: usize = 40;
const DATE_WIDTH: usize = 12;
const COUNT_WIDTH: usize = 14;

/// Width of the server column: the widest identifier on screen, clamped.
pub fn server_column_width(servers: &[ServerRecord]) -> usize {
    servers
        .iter()
        .map(|s| s.server_ip.width())
        .chain(["Server".width(), "TOTAL".width()])
        .max()
        .unwrap_or(0)
        .clamp(MIN_SERVER_WIDTH, MAX_SERVER_WIDTH)
}

fn record_cells(record: &ServerRecord) -> [String; 6] {
    [
        record.server_ip.clone(),
        record.date.clone(),
        format_count(record.idle),
        format_count(record.busy),
        format_count(record.fault),
        format_count(record.total),
    ]
}

/// Render the server table for `stats` into `area`.
pub fn render_server_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    stats: &AggregatedStats,
    theme: &Theme,
) {
    let header = Row::new(
        HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let mut rows: Vec<Row> = stats
        .servers
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(record_cells(record).map(Cell::from)).style(style)
        })
        .collect();

    rows.push(Row::new(record_cells(&stats.total_row()).map(Cell::from)).style(theme.table_total));

    let server_width = server_column_width(&stats.servers) as u16;
    let widths = [
        Constraint::Length(server_width),
        Constraint::Length(DATE_WIDTH as u16),
        Constraint::Length(COUNT_WIDTH as u16),
        Constraint::Length(COUNT_WIDTH as u16),
        Constraint::Length(COUNT_WIDTH as u16),
        Constraint::Length(COUNT_WIDTH as u16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a placeholder when a period has no servers to show.
pub fn render_no_servers(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No server rows in the selected files", theme.warning)),
        Line::from(""),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Servers "),
        ),
        area,
    );
}

/// The server table as aligned plain text, TOTAL row last.
pub fn server_table_text(stats: &AggregatedStats) -> String {
    let server_width = server_column_width(&stats.servers);
    let widths = [
        server_width,
        DATE_WIDTH,
        COUNT_WIDTH,
        COUNT_WIDTH,
        COUNT_WIDTH,
        COUNT_WIDTH,
    ];

    let mut lines = Vec::with_capacity(stats.servers.len() + 3);
    lines.push(text_row(&HEADERS.map(str::to_string), &widths));
    lines.push("-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    for record in &stats.servers {
        lines.push(text_row(&record_cells(record), &widths));
    }
    lines.push(text_row(&record_cells(&stats.total_row()), &widths));
    lines.join("\n")
}

/// Left-align the first two columns, right-align counts.
fn text_row(cells: &[String; 6], widths: &[usize; 6]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            let pad = " ".repeat(width.saturating_sub(cell.width()));
            if i < 2 {
                format!("{cell}{pad}")
            } else {
                format!("{pad}{cell}")
            }
        })
        .collect();
    padded.join("  ").trim_end().to_string()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
