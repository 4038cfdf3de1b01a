//! Application state and event loop for the report dashboard.
//!
//! [`App`] owns the theme and the current view. [`App::run_report`] draws a
//! finished [`SessionReport`] until the user quits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use usage_core::models::ComparisonPeriod;
use usage_runtime::session::SessionReport;

use crate::comparison_view;
use crate::components::header::Header;
use crate::components::utilization_bar::utilization_lines;
use crate::table_view;
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the dashboard is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Per-server table of the current period.
    Servers,
    /// Period-over-period comparison.
    Comparison,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Servers => ViewMode::Comparison,
            ViewMode::Comparison => ViewMode::Servers,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, view_mode: ViewMode) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            should_quit: false,
        }
    }

    /// Starting view for `report`: comparison when several periods are shown.
    pub fn for_report(theme_name: &str, report: &SessionReport) -> Self {
        let view_mode = if report.is_comparison() {
            ViewMode::Comparison
        } else {
            ViewMode::Servers
        };
        Self::new(theme_name, view_mode)
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Draw `report` until `q`, `Q` or `Ctrl+C`. `Tab` switches views.
    pub fn run_report(mut self, report: &SessionReport) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame, report)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => self.view_mode = self.view_mode.toggled(),
            _ => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current view of `report` into `frame`.
    pub fn render(&self, frame: &mut Frame, report: &SessionReport) {
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_header(frame, header_area, report);
        match self.view_mode {
            ViewMode::Servers => self.render_servers(frame, body_area, report),
            ViewMode::Comparison => comparison_view::render_comparison_view(
                frame,
                body_area,
                &report.periods,
                &report.deltas,
                report.insight.as_ref(),
                &self.theme,
            ),
        }
        self.render_footer(frame, footer_area, report);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, report: &SessionReport) {
        let (label, file_count) = match self.view_mode {
            ViewMode::Servers => report
                .current()
                .map(|p| {
                    let files = p.stats.as_ref().map(|s| s.file_count).unwrap_or(0);
                    (p.label(), files)
                })
                .unwrap_or_default(),
            ViewMode::Comparison => {
                let label = comparison_label(&report.periods);
                let files = report
                    .periods
                    .iter()
                    .filter_map(|p| p.stats.as_ref())
                    .map(|s| s.file_count)
                    .sum();
                (label, files)
            }
        };

        let lines = Header::new(&report.draft.title, &label, file_count, &self.theme).to_lines();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_servers(&self, frame: &mut Frame, area: Rect, report: &SessionReport) {
        let Some(stats) = report.current().and_then(|p| p.stats.as_ref()) else {
            table_view::render_no_servers(frame, area, &self.theme);
            return;
        };

        let [summary_area, bars_area, table_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .areas(area);

        let summary = Paragraph::new(Line::from(Span::styled(
            report.draft.summary.as_str(),
            self.theme.text,
        )));
        frame.render_widget(summary, summary_area);
        frame.render_widget(
            Paragraph::new(utilization_lines(&stats.utilization, &self.theme)),
            bars_area,
        );

        if stats.servers.is_empty() {
            table_view::render_no_servers(frame, table_area, &self.theme);
        } else {
            table_view::render_server_table(frame, table_area, "Servers", stats, &self.theme);
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, report: &SessionReport) {
        let mut spans = vec![Span::styled(
            "Tab: switch view  q: quit",
            self.theme.dim,
        )];
        if !report.skipped.is_empty() {
            spans.push(Span::styled(
                format!("  {} file(s) skipped", report.skipped.len()),
                self.theme.warning,
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Header label for the comparison view: the first period, or first to last.
fn comparison_label(periods: &[ComparisonPeriod]) -> String {
    match periods {
        [] => String::new(),
        [only] => only.label(),
        [first, .., last] => format!("{} to {}", first.label(), last.label()),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
