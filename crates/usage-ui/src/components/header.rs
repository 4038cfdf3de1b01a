use crate::themes::Theme;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Minimum width of the separator line under the title.
pub const SEPARATOR_WIDTH: usize = 60;

/// Report header rendering four lines:
///
/// 1. The report title.
/// 2. A `=` separator at least as wide as the title.
/// 3. The period label and file count in `[ label | N files ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    pub title: &'a str,
    pub period_label: &'a str,
    pub file_count: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str, period_label: &'a str, file_count: usize, theme: &'a Theme) -> Self {
        Self {
            title,
            period_label,
            file_count,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(self.title.width().max(SEPARATOR_WIDTH));
        let files = if self.file_count == 1 {
            "1 file".to_string()
        } else {
            format!("{} files", self.file_count)
        };

        vec![
            Line::from(Span::styled(self.title, self.theme.header)),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.period_label, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(files, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
