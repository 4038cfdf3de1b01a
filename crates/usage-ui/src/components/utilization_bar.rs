use crate::themes::Theme;
use ratatui::text::{Line, Span};
use usage_core::formatting::format_percent;
use usage_core::models::Utilization;

/// Visual configuration shared by every utilization bar.
pub struct BarConfig {
    /// Width in terminal columns of the bar portion (excluding labels).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

/// Which share of calls a bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilizationKind {
    Idle,
    Busy,
    Fault,
}

impl UtilizationKind {
    pub fn label(self) -> &'static str {
        match self {
            UtilizationKind::Idle => "Idle ",
            UtilizationKind::Busy => "Busy ",
            UtilizationKind::Fault => "Fault",
        }
    }
}

// ── UtilizationBar ───────────────────────────────────────────────────────────

/// One horizontal bar for a single utilization percentage.
///
/// Renders as `"Idle  ████░░░░ 75.00%"`. Fault bars take their colour from
/// [`Theme::fault_style`].
pub struct UtilizationBar<'a> {
    pub kind: UtilizationKind,
    /// Share of calls in percent, clamped to `[0.0, 100.0]`.
    pub percentage: f64,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> UtilizationBar<'a> {
    pub fn new(kind: UtilizationKind, percentage: f64, theme: &'a Theme) -> Self {
        let percentage = if percentage.is_finite() {
            percentage.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            kind,
            percentage,
            theme,
            config: BarConfig::default(),
        }
    }

    fn fill_style(&self) -> ratatui::style::Style {
        match self.kind {
            UtilizationKind::Idle => self.theme.bar_idle,
            UtilizationKind::Busy => self.theme.bar_busy,
            UtilizationKind::Fault => self.theme.fault_style(self.percentage),
        }
    }

    /// Render as label, filled portion, empty portion and percentage.
    pub fn to_line(&self) -> Line<'a> {
        let filled = ((self.percentage / 100.0) * self.config.width as f64).round() as u16;
        let filled = filled.min(self.config.width);
        let empty = self.config.width - filled;

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        Line::from(vec![
            Span::styled(format!("{} ", self.kind.label()), self.theme.label),
            Span::styled(filled_str, self.fill_style()),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(format!(" {}", format_percent(self.percentage)), self.theme.bar_label),
        ])
    }
}

/// The three bars for a period's utilization, idle first.
pub fn utilization_lines<'a>(utilization: &Utilization, theme: &'a Theme) -> Vec<Line<'a>> {
    [
        (UtilizationKind::Idle, utilization.idle),
        (UtilizationKind::Busy, utilization.busy),
        (UtilizationKind::Fault, utilization.fault),
    ]
    .into_iter()
    .map(|(kind, pct)| UtilizationBar::new(kind, pct, theme).to_line())
    .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_bar_quarter() {
        let theme = Theme::dark();
        let line = UtilizationBar::new(UtilizationKind::Busy, 25.0, &theme).to_line();

        assert_eq!(line.spans.len(), 4, "label, filled, empty, percentage");
        assert_eq!(line.spans[1].content.chars().count(), 10);
        assert!(line.spans[1].content.chars().all(|c| c == '█'));
        assert_eq!(line.spans[2].content.chars().count(), 30);
        assert!(line.spans[2].content.chars().all(|c| c == '░'));
        assert!(text(&line).ends_with(" 25.00%"));
    }

    #[test]
    fn test_bar_two_decimal_label() {
        let theme = Theme::dark();
        let line = UtilizationBar::new(UtilizationKind::Fault, 6.25, &theme).to_line();
        assert!(text(&line).contains("6.25%"));
        assert!(text(&line).starts_with("Fault"));
    }

    #[test]
    fn test_bar_clamps_out_of_range() {
        let theme = Theme::dark();
        let full = UtilizationBar::new(UtilizationKind::Idle, 150.0, &theme);
        assert_eq!(full.percentage, 100.0);
        let line = full.to_line();
        assert_eq!(line.spans[1].content.chars().count(), 40);
        assert_eq!(line.spans[2].content.len(), 0);

        let nan = UtilizationBar::new(UtilizationKind::Idle, f64::NAN, &theme);
        assert_eq!(nan.percentage, 0.0);
        assert_eq!(nan.to_line().spans[1].content.len(), 0);
    }

    #[test]
    fn test_fault_bar_colour_follows_severity() {
        let theme = Theme::dark();
        let low = UtilizationBar::new(UtilizationKind::Fault, 2.0, &theme).to_line();
        let high = UtilizationBar::new(UtilizationKind::Fault, 20.0, &theme).to_line();
        assert_eq!(low.spans[1].style.fg, Some(Color::Green));
        assert_eq!(high.spans[1].style.fg, Some(Color::Red));
    }

    #[test]
    fn test_utilization_lines_order() {
        let theme = Theme::dark();
        let utilization = Utilization {
            idle: 75.0,
            busy: 18.75,
            fault: 6.25,
        };
        let lines = utilization_lines(&utilization, &theme);
        assert_eq!(lines.len(), 3);
        assert!(text(&lines[0]).starts_with("Idle"));
        assert!(text(&lines[1]).contains("18.75%"));
        assert!(text(&lines[2]).starts_with("Fault"));
    }
}
