use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

/// Read-only view of the frozen summary text.
pub struct SummaryView<'a> {
    text: &'a str,
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> SummaryView<'a> {
    pub fn new(text: &'a str, scroll: u16, theme: &'a Theme) -> Self {
        Self {
            text,
            scroll,
            theme,
        }
    }
}

impl Widget for SummaryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" End of Day Summary ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));

        let lines: Vec<Line> = self
            .text
            .lines()
            .map(|l| Line::styled(l, Style::default().fg(colors.fg())))
            .collect();

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}
