use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::ui::line_input::{LineInput, PromptField};
use crate::ui::theme::Theme;

/// Rep code picker; the last option is the free-text sentinel.
pub struct RepPicker<'a> {
    pub options: &'a [&'a str],
    pub selected: usize,
    pub theme: &'a Theme,
}

impl Widget for RepPicker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(" Select Rep ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));

        let lines: Vec<Line> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, code)| {
                let is_selected = i == self.selected;
                let indicator = if is_selected { " > " } else { "   " };
                let style = if is_selected {
                    Style::default()
                        .fg(colors.accent())
                        .bg(colors.selection_bg())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(Span::styled(format!("{indicator}{code}"), style))
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// One-line text prompt.
pub struct Prompt<'a> {
    pub field: &'a PromptField,
    pub input: &'a LineInput,
    pub theme: &'a Theme,
}

impl Widget for Prompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(self.field.title())
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));

        let (before, cursor_ch, after) = self.input.render_parts();
        let cursor_style = Style::default().fg(colors.bg()).bg(colors.fg());
        let text_style = Style::default().fg(colors.fg());
        let input_line = Line::from(vec![
            Span::styled(format!(" {before}"), text_style),
            Span::styled(cursor_ch.unwrap_or(' ').to_string(), cursor_style),
            Span::styled(after, text_style),
        ]);
        let hint = Line::from(Span::styled(
            " [Enter] OK  [Esc] Cancel",
            Style::default().fg(colors.text_dim()),
        ));

        Paragraph::new(vec![input_line, Line::from(""), hint])
            .block(block)
            .render(area, buf);
    }
}

/// Yes/no confirmation before clearing every entry.
pub struct ConfirmReset<'a> {
    pub theme: &'a Theme,
}

impl Widget for ConfirmReset<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(" Clear All ")
            .border_style(Style::default().fg(colors.error()))
            .style(Style::default().bg(colors.bg()));

        let lines = vec![
            Line::from(Span::styled(
                " Discard every rep and count?",
                Style::default().fg(colors.warning()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                " [y] Clear  [n] Keep",
                Style::default().fg(colors.text_dim()),
            )),
        ];
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
