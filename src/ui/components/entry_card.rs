use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::Row;
use crate::catalog::Catalog;
use crate::engine::entry::RepresentativeEntry;
use crate::ui::theme::Theme;

const NAME_WIDTH: usize = 18;

/// Form card for one representative entry.
pub struct EntryCard<'a> {
    entry: &'a RepresentativeEntry,
    number: usize,
    catalog: &'a Catalog,
    rows: &'a [Row],
    row_cursor: usize,
    category_cursor: usize,
    theme: &'a Theme,
}

impl<'a> EntryCard<'a> {
    pub fn new(
        entry: &'a RepresentativeEntry,
        number: usize,
        catalog: &'a Catalog,
        rows: &'a [Row],
        theme: &'a Theme,
    ) -> Self {
        Self {
            entry,
            number,
            catalog,
            rows,
            row_cursor: 0,
            category_cursor: 0,
            theme,
        }
    }

    pub fn cursor(mut self, row: usize, category: usize) -> Self {
        self.row_cursor = row;
        self.category_cursor = category;
        self
    }

    fn row_style(&self, focused: bool) -> Style {
        let colors = &self.theme.colors;
        if focused {
            Style::default()
                .fg(colors.accent())
                .bg(colors.selection_bg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        }
    }

    fn rep_line(&self, focused: bool) -> Line<'a> {
        let colors = &self.theme.colors;
        let indicator = if focused { " > " } else { "   " };
        let value = if self.entry.rep_code.is_empty() {
            Span::styled(
                "(none) [Enter] pick  [e] type code",
                Style::default().fg(colors.text_dim()),
            )
        } else {
            Span::styled(
                self.entry.rep_code.clone(),
                Style::default().fg(colors.quantity()).add_modifier(Modifier::BOLD),
            )
        };
        Line::from(vec![
            Span::styled(format!("{indicator}Rep: "), self.row_style(focused)),
            value,
        ])
    }

    fn category_line(&self, focused: bool) -> Line<'a> {
        let colors = &self.theme.colors;
        let indicator = if focused { " > " } else { "   " };
        let mut spans = vec![Span::styled(indicator, self.row_style(focused))];
        for (i, category) in self.catalog.categories.iter().enumerate() {
            let selected = self.entry.is_category_selected(&category.tag);
            let mut style = if selected {
                Style::default().fg(colors.text_dim())
            } else {
                Style::default().fg(colors.fg())
            };
            if focused && i == self.category_cursor {
                style = style.bg(colors.selection_bg()).add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(format!("[{}]", category.tag), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn counter_line(&self, name: &str, qty: u32, focused: bool) -> Line<'a> {
        let colors = &self.theme.colors;
        let indicator = if focused { " > " } else { "   " };
        let label = if name.is_empty() { "(unnamed)" } else { name };
        let qty_style = if qty > 0 {
            Style::default().fg(colors.quantity()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text_dim())
        };
        Line::from(vec![
            Span::styled(
                format!("{indicator}{label:>width$}  - ", width = NAME_WIDTH),
                self.row_style(focused),
            ),
            Span::styled(format!("{qty:>3}"), qty_style),
            Span::styled(" +", self.row_style(focused)),
        ])
    }

    fn heading(&self, text: String) -> Line<'a> {
        Line::from(Span::styled(
            format!("   {text}"),
            Style::default()
                .fg(self.theme.colors.accent())
                .add_modifier(Modifier::UNDERLINED),
        ))
    }

    /// Card lines plus the line index of the focused row.
    fn build_lines(&self) -> (Vec<Line<'a>>, usize) {
        let mut lines = Vec::new();
        let mut focused_line = 0;
        let mut last_group: Option<&str> = None;

        for (i, row) in self.rows.iter().enumerate() {
            let focused = i == self.row_cursor;
            let group = match row {
                Row::Product { category, .. } => Some(category.as_str()),
                Row::CustomProduct(_) | Row::AddCustom => Some("Custom"),
                _ => None,
            };
            if group.is_some() && group != last_group {
                lines.push(Line::from(""));
                lines.push(self.heading(format!("{} Products", group.unwrap_or_default())));
            }
            last_group = group;

            if focused {
                focused_line = lines.len();
            }
            let line = match row {
                Row::RepCode => self.rep_line(focused),
                Row::Categories => self.category_line(focused),
                Row::Product { name, .. } => {
                    let qty = self.entry.products.get(name).unwrap_or(0);
                    self.counter_line(name, qty, focused)
                }
                Row::CustomProduct(name) => {
                    let qty = self.entry.custom_products.get(name).unwrap_or(0);
                    self.counter_line(name, qty, focused)
                }
                Row::AddCustom => Line::from(Span::styled(
                    format!("{}+ Add custom product", if focused { " > " } else { "   " }),
                    self.row_style(focused),
                )),
                Row::AccProfit => {
                    if lines.last().is_some_and(|l| l.width() > 0) {
                        lines.push(Line::from(""));
                    }
                    if focused {
                        focused_line = lines.len();
                    }
                    let profit = if self.entry.acc_profit.is_empty() {
                        "(not set)".to_string()
                    } else {
                        format!("${}", self.entry.acc_profit)
                    };
                    Line::from(Span::styled(
                        format!("{}ACC profit: {profit}", if focused { " > " } else { "   " }),
                        self.row_style(focused),
                    ))
                }
            };
            lines.push(line);
        }
        (lines, focused_line)
    }
}

impl Widget for EntryCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = if self.entry.rep_code.is_empty() {
            format!(" Rep {} ", self.number)
        } else {
            format!(" Rep {} - {} ", self.number, self.entry.rep_code)
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        let (lines, focused_line) = self.build_lines();
        let scroll = focused_line.saturating_sub(inner.height as usize - 1) as u16;
        Paragraph::new(lines).scroll((scroll, 0)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_lines_group_products_under_headings() {
        let catalog = Catalog::bundled("standard").unwrap();
        let theme = Theme::default();
        let mut entry = RepresentativeEntry::new();
        entry.rep_code = "AA8".to_string();
        entry.selected_categories.push("SMB".to_string());
        entry.products.upsert("SMB TERM", 4);
        let rows = vec![
            Row::RepCode,
            Row::Categories,
            Row::Product {
                category: "SMB".to_string(),
                name: "SMB TERM".to_string(),
            },
        ];

        let card = EntryCard::new(&entry, 1, &catalog, &rows, &theme).cursor(2, 0);
        let (lines, focused) = card.build_lines();
        let rendered: Vec<String> = lines.iter().map(text).collect();

        assert_eq!(rendered[0], "   Rep: AA8");
        assert!(rendered[1].contains("[SMB]"));
        assert_eq!(rendered[3], "   SMB Products");
        assert!(rendered[4].starts_with(" > "));
        assert!(rendered[4].contains("SMB TERM"));
        assert!(rendered[4].contains("  4 +"));
        assert_eq!(focused, 4);
    }

    #[test]
    fn test_acc_profit_line() {
        let catalog = Catalog::bundled("standard").unwrap();
        let theme = Theme::default();
        let mut entry = RepresentativeEntry::new();
        entry.products.upsert("ACC", 1);
        entry.acc_profit = "75".to_string();
        let rows = vec![Row::RepCode, Row::Categories, Row::AccProfit];

        let card = EntryCard::new(&entry, 1, &catalog, &rows, &theme);
        let (lines, _) = card.build_lines();
        let last = text(lines.last().unwrap());
        assert_eq!(last, "   ACC profit: $75");
    }
}
