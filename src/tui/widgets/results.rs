//! Results popup widget for the TUI.
//!
//! Draws a field's results container: one row per rendered item, or the
//! no-results notice.

use crate::autocomplete::ResultsContainer;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Results popup widget.
pub struct ResultsPopup<'a> {
    container: &'a ResultsContainer,
}

impl<'a> ResultsPopup<'a> {
    /// Creates a new results popup widget.
    pub fn new(container: &'a ResultsContainer) -> Self {
        Self { container }
    }
}

/// Index of the first row to draw so the highlighted row stays visible.
fn first_visible_row(highlighted: Option<usize>, rows: usize) -> usize {
    match highlighted {
        Some(index) if rows > 0 && index >= rows => index + 1 - rows,
        _ => 0,
    }
}

impl Widget for ResultsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(self.container.title());

        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(notice) = self.container.notice() {
            Paragraph::new(notice)
                .style(Style::default().fg(Color::Yellow))
                .render(inner, buf);
            return;
        }

        let highlighted = self.container.highlighted();
        let skip = first_visible_row(highlighted, inner.height as usize);

        let rows = self
            .container
            .items()
            .iter()
            .enumerate()
            .skip(skip)
            .take(inner.height as usize);

        for (y, (idx, item)) in (inner.y..).zip(rows) {
            let style = if highlighted == Some(idx) {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let line_area = Rect::new(inner.x, y, inner.width, 1);
            buf.set_style(line_area, style);
            Paragraph::new(Line::from(Span::styled(item.text.as_str(), style)))
                .render(line_area, buf);
        }
    }
}
