//! Input widget for the TUI.
//!
//! Draws the field text with a prompt and the type-ahead suggestion dimmed
//! after it.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Width of the "> " prompt.
pub const PROMPT_WIDTH: u16 = 2;

/// Calculates the scroll offset needed to keep the cursor visible.
///
/// Returns the number of characters to skip from the start of the text.
pub fn calculate_scroll_offset(cursor: usize, available_width: usize) -> usize {
    cursor.saturating_sub(available_width)
}

/// Input bar widget.
pub struct InputBar<'a> {
    text: &'a str,
    cursor: usize,
    suggestion: Option<&'a str>,
    focused: bool,
    title: &'a str,
}

impl<'a> InputBar<'a> {
    /// Creates a new input bar widget.
    pub fn new(text: &'a str, cursor: usize, focused: bool) -> Self {
        Self {
            text,
            cursor,
            suggestion: None,
            focused,
            title: " Input ",
        }
    }

    /// Shows a type-ahead suffix after the text.
    pub fn suggestion(mut self, suggestion: Option<&'a str>) -> Self {
        self.suggestion = suggestion;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Returns the text width available inside the borders.
    pub fn available_width(area: Rect) -> usize {
        // Borders (2) + prompt + cursor cell (1)
        area.width.saturating_sub(PROMPT_WIDTH + 3) as usize
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(self.title);

        let prompt_style = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
        let suggestion_style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);

        let scroll_offset = calculate_scroll_offset(self.cursor, Self::available_width(area));
        let visible_text: String = self.text.chars().skip(scroll_offset).collect();

        let mut spans = vec![
            Span::styled("> ", prompt_style),
            Span::raw(visible_text),
        ];
        if let Some(suggestion) = self.suggestion {
            spans.push(Span::styled(suggestion, suggestion_style));
        }

        Paragraph::new(Line::from(spans))
            .block(block)
            .render(area, buf);
    }
}
