//! Header widget for the TUI.
//!
//! Displays the application name, version, and the active field and source.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    field: &'a str,
    source: Option<&'a str>,
}

impl<'a> Header<'a> {
    /// Creates a new header widget.
    pub fn new(field: &'a str, source: Option<&'a str>) -> Self {
        Self { field, source }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_text = format!(" smart-complete v{}", env!("CARGO_PKG_VERSION"));
        buf.set_span(area.x, area.y, &Span::styled(left_text, style), area.width);

        let right_text = format!(
            " [{}: {}] ",
            self.field,
            self.source.unwrap_or("no source")
        );
        let right_width = right_text.chars().count() as u16;
        if right_width < area.width {
            let right_x = area.right().saturating_sub(right_width);
            buf.set_string(right_x, area.y, &right_text, style);
        }
    }
}
