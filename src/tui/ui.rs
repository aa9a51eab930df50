//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::App;
use super::widgets::{header, input, results};
use crate::autocomplete::container::placement_below;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Screen regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub header: Rect,
    pub input: Rect,
    pub body: Rect,
    pub footer: Rect,
}

/// Splits the screen into header, input, body, and footer.
pub fn layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Input
            Constraint::Min(1),    // Selections
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    AppLayout {
        header: chunks[0],
        input: chunks[1],
        body: chunks[2],
        footer: chunks[3],
    }
}

/// Renders the entire UI, laying the field out for the current frame first.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    if app.screen != area {
        app.resize(area);
    }
    let regions = layout(area);

    render_header(frame, regions.header, app);
    render_selections(frame, regions.body, app);
    render_footer(frame, regions.footer);
    render_input(frame, regions.input, app);
    render_results(frame, regions.input, area, app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let source = app.field.options().source.as_ref().map(|s| s.kind());
    frame.render_widget(header::Header::new(app.field.name(), source), area);
}

/// Renders the values picked so far, newest first.
fn render_selections(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .selections()
        .into_iter()
        .rev()
        .map(|text| ListItem::new(Line::from(text)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Selected "),
    );
    frame.render_widget(list, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let hints = " ↑/↓ move  Enter select  Tab accept  Esc hide  Ctrl+U clear  Ctrl+C quit";
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let field = app.field.input();
    let widget = input::InputBar::new(field.text(), field.cursor(), true)
        .suggestion(field.suggestion());
    frame.render_widget(widget, area);

    let offset = input::calculate_scroll_offset(
        field.cursor(),
        input::InputBar::available_width(area),
    );
    // Border (1) + prompt
    let cursor_x = area.x + 1 + input::PROMPT_WIDTH + (field.cursor() - offset) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
}

fn render_results(frame: &mut Frame, input_area: Rect, bounds: Rect, app: &App) {
    let container = app.field.container();
    if !container.is_visible() {
        return;
    }

    let area = container
        .area()
        .unwrap_or_else(|| placement_below(input_area, container.row_count(), bounds));
    if area.height < 3 {
        return;
    }
    frame.render_widget(results::ResultsPopup::new(container), area);
}
