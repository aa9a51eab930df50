//! The results container: the display sink for rendered candidates.

use ratatui::layout::Rect;

use super::candidate::Candidate;

/// Class tagged onto every rendered result item.
pub const RESULT_ITEM_CLASS: &str = "smart_autocomplete_result";

/// Class tagged onto the no-results notice.
pub const NO_RESULTS_CLASS: &str = "_smart_autocomplete_no_result";

/// Notice shown when a filter pass yields nothing.
pub const NO_RESULTS_NOTICE: &str = "Sorry, No Results Found";

/// Default number of rows shown before the list scrolls.
pub const DEFAULT_MAX_VISIBLE: usize = 8;

/// A formatted candidate placed in the container.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItem {
    /// The display fragment produced by the formatter.
    pub text: String,
    /// Marks the fragment as a result item.
    pub class: &'static str,
    /// The candidate the fragment was produced from.
    pub candidate: Candidate,
}

impl RenderedItem {
    /// Creates a result item from a formatted fragment.
    pub fn new(text: impl Into<String>, candidate: Candidate) -> Self {
        Self {
            text: text.into(),
            class: RESULT_ITEM_CLASS,
            candidate,
        }
    }
}

/// A notice line shown in place of result items.
#[derive(Debug, Clone, PartialEq)]
struct Notice {
    text: String,
    class: &'static str,
}

/// State of the results popup for one field.
#[derive(Debug, Clone)]
pub struct ResultsContainer {
    items: Vec<RenderedItem>,
    notice: Option<Notice>,
    visible: bool,
    area: Option<Rect>,
    highlighted: Option<usize>,
    title: String,
    max_visible: usize,
}

impl Default for ResultsContainer {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            notice: None,
            visible: false,
            area: None,
            highlighted: None,
            title: " Results ".to_string(),
            max_visible: DEFAULT_MAX_VISIBLE,
        }
    }
}

impl ResultsContainer {
    /// Creates a hidden, empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the popup title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the number of rows shown before the list scrolls.
    pub fn with_max_visible(mut self, rows: usize) -> Self {
        self.max_visible = rows.max(1);
        self
    }

    /// Replaces all content with the given items in one pass.
    pub fn replace(&mut self, items: Vec<RenderedItem>) {
        self.items = items;
        self.notice = None;
        self.highlighted = None;
    }

    /// Removes all items and any notice.
    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Clears the items and shows a no-results notice line instead.
    pub fn show_notice(&mut self, notice: impl Into<String>) {
        self.clear();
        self.notice = Some(Notice {
            text: notice.into(),
            class: NO_RESULTS_CLASS,
        });
    }

    /// Makes the container visible at the given area.
    pub fn reveal(&mut self, area: Option<Rect>) {
        if area.is_some() {
            self.area = area;
        }
        self.visible = true;
    }

    /// Hides the container. Content is kept.
    pub fn hide(&mut self) {
        self.visible = false;
        self.highlighted = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn items(&self) -> &[RenderedItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&RenderedItem> {
        self.items.get(index)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.text.as_str())
    }

    pub fn notice_class(&self) -> Option<&'static str> {
        self.notice.as_ref().map(|n| n.class)
    }

    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Returns the highlighted item, if any.
    pub fn highlighted_item(&self) -> Option<&RenderedItem> {
        self.highlighted.and_then(|i| self.items.get(i))
    }

    /// Moves the highlight down, starting at the first item.
    pub fn highlight_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(i) => (i + 1).min(self.items.len() - 1),
        });
    }

    /// Moves the highlight up; moving above the first item clears it.
    pub fn highlight_previous(&mut self) {
        self.highlighted = match self.highlighted {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Returns the concatenated text of all items and the notice.
    pub fn text_content(&self) -> String {
        let mut text: String = self.items.iter().map(|item| item.text.as_str()).collect();
        if let Some(notice) = &self.notice {
            text.push_str(&notice.text);
        }
        text
    }

    /// Number of rows the popup needs, capped at the visible maximum.
    pub fn row_count(&self) -> usize {
        let rows = if self.items.is_empty() {
            usize::from(self.notice.is_some())
        } else {
            self.items.len()
        };
        rows.min(self.max_visible)
    }
}

/// Computes the popup area directly below the field, with the field's width.
///
/// The height fits the rows plus borders and is clamped to `bounds`.
pub fn placement_below(field: Rect, rows: usize, bounds: Rect) -> Rect {
    let y = field.y.saturating_add(field.height);
    let bottom = bounds.y.saturating_add(bounds.height);
    let available = bottom.saturating_sub(y);
    let wanted = u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2);

    Rect::new(field.x, y, field.width, wanted.min(available))
}
