//! The autocomplete controller bound to one input field.
//!
//! Keystroke, query changed, filter, then either render and reveal or the
//! no-match notice.
//! Selection writes the chosen item back into the field and hides the
//! results. Static sources are filtered synchronously; remote and custom
//! sources produce a [`FilterJob`] that a [`FilterRunner`](super::runner::FilterRunner)
//! executes and feeds back through [`AutocompleteField::apply_results`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::candidate::Candidate;
use super::container::{placement_below, RenderedItem, ResultsContainer, NO_RESULTS_NOTICE};
use super::events::{AutocompleteEvent, EventBus, EventKind};
use super::filter::{filter_candidates, CandidateFilter, MaxResults};
use super::input::InputField;
use super::options::{AutocompleteOptions, OptionOverrides};
use super::source::Source;
use crate::error::Result;

/// A deferred filter pass for a remote or custom source.
#[derive(Clone)]
pub struct FilterJob {
    /// Name of the field the pass belongs to.
    pub field: String,
    /// Pass number; results for any other pass number are discarded.
    pub generation: u64,
    /// The query being filtered.
    pub query: String,
    /// Debounce before the filter runs.
    pub delay: Duration,
    filter: Arc<dyn CandidateFilter>,
    max_results: MaxResults,
}

impl std::fmt::Debug for FilterJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterJob")
            .field("field", &self.field)
            .field("generation", &self.generation)
            .field("query", &self.query)
            .field("delay", &self.delay)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl FilterJob {
    pub fn new(
        field: impl Into<String>,
        generation: u64,
        query: impl Into<String>,
        delay: Duration,
        filter: Arc<dyn CandidateFilter>,
        max_results: MaxResults,
    ) -> Self {
        Self {
            field: field.into(),
            generation,
            query: query.into(),
            delay,
            filter,
            max_results,
        }
    }

    /// Runs the filter and truncates its results.
    pub async fn run(&self) -> Result<Vec<Candidate>> {
        let results = self.filter.filter(&self.query).await?;
        Ok(self.max_results.apply(results))
    }
}

/// What a query change led to.
#[derive(Debug)]
pub enum FilterPass {
    /// No filter ran (disabled, under the character threshold, or no text change).
    Skipped,
    /// A static or empty source was filtered and the results applied.
    Completed,
    /// A remote or custom filter must run; feed its results to `apply_results`.
    Deferred(FilterJob),
}

impl FilterPass {
    /// Returns the deferred job, if any.
    pub fn into_job(self) -> Option<FilterJob> {
        match self {
            Self::Deferred(job) => Some(job),
            _ => None,
        }
    }
}

/// An input field with autocomplete attached.
#[derive(Debug)]
pub struct AutocompleteField {
    name: String,
    input: InputField,
    options: AutocompleteOptions,
    container: ResultsContainer,
    events: EventBus,
    field_area: Option<Rect>,
    bounds: Option<Rect>,
    generation: u64,
    last_query: String,
}

impl AutocompleteField {
    /// Attaches autocomplete to a new field, resolving overrides over the defaults.
    pub fn attach(name: impl Into<String>, overrides: OptionOverrides) -> Self {
        let name = name.into();
        let options = AutocompleteOptions::resolve(None, overrides);
        debug!(field = %name, source = ?options.source, "Attached autocomplete");

        Self {
            name,
            input: InputField::new(),
            options,
            container: ResultsContainer::new(),
            events: EventBus::new(),
            field_area: None,
            bounds: None,
            generation: 0,
            last_query: String::new(),
        }
    }

    /// Uses a caller-supplied results container.
    pub fn with_container(mut self, container: ResultsContainer) -> Self {
        self.container = container;
        self
    }

    /// Merges overrides into the stored options and returns the result.
    pub fn configure(&mut self, overrides: OptionOverrides) -> &AutocompleteOptions {
        self.options = AutocompleteOptions::resolve(Some(&self.options), overrides);
        &self.options
    }

    /// Returns the stored options.
    pub fn options(&self) -> &AutocompleteOptions {
        &self.options
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    /// Returns the current field value.
    pub fn value(&self) -> &str {
        self.input.text()
    }

    pub fn container(&self) -> &ResultsContainer {
        &self.container
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Returns the number of the latest filter pass.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Registers an observer for a notification.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&AutocompleteEvent) + Send + 'static,
    {
        self.events.subscribe(kind, handler);
    }

    /// Replaces the default behavior of a lifecycle notification.
    pub fn override_default<F>(&mut self, kind: EventKind, handler: F) -> Result<()>
    where
        F: FnMut(&AutocompleteEvent) + Send + 'static,
    {
        self.events.override_default(kind, handler)
    }

    /// Records where the field is drawn and the area the popup must fit in.
    pub fn set_layout(&mut self, field_area: Rect, bounds: Rect) {
        self.field_area = Some(field_area);
        self.bounds = Some(bounds);
        if self.container.is_visible() {
            let area = self.placement();
            self.container.reveal(area);
        }
    }

    /// Handles a key press on the field.
    pub fn handle_key(&mut self, key: KeyEvent) -> FilterPass {
        if key.kind != KeyEventKind::Press {
            return FilterPass::Skipped;
        }

        let changed = match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.insert(c);
                true
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => {
                self.input.move_left();
                false
            }
            KeyCode::Right => {
                if self.input.suggestion().is_some()
                    && self.input.cursor() == self.input.char_len()
                {
                    self.accept_suggestion();
                } else {
                    self.input.move_right();
                }
                false
            }
            KeyCode::Home => {
                self.input.move_home();
                false
            }
            KeyCode::End => {
                self.input.move_end();
                false
            }
            KeyCode::Tab => {
                if !self.accept_suggestion() && self.container.is_visible() {
                    self.container.highlight_next();
                }
                false
            }
            KeyCode::Down => {
                if self.container.is_visible() {
                    self.container.highlight_next();
                }
                false
            }
            KeyCode::Up => {
                if self.container.is_visible() {
                    self.container.highlight_previous();
                }
                false
            }
            KeyCode::Enter => {
                self.commit();
                false
            }
            KeyCode::Esc => {
                self.hide_results();
                false
            }
            _ => false,
        };

        if changed {
            let query = self.input.text().to_string();
            self.query_changed(query)
        } else {
            FilterPass::Skipped
        }
    }

    /// Publishes a query change and starts a filter pass for it.
    pub fn query_changed(&mut self, query: impl Into<String>) -> FilterPass {
        let query = query.into();
        self.events.emit(&AutocompleteEvent::QueryChanged {
            query: query.clone(),
        });

        if self.options.settings.disabled {
            return FilterPass::Skipped;
        }

        self.last_query = query.clone();
        self.generation += 1;

        if query.chars().count() < self.options.settings.min_char_limit {
            debug!(field = %self.name, "Query below {} characters", self.options.settings.min_char_limit);
            if self.container.is_visible() {
                self.hide_results();
            }
            self.input.set_suggestion(None);
            self.container.clear();
            return FilterPass::Skipped;
        }

        let generation = self.generation;
        let max_results = self.options.settings.max_results;

        // Result caps only apply to the built-in filters
        let (filter, max_results): (Arc<dyn CandidateFilter>, MaxResults) =
            match self.options.source.clone() {
                None => {
                    self.apply_results(generation, Vec::new());
                    return FilterPass::Completed;
                }
                Some(Source::StaticList(list)) => {
                    match filter_candidates(&query, &list, max_results) {
                        Ok(results) => {
                            self.apply_results(generation, results);
                        }
                        Err(e) => debug!(field = %self.name, "Filter failed: {}", e),
                    }
                    return FilterPass::Completed;
                }
                Some(Source::RemoteEndpoint(remote)) => {
                    (Arc::new(remote) as Arc<dyn CandidateFilter>, max_results)
                }
                Some(Source::Custom(filter)) => (filter, MaxResults::Unlimited),
            };

        debug!(field = %self.name, generation, "Deferring filter pass");
        FilterPass::Deferred(FilterJob::new(
            self.name.clone(),
            generation,
            query,
            self.options.settings.delay(),
            filter,
            max_results,
        ))
    }

    /// Applies results for the given pass.
    ///
    /// Returns false if the pass is stale or the field is disabled.
    pub fn apply_results(&mut self, generation: u64, results: Vec<Candidate>) -> bool {
        if generation != self.generation {
            debug!(
                field = %self.name,
                "Dropping results of pass {} (latest is {})", generation, self.generation
            );
            return false;
        }
        if self.options.settings.disabled {
            return false;
        }

        self.filter_ready(results);
        true
    }

    /// Renders a result set into the container, or takes the no-match path if empty.
    pub fn filter_ready(&mut self, results: Vec<Candidate>) {
        if self.options.settings.disabled {
            return;
        }

        self.events.emit(&AutocompleteEvent::FilterReady {
            results: results.clone(),
        });

        if results.is_empty() {
            self.no_match();
            return;
        }

        let items = results
            .iter()
            .map(|candidate| RenderedItem::new(self.options.format(candidate), candidate.clone()))
            .collect();
        self.container.replace(items);

        let run_default = self
            .events
            .emit(&AutocompleteEvent::ResultsShown { results });
        if run_default {
            self.default_show_results();
        }

        if self.options.settings.type_ahead {
            self.update_suggestion();
        }
    }

    /// Publishes results-hidden.
    pub fn hide_results(&mut self) {
        if self.events.emit(&AutocompleteEvent::ResultsHidden) {
            self.container.hide();
            self.input.set_suggestion(None);
        }
    }

    /// Publishes no-match for the latest query.
    pub fn no_match(&mut self) {
        let query = self.last_query.clone();
        if self.events.emit(&AutocompleteEvent::NoMatch { query }) {
            self.container.show_notice(NO_RESULTS_NOTICE);
            self.input.set_suggestion(None);
            let area = self.placement();
            self.container.reveal(area);
        }
    }

    /// Selects the rendered item at `index`. Returns false if there is none.
    pub fn select_index(&mut self, index: usize) -> bool {
        match self.container.item(index).cloned() {
            Some(item) => {
                self.select(item.text, Some(item.candidate));
                true
            }
            None => false,
        }
    }

    /// Publishes item-selected; by default writes `text` into the field and hides the results.
    pub fn select(&mut self, text: impl Into<String>, candidate: Option<Candidate>) {
        let text = text.into();
        // Results of passes started before the selection must not reopen the list
        self.generation += 1;

        let run_default = self.events.emit(&AutocompleteEvent::ItemSelected {
            text: text.clone(),
            candidate,
        });
        if run_default {
            self.input.set_value(text);
            self.hide_results();
        }
    }

    /// Accepts the type-ahead suggestion by selecting the best match it
    /// was taken from. Returns false if there is no suggestion.
    pub fn accept_suggestion(&mut self) -> bool {
        if self.input.suggestion().is_none() {
            return false;
        }
        self.select_index(0)
    }

    /// Commits the field: selects the highlighted item, or with forced
    /// selection the best match (clearing the field when nothing is listed).
    pub fn commit(&mut self) {
        if self.options.settings.disabled {
            return;
        }

        if let Some(index) = self.container.highlighted() {
            self.select_index(index);
            return;
        }

        if self.options.settings.force_select {
            if !self.select_index(0) {
                self.clear();
            }
            return;
        }

        self.hide_results();
    }

    /// Empties the field and hides the results.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.last_query.clear();
        self.input.clear();
        if self.container.is_visible() {
            self.hide_results();
        }
    }

    fn default_show_results(&mut self) {
        let area = self.placement();
        self.container.reveal(area);
    }

    fn placement(&self) -> Option<Rect> {
        let field = self.field_area?;
        let bounds = self.bounds.unwrap_or(Rect::new(0, 0, u16::MAX, u16::MAX));
        Some(placement_below(field, self.container.row_count(), bounds))
    }

    fn update_suggestion(&mut self) {
        let typed = self.input.text();
        let suffix = self.container.item(0).and_then(|best| {
            if typed.is_empty() || self.input.cursor() != self.input.char_len() {
                return None;
            }
            let typed_len = typed.chars().count();
            let prefix: String = best.text.chars().take(typed_len).collect();
            if prefix.to_lowercase() == typed.to_lowercase() {
                Some(best.text.chars().skip(typed_len).collect::<String>())
            } else {
                None
            }
        });
        let suffix = suffix.filter(|s| !s.is_empty());
        self.input.set_suggestion(suffix);
    }
}
