//! Application state for the TUI.
//!
//! Wraps one autocomplete field, the runner for its deferred filter passes,
//! and the list of values picked so far.

use super::events::Event;
use super::ui;
use crate::autocomplete::{
    AutocompleteEvent, AutocompleteField, EventKind, FilterOutcome, FilterPass, FilterRunner,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// The field being edited.
    pub field: AutocompleteField,
    /// Runs remote and custom filter passes.
    pub runner: FilterRunner,
    /// Whether the app should keep running.
    pub running: bool,
    /// Screen area of the last layout.
    pub screen: Rect,
    selections: Arc<Mutex<Vec<String>>>,
}

impl App {
    /// Creates the app around a field and records every selection it makes.
    pub fn new(mut field: AutocompleteField) -> Self {
        let selections = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&selections);
        field.subscribe(EventKind::ItemSelected, move |event| {
            if let AutocompleteEvent::ItemSelected { text, .. } = event {
                info!("Selected '{}'", text);
                if let Ok(mut list) = sink.lock() {
                    list.push(text.clone());
                }
            }
        });

        Self {
            field,
            runner: FilterRunner::new(),
            running: true,
            screen: Rect::default(),
            selections,
        }
    }

    /// Handles an input event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => self.resize(Rect::new(0, 0, width, height)),
            Event::Tick => {}
        }
    }

    /// Handles a key press: global shortcuts first, then the field.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.running = false;
                    return;
                }
                KeyCode::Char('u') => {
                    self.field.clear();
                    return;
                }
                _ => {}
            }
        }

        let pass = self.field.handle_key(key);
        self.dispatch(pass);
    }

    /// Types text into the field one character at a time.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    /// Selects the result at `index`. Returns false if there is none.
    pub fn select(&mut self, index: usize) -> bool {
        self.field.select_index(index)
    }

    /// Applies the results of a deferred pass.
    pub fn apply_outcome(&mut self, outcome: FilterOutcome) {
        if outcome.field != self.field.name() {
            debug!("Ignoring results for unknown field '{}'", outcome.field);
            return;
        }
        self.field.apply_results(outcome.generation, outcome.results);
    }

    /// Applies every deferred pass that has completed. Returns how many there were.
    pub fn drain_outcomes(&mut self) -> usize {
        let mut count = 0;
        while let Some(outcome) = self.runner.try_recv() {
            self.apply_outcome(outcome);
            count += 1;
        }
        count
    }

    /// Lays the field out for a new screen size.
    pub fn resize(&mut self, area: Rect) {
        self.screen = area;
        let layout = ui::layout(area);
        self.field.set_layout(layout.input, area);
    }

    /// Returns the values picked so far, oldest first.
    pub fn selections(&self) -> Vec<String> {
        self.selections
            .lock()
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    fn dispatch(&mut self, pass: FilterPass) {
        if let FilterPass::Deferred(job) = pass {
            debug!(field = %job.field, query = %job.query, "Submitting filter pass");
            self.runner.submit(job);
        }
    }
}
