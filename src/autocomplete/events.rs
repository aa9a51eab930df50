//! Field notifications and their dispatch.
//!
//! Six notifications fire on a field. The four lifecycle notifications
//! (results shown, results hidden, no match, item selected) have a built-in
//! default behavior. Callers either observe a notification, which leaves the
//! default in place, or override it, which sets an explicit per-event flag
//! that skips the default.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::candidate::Candidate;
use crate::error::{Result, SmartCompleteError};

/// Kinds of notification a field publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The field's text changed.
    QueryChanged,
    /// A filter pass produced its results.
    FilterReady,
    /// Results were rendered into the container.
    ResultsShown,
    /// The container was hidden.
    ResultsHidden,
    /// A filter pass produced no results.
    NoMatch,
    /// The user picked an item.
    ItemSelected,
}

impl EventKind {
    /// All kinds, in pipeline order.
    pub const ALL: [EventKind; 6] = [
        Self::QueryChanged,
        Self::FilterReady,
        Self::ResultsShown,
        Self::ResultsHidden,
        Self::NoMatch,
        Self::ItemSelected,
    ];

    /// Returns the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QueryChanged => "query_changed",
            Self::FilterReady => "filter_ready",
            Self::ResultsShown => "results_shown",
            Self::ResultsHidden => "results_hidden",
            Self::NoMatch => "no_match",
            Self::ItemSelected => "item_selected",
        }
    }

    /// Returns true if the kind has a default behavior that can be overridden.
    pub fn is_overridable(&self) -> bool {
        matches!(
            self,
            Self::ResultsShown | Self::ResultsHidden | Self::NoMatch | Self::ItemSelected
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification published by a field.
#[derive(Debug, Clone, PartialEq)]
pub enum AutocompleteEvent {
    QueryChanged { query: String },
    FilterReady { results: Vec<Candidate> },
    ResultsShown { results: Vec<Candidate> },
    ResultsHidden,
    NoMatch { query: String },
    ItemSelected { text: String, candidate: Option<Candidate> },
}

impl AutocompleteEvent {
    /// Returns the kind of this notification.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::QueryChanged { .. } => EventKind::QueryChanged,
            Self::FilterReady { .. } => EventKind::FilterReady,
            Self::ResultsShown { .. } => EventKind::ResultsShown,
            Self::ResultsHidden => EventKind::ResultsHidden,
            Self::NoMatch { .. } => EventKind::NoMatch,
            Self::ItemSelected { .. } => EventKind::ItemSelected,
        }
    }
}

/// A registered notification handler.
pub type Handler = Box<dyn FnMut(&AutocompleteEvent) + Send>;

/// Per-field registry of notification handlers.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<EventKind, Vec<Handler>>,
    overridden: HashSet<EventKind>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self
            .listeners
            .iter()
            .map(|(kind, list)| (kind.as_str(), list.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("listeners", &counts)
            .field("overridden", &self.overridden)
            .finish()
    }
}

impl EventBus {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer. The default behavior still runs.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&AutocompleteEvent) + Send + 'static,
    {
        self.push(kind, Box::new(handler));
    }

    /// Registers a handler that replaces the default behavior of `kind`.
    ///
    /// Fails for notifications that have no default behavior.
    pub fn override_default<F>(&mut self, kind: EventKind, handler: F) -> Result<()>
    where
        F: FnMut(&AutocompleteEvent) + Send + 'static,
    {
        if !kind.is_overridable() {
            return Err(SmartCompleteError::config(format!(
                "'{kind}' has no default behavior to override"
            )));
        }
        self.overridden.insert(kind);
        self.push(kind, Box::new(handler));
        Ok(())
    }

    /// Returns true if the default behavior of `kind` has been replaced.
    pub fn is_overridden(&self, kind: EventKind) -> bool {
        self.overridden.contains(&kind)
    }

    /// Runs every handler for the event in registration order.
    ///
    /// Returns true if the default behavior should run afterwards.
    pub fn emit(&mut self, event: &AutocompleteEvent) -> bool {
        let kind = event.kind();
        if let Some(handlers) = self.listeners.get_mut(&kind) {
            for handler in handlers.iter_mut() {
                handler(event);
            }
        }
        kind.is_overridable() && !self.is_overridden(kind)
    }

    fn push(&mut self, kind: EventKind, handler: Handler) {
        self.listeners.entry(kind).or_default().push(handler);
    }
}
