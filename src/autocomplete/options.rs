//! Per-field configuration and its resolution.
//!
//! Resolution precedence is built-in defaults < previously stored options <
//! call-site overrides, last writer wins per key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::candidate::Candidate;
use super::filter::MaxResults;
use super::source::Source;

/// Converts a candidate into the display fragment shown in the results list.
pub type ResultFormatter = Arc<dyn Fn(&Candidate) -> String + Send + Sync>;

/// Returns the built-in formatter, which displays the candidate text as is.
pub fn default_formatter() -> ResultFormatter {
    Arc::new(|candidate: &Candidate| candidate.text.clone())
}

fn default_min_char_limit() -> usize {
    2
}

fn default_delay_ms() -> u64 {
    300
}

/// Numeric thresholds and behavior switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Minimum query length (in characters) before filtering.
    #[serde(default = "default_min_char_limit")]
    pub min_char_limit: usize,

    /// Result cap for the default and remote filters.
    #[serde(default)]
    pub max_results: MaxResults,

    /// Debounce before a deferred filter pass runs.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Offer the best match as an inline completion.
    #[serde(default)]
    pub type_ahead: bool,

    /// Committing the field always yields a listed item.
    #[serde(default)]
    pub force_select: bool,

    /// Ignore query changes and filter results.
    #[serde(default)]
    pub disabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_char_limit: default_min_char_limit(),
            max_results: MaxResults::default(),
            delay_ms: default_delay_ms(),
            type_ahead: false,
            force_select: false,
            disabled: false,
        }
    }
}

impl Settings {
    /// Returns the debounce delay.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Optional counterparts of [`Settings`], as supplied by callers and config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsOverrides {
    pub min_char_limit: Option<usize>,
    pub max_results: Option<MaxResults>,
    pub delay_ms: Option<u64>,
    pub type_ahead: Option<bool>,
    pub force_select: Option<bool>,
    pub disabled: Option<bool>,
}

impl SettingsOverrides {
    /// Writes every present key into the settings.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(min_char_limit) = self.min_char_limit {
            settings.min_char_limit = min_char_limit;
        }
        if let Some(max_results) = self.max_results {
            settings.max_results = max_results;
        }
        if let Some(delay_ms) = self.delay_ms {
            settings.delay_ms = delay_ms;
        }
        if let Some(type_ahead) = self.type_ahead {
            settings.type_ahead = type_ahead;
        }
        if let Some(force_select) = self.force_select {
            settings.force_select = force_select;
        }
        if let Some(disabled) = self.disabled {
            settings.disabled = disabled;
        }
    }

    /// Merges another set of overrides into this one, with the other taking precedence.
    pub fn merge(&mut self, other: &SettingsOverrides) {
        if other.min_char_limit.is_some() {
            self.min_char_limit = other.min_char_limit;
        }
        if other.max_results.is_some() {
            self.max_results = other.max_results;
        }
        if other.delay_ms.is_some() {
            self.delay_ms = other.delay_ms;
        }
        if other.type_ahead.is_some() {
            self.type_ahead = other.type_ahead;
        }
        if other.force_select.is_some() {
            self.force_select = other.force_select;
        }
        if other.disabled.is_some() {
            self.disabled = other.disabled;
        }
    }
}

/// The effective configuration of one field.
#[derive(Clone)]
pub struct AutocompleteOptions {
    /// Thresholds and switches.
    pub settings: Settings,
    /// Candidate source, if any.
    pub source: Option<Source>,
    /// Candidate formatter.
    pub formatter: ResultFormatter,
}

impl Default for AutocompleteOptions {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            source: None,
            formatter: default_formatter(),
        }
    }
}

impl fmt::Debug for AutocompleteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutocompleteOptions")
            .field("settings", &self.settings)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl AutocompleteOptions {
    /// Resolves overrides on top of the stored options (or the defaults).
    pub fn resolve(stored: Option<&AutocompleteOptions>, overrides: OptionOverrides) -> Self {
        let mut options = stored.cloned().unwrap_or_default();
        overrides.settings.apply_to(&mut options.settings);
        if let Some(source) = overrides.source {
            options.source = Some(source);
        }
        if let Some(formatter) = overrides.formatter {
            options.formatter = formatter;
        }
        options
    }

    /// Formats a candidate with the configured formatter.
    pub fn format(&self, candidate: &Candidate) -> String {
        (self.formatter)(candidate)
    }
}

/// Caller-supplied overrides for a field; absent keys keep their prior value.
#[derive(Clone, Default)]
pub struct OptionOverrides {
    pub settings: SettingsOverrides,
    pub source: Option<Source>,
    pub formatter: Option<ResultFormatter>,
}

impl fmt::Debug for OptionOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionOverrides")
            .field("settings", &self.settings)
            .field("source", &self.source)
            .field("formatter", &self.formatter.as_ref().map(|_| ".."))
            .finish()
    }
}

impl OptionOverrides {
    /// Creates an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates overrides from serializable settings.
    pub fn from_settings(settings: SettingsOverrides) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn min_char_limit(mut self, min_char_limit: usize) -> Self {
        self.settings.min_char_limit = Some(min_char_limit);
        self
    }

    pub fn max_results(mut self, max_results: MaxResults) -> Self {
        self.settings.max_results = Some(max_results);
        self
    }

    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.settings.delay_ms = Some(delay_ms);
        self
    }

    pub fn type_ahead(mut self, type_ahead: bool) -> Self {
        self.settings.type_ahead = Some(type_ahead);
        self
    }

    pub fn force_select(mut self, force_select: bool) -> Self {
        self.settings.force_select = Some(force_select);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.settings.disabled = Some(disabled);
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the candidate formatter.
    pub fn formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Candidate) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }
}
