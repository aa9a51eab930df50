//! Autocomplete for a single-line input field.
//!
//! An [`AutocompleteField`] owns the field text, its resolved options, a
//! per-field [`ResultsContainer`] and an [`EventBus`]. Deferred passes for
//! remote and custom sources run on a [`FilterRunner`].

pub mod candidate;
pub mod container;
pub mod controller;
pub mod events;
pub mod filter;
pub mod input;
pub mod options;
pub mod runner;
pub mod source;

pub use candidate::{candidates, Candidate};
pub use container::{RenderedItem, ResultsContainer, NO_RESULTS_NOTICE, RESULT_ITEM_CLASS};
pub use controller::{AutocompleteField, FilterJob, FilterPass};
pub use events::{AutocompleteEvent, EventBus, EventKind};
pub use filter::{filter_candidates, CandidateFilter, FnFilter, MaxResults};
pub use input::InputField;
pub use options::{AutocompleteOptions, OptionOverrides, Settings, SettingsOverrides};
pub use runner::{FilterOutcome, FilterRunner};
pub use source::{RemoteSource, Source};
