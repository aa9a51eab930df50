//! smart-complete - autocomplete for single-line terminal inputs.
//!
//! This library exposes the core modules for use in integration tests.

pub mod autocomplete;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod tui;
