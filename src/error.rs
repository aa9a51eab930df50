//! Error types for smart-complete.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

/// Main error type for autocomplete operations.
#[derive(Error, Debug)]
pub enum SmartCompleteError {
    /// Configuration errors (invalid config file, unknown profile, bad option values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Candidate source errors (unreadable source file, malformed response body, etc.)
    #[error("Source error: {0}")]
    Source(String),

    /// Remote endpoint errors (connection refused, timeouts, non-success status, etc.)
    #[error("Request error: {0}")]
    Request(String),

    /// Internal errors (terminal setup failures, unexpected states, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SmartCompleteError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a source error with the given message.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Creates a request error with the given message.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Source(_) => "Source Error",
            Self::Request(_) => "Request Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using SmartCompleteError.
pub type Result<T> = std::result::Result<T, SmartCompleteError>;
