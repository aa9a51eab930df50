//! Candidate filtering.
//!
//! The default filter is a case-insensitive substring match of the escaped
//! query, truncated to the configured maximum in source order. Custom filters
//! implement [`CandidateFilter`].

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::future::Future;

use super::candidate::Candidate;
use crate::error::{Result, SmartCompleteError};

/// Upper bound on the number of results produced by the default filter.
///
/// Config files use `-1` (or any negative number) for unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum MaxResults {
    /// Keep every match.
    #[default]
    Unlimited,
    /// Keep at most this many matches.
    Limit(usize),
}

impl MaxResults {
    /// Truncates the results to the first N entries.
    pub fn apply<T>(self, mut results: Vec<T>) -> Vec<T> {
        if let Self::Limit(max) = self {
            results.truncate(max);
        }
        results
    }

    /// Returns the limit, if any.
    pub fn limit(self) -> Option<usize> {
        match self {
            Self::Unlimited => None,
            Self::Limit(max) => Some(max),
        }
    }
}

impl From<i64> for MaxResults {
    fn from(value: i64) -> Self {
        usize::try_from(value).map_or(Self::Unlimited, Self::Limit)
    }
}

impl From<MaxResults> for i64 {
    fn from(value: MaxResults) -> Self {
        match value {
            MaxResults::Unlimited => -1,
            MaxResults::Limit(max) => i64::try_from(max).unwrap_or(i64::MAX),
        }
    }
}

/// Builds a case-insensitive matcher for the query.
///
/// Regex metacharacters in the query are escaped, so the query is always
/// matched literally.
pub fn build_matcher(query: &str) -> Result<Regex> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .map_err(|e| SmartCompleteError::internal(format!("Failed to build matcher: {e}")))
}

/// Runs the default filter over an in-memory list.
pub fn filter_candidates(
    query: &str,
    source: &[Candidate],
    max_results: MaxResults,
) -> Result<Vec<Candidate>> {
    let matcher = build_matcher(query)?;
    let matches = source
        .iter()
        .filter(|candidate| matcher.is_match(&candidate.text))
        .take(max_results.limit().unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Ok(matches)
}

/// A caller-supplied filter that replaces the default matching logic.
///
/// Implementations must be thread-safe since deferred passes run on tokio tasks.
#[async_trait]
pub trait CandidateFilter: Send + Sync {
    /// Returns the candidates matching the query (possibly empty).
    async fn filter(&self, query: &str) -> Result<Vec<Candidate>>;
}

/// Adapts an async closure into a [`CandidateFilter`].
pub struct FnFilter<F> {
    func: F,
}

impl<F, Fut> FnFilter<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<Candidate>>> + Send,
{
    /// Wraps the closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> std::fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFilter").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> CandidateFilter for FnFilter<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<Candidate>>> + Send,
{
    async fn filter(&self, query: &str) -> Result<Vec<Candidate>> {
        (self.func)(query.to_string()).await
    }
}
