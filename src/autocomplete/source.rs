//! Candidate sources.
//!
//! A source is either an in-memory list, a remote JSON endpoint, or a custom
//! filter. Dispatch is by variant.

use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::candidate::Candidate;
use super::filter::CandidateFilter;
use crate::error::{Result, SmartCompleteError};

/// Default timeout for remote requests.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Name of the query parameter sent to remote endpoints.
pub const TERM_PARAM: &str = "term";

/// Where candidates come from.
#[derive(Clone)]
pub enum Source {
    /// An in-memory list, filtered synchronously by the default filter.
    StaticList(Arc<Vec<Candidate>>),
    /// A remote JSON endpoint queried with `?term=<query>`.
    RemoteEndpoint(RemoteSource),
    /// Caller logic that replaces the default filter entirely.
    Custom(Arc<dyn CandidateFilter>),
}

impl Source {
    /// Creates a static source from anything convertible into candidates.
    pub fn list<I, C>(items: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Candidate>,
    {
        Self::StaticList(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Creates a remote source for the given endpoint.
    pub fn remote(url: &str) -> Result<Self> {
        Ok(Self::RemoteEndpoint(RemoteSource::new(url)?))
    }

    /// Creates a custom source from a filter implementation.
    pub fn custom(filter: impl CandidateFilter + 'static) -> Self {
        Self::Custom(Arc::new(filter))
    }

    /// Loads a static source from a newline-separated file.
    ///
    /// Blank lines are skipped; surrounding whitespace is trimmed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SmartCompleteError::source(format!("Failed to read {}: {e}", path.display()))
        })?;
        Ok(Self::list(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(Candidate::new),
        ))
    }

    /// Returns a short label for logging and display.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StaticList(_) => "static",
            Self::RemoteEndpoint(_) => "remote",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticList(list) => f.debug_tuple("StaticList").field(&list.len()).finish(),
            Self::RemoteEndpoint(remote) => {
                f.debug_tuple("RemoteEndpoint").field(&remote.url.as_str()).finish()
            }
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A remote endpoint returning a JSON array of candidates.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    url: Url,
    client: Client,
}

impl RemoteSource {
    /// Creates a remote source with the default timeout.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a remote source with a custom request timeout.
    pub fn with_timeout(url: &str, timeout_secs: u64) -> Result<Self> {
        let url = parse_endpoint(url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SmartCompleteError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { url, client })
    }

    /// Returns the configured endpoint.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the request URL for a query, preserving existing parameters.
    pub fn request_url(&self, term: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair(TERM_PARAM, term);
        url
    }

    /// Parses a response body into candidates.
    pub fn parse_response(body: &str) -> Result<Vec<Candidate>> {
        serde_json::from_str(body).map_err(|e| {
            SmartCompleteError::source(format!("Expected a JSON array of candidates: {e}"))
        })
    }
}

#[async_trait]
impl CandidateFilter for RemoteSource {
    async fn filter(&self, query: &str) -> Result<Vec<Candidate>> {
        let url = self.request_url(query);
        debug!("Fetching candidates from {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SmartCompleteError::request("Request timed out")
            } else if e.is_connect() {
                SmartCompleteError::request(format!("Failed to connect to {}", self.url))
            } else {
                SmartCompleteError::request(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SmartCompleteError::request(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(SmartCompleteError::request(format!(
                "Endpoint returned {status}"
            )));
        }

        Self::parse_response(&body)
    }
}

/// Parses and checks a remote endpoint URL.
pub fn parse_endpoint(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| SmartCompleteError::config(format!("Invalid endpoint URL '{url}': {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(SmartCompleteError::config(format!(
            "Invalid scheme '{}'. Expected 'http' or 'https'",
            parsed.scheme()
        )));
    }

    Ok(parsed)
}
