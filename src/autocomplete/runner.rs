//! Background execution of deferred filter passes.
//!
//! Each field has at most one pass in flight. Submitting a new job for a field
//! cancels the previous one, whether it is still waiting out its debounce or
//! already running. Results that slip through anyway are discarded by the
//! field's generation check.

use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::candidate::Candidate;
use super::controller::FilterJob;

/// Results of a completed deferred pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Field the pass belongs to.
    pub field: String,
    /// Pass number the results answer.
    pub generation: u64,
    pub results: Vec<Candidate>,
}

/// Runs [`FilterJob`]s on tokio tasks and collects their results.
#[derive(Debug)]
pub struct FilterRunner {
    tx: mpsc::UnboundedSender<FilterOutcome>,
    rx: mpsc::UnboundedReceiver<FilterOutcome>,
    /// Cancellation token of the latest pass per field.
    in_flight: HashMap<String, CancellationToken>,
}

impl Default for FilterRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterRunner {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            in_flight: HashMap::new(),
        }
    }

    /// Starts a job, cancelling the previous pass of the same field.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, job: FilterJob) {
        let cancel = CancellationToken::new();
        if let Some(previous) = self.in_flight.insert(job.field.clone(), cancel.clone()) {
            previous.cancel();
        }

        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(field = %job.field, generation = job.generation, "Filter pass cancelled during debounce");
                    return;
                }
                _ = tokio::time::sleep(job.delay) => {}
            }

            let results = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(field = %job.field, generation = job.generation, "Filter pass cancelled");
                    return;
                }
                results = job.run() => results,
            };

            match results {
                Ok(results) => {
                    let _ = tx.send(FilterOutcome {
                        field: job.field,
                        generation: job.generation,
                        results,
                    });
                }
                Err(e) => {
                    debug!(field = %job.field, query = %job.query, "Filter pass failed: {}", e);
                }
            }
        });
    }

    /// Cancels the pending pass of a field, if any.
    pub fn cancel(&mut self, field: &str) {
        if let Some(token) = self.in_flight.remove(field) {
            token.cancel();
        }
    }

    /// Cancels every pending pass.
    pub fn cancel_all(&mut self) {
        for (_, token) in self.in_flight.drain() {
            token.cancel();
        }
    }

    /// Waits for the next completed pass.
    pub async fn recv(&mut self) -> Option<FilterOutcome> {
        self.rx.recv().await
    }

    /// Returns a completed pass without waiting.
    pub fn try_recv(&mut self) -> Option<FilterOutcome> {
        self.rx.try_recv().ok()
    }
}

impl Drop for FilterRunner {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
