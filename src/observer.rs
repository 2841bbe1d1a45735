//! Observation hooks for the merge pipeline
//!
//! The fetcher and the orchestrator report what they do through a
//! [`MergeObserver`] handed to them at construction time. The default
//! [`TracingObserver`] turns every event into a structured `tracing` record.

use serde::{Deserialize, Serialize};

/// Event emitted by the merge pipeline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MergeEvent {
    /// One source reference reached its final outcome
    FetchCompleted {
        /// Position of the reference in the request
        index: usize,
        /// The reference as supplied by the caller
        url: String,
        /// Final outcome of the reference
        outcome: FetchSummary,
    },

    /// The direct attempt was rejected with HTTP 400 and a re-encoded
    /// attempt is about to be made
    RetryTriggered {
        /// URL of the rejected attempt
        url: String,
        /// URL with manually re-encoded query parameters
        retry_url: String,
    },

    /// The merge primitive produced the combined document
    MergeCompleted {
        /// Number of documents merged
        documents: usize,
        /// Size of the combined document in bytes
        bytes: usize,
    },

    /// The request ended without a combined document
    MergeFailed {
        /// Error message
        error: String,
    },
}

/// Serializable summary of a fetch outcome
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchSummary {
    /// Document accepted
    Success {
        /// Body size in bytes
        bytes: usize,
    },
    /// Content did not qualify
    Skipped {
        /// Why the content was skipped
        reason: String,
    },
    /// Hard failure
    Failed {
        /// Error message
        error: String,
    },
}

impl From<&crate::types::FetchOutcome> for FetchSummary {
    fn from(outcome: &crate::types::FetchOutcome) -> Self {
        use crate::types::FetchOutcome;
        match outcome {
            FetchOutcome::Success(bytes) => FetchSummary::Success { bytes: bytes.len() },
            FetchOutcome::Skipped { reason, .. } => FetchSummary::Skipped {
                reason: reason.clone(),
            },
            FetchOutcome::Failed(e) => FetchSummary::Failed {
                error: e.to_string(),
            },
        }
    }
}

/// Receiver of pipeline events
///
/// Implementations must be cheap and must not block: events are delivered
/// inline from fetch tasks.
pub trait MergeObserver: Send + Sync {
    /// Called once per event
    fn on_event(&self, event: &MergeEvent);
}

/// Observer that logs every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MergeObserver for TracingObserver {
    fn on_event(&self, event: &MergeEvent) {
        match event {
            MergeEvent::FetchCompleted {
                index,
                url,
                outcome,
            } => match outcome {
                FetchSummary::Success { bytes } => {
                    tracing::debug!(index, url = %url, bytes, "Document fetched");
                }
                FetchSummary::Skipped { reason } => {
                    tracing::info!(index, url = %url, reason = %reason, "Skipping non-matching content");
                }
                FetchSummary::Failed { error } => {
                    tracing::warn!(index, url = %url, error = %error, "Document fetch failed");
                }
            },
            MergeEvent::RetryTriggered { url, retry_url } => {
                tracing::info!(
                    url = %url,
                    retry_url = %retry_url,
                    "Request rejected with HTTP 400, retrying with manually encoded query"
                );
            }
            MergeEvent::MergeCompleted { documents, bytes } => {
                tracing::info!(documents, bytes, "Documents merged");
            }
            MergeEvent::MergeFailed { error } => {
                tracing::error!(error = %error, "Merge failed");
            }
        }
    }
}

/// Observer that records events in memory, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingObserver {
    events: std::sync::Mutex<Vec<MergeEvent>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub(crate) fn events(&self) -> Vec<MergeEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl MergeObserver for RecordingObserver {
    fn on_event(&self, event: &MergeEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
