//! Concurrent fan-out over source references and ordered reassembly
//!
//! Every reference of a request is fetched on its own task. All tasks are
//! awaited before any decision is made, then the outcomes are read back in
//! input order: the first hard failure aborts the batch, skipped references
//! are dropped, and the surviving documents are handed to the merger in the
//! order the caller listed them, regardless of completion order.


use crate::error::{Error, Result};
use crate::fetcher::DocumentFetcher;
use crate::merger::DocumentMerger;
use crate::observer::{FetchSummary, MergeEvent, MergeObserver};
use crate::types::FetchOutcome;
use std::sync::Arc;

/// Drives one merge request from references to a combined document
#[derive(Clone)]
pub struct MergeOrchestrator {
    fetcher: Arc<dyn DocumentFetcher>,
    merger: Arc<dyn DocumentMerger>,
    observer: Arc<dyn MergeObserver>,
}

impl MergeOrchestrator {
    /// Create an orchestrator from its collaborators
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        merger: Arc<dyn DocumentMerger>,
        observer: Arc<dyn MergeObserver>,
    ) -> Self {
        Self {
            fetcher,
            merger,
            observer,
        }
    }

    /// Fetch every reference concurrently and merge the valid documents in input order
    ///
    /// # Errors
    ///
    /// - [`Error::NoReferences`] for an empty reference list (nothing is fetched)
    /// - [`Error::Fetch`] when any reference failed hard; the reported failure is
    ///   the one with the lowest input index
    /// - [`Error::NoValidDocuments`] when every reference was skipped
    /// - [`Error::MergeEngine`] when the merge primitive fails
    pub async fn merge_all(&self, references: &[String]) -> Result<Vec<u8>> {
        if references.is_empty() {
            return Err(Error::NoReferences);
        }

        tracing::info!(references = references.len(), "Starting merge request");

        let outcomes = self.fetch_all(references).await;
        let documents = match collect_documents(outcomes) {
            Ok(documents) => documents,
            Err(e) => {
                self.observer.on_event(&MergeEvent::MergeFailed {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        let document_count = documents.len();
        let merger = Arc::clone(&self.merger);
        tracing::debug!(
            documents = document_count,
            merger = merger.name(),
            "Merging documents"
        );

        let merged = tokio::task::spawn_blocking(move || merger.merge(documents))
            .await
            .map_err(|e| Error::MergeEngine(format!("merge task aborted: {}", e)))
            .and_then(|result| result);

        match &merged {
            Ok(bytes) => self.observer.on_event(&MergeEvent::MergeCompleted {
                documents: document_count,
                bytes: bytes.len(),
            }),
            Err(e) => self.observer.on_event(&MergeEvent::MergeFailed {
                error: e.to_string(),
            }),
        }

        merged
    }

    /// One task per reference; the result vector is indexed like `references`
    async fn fetch_all(&self, references: &[String]) -> Vec<FetchOutcome> {
        let handles: Vec<_> = references
            .iter()
            .enumerate()
            .map(|(index, reference)| {
                let fetcher = Arc::clone(&self.fetcher);
                let observer = Arc::clone(&self.observer);
                let reference = reference.clone();
                tokio::spawn(async move {
                    let outcome = fetcher.fetch(&reference).await;
                    observer.on_event(&MergeEvent::FetchCompleted {
                        index,
                        url: reference,
                        outcome: FetchSummary::from(&outcome),
                    });
                    outcome
                })
            })
            .collect();

        futures::future::join_all(handles)
            .await
            .into_iter()
            .enumerate()
            .map(|(index, joined)| {
                joined.unwrap_or_else(|e| {
                    tracing::error!(index, error = %e, "Fetch task panicked");
                    FetchOutcome::Failed(crate::error::FetchError::Transport {
                        url: references[index].clone(),
                        reason: format!("fetch task aborted: {}", e),
                    })
                })
            })
            .collect()
    }
}

/// Apply the batch rules to outcomes given in input order
///
/// The lowest-index failure wins; skipped outcomes are dropped; an empty
/// remainder is [`Error::NoValidDocuments`].
pub(crate) fn collect_documents(outcomes: Vec<FetchOutcome>) -> Result<Vec<Vec<u8>>> {
    let mut documents = Vec::with_capacity(outcomes.len());

    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            FetchOutcome::Success(body) => documents.push(body),
            FetchOutcome::Skipped { .. } => {}
            FetchOutcome::Failed(source) => return Err(Error::Fetch { index, source }),
        }
    }

    if documents.is_empty() {
        return Err(Error::NoValidDocuments);
    }
    Ok(documents)
}
