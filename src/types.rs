//! Core types shared by the fetcher, the orchestrator and the API

use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of attempting to retrieve one source reference
///
/// Each reference resolves to exactly one outcome and never changes afterwards.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The document passed validation; holds the complete body
    Success(Vec<u8>),

    /// The content did not qualify (wrong media type or signature).
    /// Not an error: the reference is left out of the merge.
    Skipped {
        /// URL that produced the non-matching content
        url: String,
        /// Human-readable reason, for diagnostics only
        reason: String,
    },

    /// The reference failed hard; the whole batch is aborted
    Failed(FetchError),
}

impl FetchOutcome {
    /// Returns true for [`FetchOutcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }
}

/// Body of `POST /merge`, also the payload of a stored report
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct MergeRequest {
    /// Output filename; derived from the current time when empty
    #[serde(default)]
    pub name: String,

    /// Document URLs, merged in this order
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Envelope the report service wraps a stored [`MergeRequest`] in
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportEnvelope {
    /// Status string reported by the service (not interpreted)
    #[serde(default)]
    pub status: String,

    /// The stored merge request; its URLs are relative to the report base URL
    pub data: MergeRequest,
}

/// A combined document ready to be returned to the caller
#[derive(Clone, Debug)]
pub struct MergedDocument {
    /// Filename presented to the client
    pub filename: String,
    /// Combined document bytes
    pub bytes: Vec<u8>,
}
