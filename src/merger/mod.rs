//! Merge primitive: combine validated documents into one
//!
//! The orchestrator treats the merge as a black box behind [`DocumentMerger`].
//! [`PdfMerger`] is the implementation used by the service.

mod pdf;

pub use pdf::PdfMerger;

/// Combines an ordered, non-empty sequence of documents into one
///
/// Implementations are synchronous and may be CPU-heavy; callers run them on
/// the blocking thread pool.
///
/// # Examples
///
/// ```
/// use docmerge::merger::{DocumentMerger, PdfMerger};
///
/// let merger = PdfMerger::new();
/// assert_eq!(merger.name(), "lopdf");
/// assert!(merger.merge(vec![b"not a pdf".to_vec()]).is_err());
/// ```
pub trait DocumentMerger: Send + Sync {
    /// Merge `documents` in the given order
    ///
    /// # Errors
    ///
    /// Returns [`Error::MergeEngine`](crate::Error::MergeEngine) when a
    /// document cannot be parsed or the combined document cannot be written.
    fn merge(&self, documents: Vec<Vec<u8>>) -> crate::Result<Vec<u8>>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
