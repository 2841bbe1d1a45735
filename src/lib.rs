//! # docmerge
//!
//! Concurrent document fetch-and-merge service.
//!
//! Given an ordered list of document URLs, docmerge downloads every document
//! concurrently, validates each one (media type and magic signature), drops
//! the ones that are not the expected kind of document, and merges the rest
//! into a single PDF in the order the caller listed them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docmerge::{Config, MergeService};
//! use docmerge::types::MergeRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = MergeService::new(Config::default())?;
//!
//!     let document = service
//!         .merge(MergeRequest {
//!             name: "bundle".into(),
//!             urls: vec![
//!                 "https://files.example.com/cover.pdf".into(),
//!                 "https://files.example.com/body.pdf".into(),
//!             ],
//!         })
//!         .await?;
//!
//!     std::fs::write(&document.filename, &document.bytes)?;
//!     Ok(())
//! }
//! ```

/// REST API server
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Single-document download and validation
pub mod fetcher;
/// Merge primitive
pub mod merger;
/// Pipeline events
pub mod observer;
/// Concurrent fan-out and ordered reassembly
pub mod orchestrator;
/// Stored merge reports
pub mod report;
/// Core types
pub mod types;
/// Filename and header helpers
pub mod utils;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod test_helpers;

pub use config::Config;
pub use error::{Error, FetchError, Result};
pub use fetcher::{DocumentFetcher, HttpFetcher};
pub use merger::{DocumentMerger, PdfMerger};
pub use observer::{MergeEvent, MergeObserver, TracingObserver};
pub use orchestrator::MergeOrchestrator;
pub use report::ReportClient;
pub use types::{FetchOutcome, MergeRequest, MergedDocument};

use std::sync::Arc;

/// Entry point tying the pipeline together
///
/// Owns the orchestrator and the report client and derives output filenames.
/// Cheap to share behind an `Arc`; the API server holds one instance.
#[derive(Clone)]
pub struct MergeService {
    orchestrator: MergeOrchestrator,
    reports: ReportClient,
}

impl MergeService {
    /// Build the service with the HTTP fetcher, the PDF merger and a
    /// tracing observer
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let observer: Arc<dyn MergeObserver> = Arc::new(TracingObserver);
        let fetcher = HttpFetcher::new(config.fetch.clone(), Arc::clone(&observer))?;
        let orchestrator =
            MergeOrchestrator::new(Arc::new(fetcher), Arc::new(PdfMerger::new()), observer);
        let reports = ReportClient::new(
            config.report.base_url.clone(),
            config.fetch.request_timeout(),
        )?;

        Ok(Self::from_parts(orchestrator, reports))
    }

    /// Assemble the service from prebuilt components
    pub fn from_parts(orchestrator: MergeOrchestrator, reports: ReportClient) -> Self {
        Self {
            orchestrator,
            reports,
        }
    }

    /// Whether `GET /report/:id` can be served
    pub fn reports_enabled(&self) -> bool {
        self.reports.is_configured()
    }

    /// Fetch and merge the documents of `request`
    pub async fn merge(&self, request: MergeRequest) -> Result<MergedDocument> {
        let filename = utils::output_filename(&request.name, chrono::Local::now().naive_local());
        let bytes = self.orchestrator.merge_all(&request.urls).await?;

        tracing::info!(
            filename = %filename,
            bytes = bytes.len(),
            "Merge request completed"
        );
        Ok(MergedDocument { filename, bytes })
    }

    /// Look up a stored report and merge its documents
    pub async fn merge_report(&self, id: &str) -> Result<MergedDocument> {
        let request = self.reports.fetch_report(id).await?;
        self.merge(request).await
    }
}
