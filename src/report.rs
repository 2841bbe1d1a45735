//! Client for stored merge reports
//!
//! A report is a merge request kept by an external service. Its document
//! URLs are relative to the same base URL the report is served from.

use crate::error::{Error, Result};
use crate::types::{MergeRequest, ReportEnvelope};
use crate::utils::ensure_leading_slash;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

/// Path of the report lookup endpoint, relative to the base URL
const REPORT_PATH: &str = "/one-api/tools/merge_report/get/";

/// Fetches report metadata and resolves its document URLs
#[derive(Clone, Debug)]
pub struct ReportClient {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl ReportClient {
    /// Create a client; without `base_url` every lookup fails with
    /// [`Error::NotConfigured`]
    pub fn new(base_url: Option<Url>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Whether a base URL is configured
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Look up report `id` and return its merge request with absolute URLs
    pub async fn fetch_report(&self, id: &str) -> Result<MergeRequest> {
        let base = self.base()?;
        let lookup = format!("{}{}{}", base, REPORT_PATH, urlencoding::encode(id));
        tracing::debug!(report_id = %id, url = %lookup, "Fetching report metadata");

        let response = self
            .client
            .get(&lookup)
            .send()
            .await
            .map_err(|e| Error::Report(format!("error fetching report {}: {}", id, e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Report(format!(
                "report service returned HTTP {} for report {}",
                status.as_u16(),
                id
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Report(format!("error reading report {}: {}", id, e)))?;
        let envelope: ReportEnvelope = serde_json::from_slice(&body)
            .map_err(|e| Error::Report(format!("invalid report {}: {}", id, e)))?;

        let urls = envelope
            .data
            .urls
            .iter()
            .map(|path| format!("{}{}", base, ensure_leading_slash(path)))
            .collect::<Vec<_>>();

        tracing::info!(
            report_id = %id,
            status = %envelope.status,
            documents = urls.len(),
            "Report metadata loaded"
        );

        Ok(MergeRequest {
            name: envelope.data.name,
            urls,
        })
    }

    /// Base URL without a trailing slash
    fn base(&self) -> Result<String> {
        self.base_url
            .as_ref()
            .map(|url| url.as_str().trim_end_matches('/').to_string())
            .ok_or_else(|| Error::NotConfigured("BASE_URL is not set".into()))
    }
}
