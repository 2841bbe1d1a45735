//! Download and validation of a single document
//!
//! A source reference is fetched at most twice:
//! 1. directly, using the normalized URL
//! 2. only if the first attempt was answered with HTTP 400, once more with the
//!    query string re-encoded by [`manual_encode_query_params`]
//!
//! Content that is not the expected kind of document (wrong media type, wrong
//! magic signature) is reported as [`FetchOutcome::Skipped`] on either
//! attempt. Everything else that goes wrong is [`FetchOutcome::Failed`].

mod encoding;


pub use encoding::{manual_encode_query_params, normalize_url};

use crate::config::FetchConfig;
use crate::error::{ContentMismatch, Error, FetchError, Result};
use crate::observer::{MergeEvent, MergeObserver};
use crate::types::FetchOutcome;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use url::Url;

/// Retrieves one document for one source reference
///
/// The orchestrator only depends on this trait, so fetch strategies can be
/// swapped (or faked in tests) without touching the fan-out logic.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Resolve `reference` to its final outcome. Never panics on bad input;
    /// every problem is expressed as an outcome.
    async fn fetch(&self, reference: &str) -> FetchOutcome;
}

/// HTTP implementation of [`DocumentFetcher`]
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
    observer: Arc<dyn MergeObserver>,
}

impl HttpFetcher {
    /// Build a fetcher with its own HTTP client
    pub fn new(config: FetchConfig, observer: Arc<dyn MergeObserver>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            client,
            config,
            observer,
        })
    }

    /// Fetch and validate the document behind `reference`
    pub async fn fetch_document(&self, reference: &str) -> FetchOutcome {
        let url = match normalize_url(reference) {
            Ok(url) => url,
            Err(e) => return FetchOutcome::Failed(e),
        };

        match self.download(&url).await {
            Ok(body) => FetchOutcome::Success(body),
            Err(e) if e.is_bad_request() => self.retry_with_manual_encoding(&url).await,
            Err(e) => Self::classify(e),
        }
    }

    /// Second and last attempt, after the server rejected the direct URL
    async fn retry_with_manual_encoding(&self, url: &Url) -> FetchOutcome {
        let manual = manual_encode_query_params(url);
        self.observer.on_event(&MergeEvent::RetryTriggered {
            url: url.to_string(),
            retry_url: manual.to_string(),
        });

        match self.download(&manual).await {
            Ok(body) => FetchOutcome::Success(body),
            Err(e) if e.is_non_matching_content() => Self::classify(e),
            Err(e) => FetchOutcome::Failed(FetchError::RetryExhausted {
                original: url.to_string(),
                manual: manual.to_string(),
                source: Box::new(e),
            }),
        }
    }

    fn classify(error: FetchError) -> FetchOutcome {
        if error.is_non_matching_content() {
            FetchOutcome::Skipped {
                url: error.url().to_string(),
                reason: error.to_string(),
            }
        } else {
            FetchOutcome::Failed(error)
        }
    }

    /// One GET with full validation
    async fn download(&self, url: &Url) -> std::result::Result<Vec<u8>, FetchError> {
        tracing::debug!(url = %url, "Downloading document");

        let mut response =
            self.client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| FetchError::Transport {
                    url: url.to_string(),
                    reason: describe_transport_error(&e),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !media_type_matches(&content_type, &self.config.expected_content_type) {
            return Err(FetchError::NonMatchingContent {
                url: url.to_string(),
                mismatch: ContentMismatch::ContentType(content_type),
            });
        }

        let declared_length = response.content_length();

        // Signature first: a read error this early counts as a short read.
        let signature = self.config.magic_signature.as_bytes();
        let mut body = Vec::new();
        while body.len() < signature.len() {
            match response.chunk().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) | Err(_) => break,
            }
        }
        if !body.starts_with(signature) {
            return Err(FetchError::NonMatchingContent {
                url: url.to_string(),
                mismatch: ContentMismatch::Signature,
            });
        }
        // A declared length over the cap fails before the rest is downloaded.
        self.check_size(url, declared_length.unwrap_or_default().max(body.len() as u64))?;

        while let Some(chunk) = response.chunk().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            reason: format!("error reading document body: {}", e),
        })? {
            body.extend_from_slice(&chunk);
            self.check_size(url, body.len() as u64)?;
        }

        Ok(body)
    }

    fn check_size(&self, url: &Url, len: u64) -> std::result::Result<(), FetchError> {
        match self.config.max_document_bytes {
            Some(limit) if len > limit => Err(FetchError::TooLarge {
                url: url.to_string(),
                limit,
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, reference: &str) -> FetchOutcome {
        self.fetch_document(reference).await
    }
}

/// Compare the media type of a `Content-Type` header, ignoring parameters and case
fn media_type_matches(header: &str, expected: &str) -> bool {
    header
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|media_type| media_type.eq_ignore_ascii_case(expected.trim()))
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}
