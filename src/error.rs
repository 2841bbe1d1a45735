//! Error types for docmerge
//!
//! Two layers of errors exist:
//! - [`FetchError`] describes why a single source reference could not be used
//! - [`Error`] is the request-level outcome returned by the orchestrator, the
//!   report client and the HTTP API
//!
//! The module also carries the HTTP status mapping ([`ToHttpStatus`]) and the
//! JSON error body ([`ApiError`]) used by the API layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for docmerge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for docmerge
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "BASE_URL")
        key: Option<String>,
    },

    /// The request carried no source references
    #[error("no URLs supplied")]
    NoReferences,

    /// The inbound request could not be understood
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A source reference failed hard, aborting the whole batch
    #[error("{source}")]
    Fetch {
        /// Position of the failing reference in the request
        index: usize,
        /// Why the reference failed
        #[source]
        source: FetchError,
    },

    /// Every reference was skipped, leaving nothing to merge
    #[error("no valid documents found to merge")]
    NoValidDocuments,

    /// The merge primitive rejected the validated documents
    #[error("merge failed: {0}")]
    MergeEngine(String),

    /// Report metadata could not be fetched or decoded
    #[error("report error: {0}")]
    Report(String),

    /// A feature was used without the configuration it needs
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error outside of document fetching (client construction etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Why a document could not be taken from a source reference
#[derive(Debug, Error)]
pub enum FetchError {
    /// The reference is not a parseable URL
    #[error("invalid URL format {url}: {reason}")]
    InvalidReference {
        /// The reference as supplied by the caller
        url: String,
        /// Parser message
        reason: String,
    },

    /// The server answered, but not with the expected kind of document
    #[error("{mismatch} at {url}")]
    NonMatchingContent {
        /// URL that was fetched
        url: String,
        /// What did not match
        mismatch: ContentMismatch,
    },

    /// The server answered with a non-success status
    #[error("download failed for {url}: HTTP {status}")]
    HttpStatus {
        /// URL that was fetched
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Connection, DNS, TLS, timeout or body read failure
    #[error("error downloading {url}: {reason}")]
    Transport {
        /// URL that was fetched
        url: String,
        /// Underlying cause
        reason: String,
    },

    /// The body exceeded the configured size cap
    #[error("document at {url} exceeds {limit} bytes")]
    TooLarge {
        /// URL that was fetched
        url: String,
        /// Configured cap in bytes
        limit: u64,
    },

    /// Both the direct and the re-encoded attempt failed
    #[error("download failed for both encoded URLs. Original: {original}, Manual: {manual} - Error: {source}")]
    RetryExhausted {
        /// URL of the first attempt
        original: String,
        /// URL of the re-encoded attempt
        manual: String,
        /// Failure of the re-encoded attempt
        #[source]
        source: Box<FetchError>,
    },
}

/// The way fetched content failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentMismatch {
    /// `Content-Type` differs from the expected media type
    ContentType(String),
    /// The body does not start with the expected magic signature
    Signature,
}

impl std::fmt::Display for ContentMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentMismatch::ContentType(content_type) => {
                write!(f, "invalid content-type '{}'", content_type)
            }
            ContentMismatch::Signature => write!(f, "not a valid document"),
        }
    }
}

impl FetchError {
    /// Content that did not qualify. Such references are skipped, not failed.
    pub fn is_non_matching_content(&self) -> bool {
        matches!(self, FetchError::NonMatchingContent { .. })
    }

    /// Whether this failure triggers the re-encoded retry
    pub fn is_bad_request(&self) -> bool {
        matches!(self, FetchError::HttpStatus { status: 400, .. })
    }

    /// URL the failure refers to (the re-encoded one for an exhausted retry)
    pub fn url(&self) -> &str {
        match self {
            FetchError::InvalidReference { url, .. }
            | FetchError::NonMatchingContent { url, .. }
            | FetchError::HttpStatus { url, .. }
            | FetchError::Transport { url, .. }
            | FetchError::TooLarge { url, .. } => url,
            FetchError::RetryExhausted { manual, .. } => manual,
        }
    }
}

/// API error response format
///
/// ```json
/// {
///   "error": {
///     "code": "fetch_failed",
///     "message": "download failed for https://a.example/x.pdf: HTTP 404",
///     "details": { "index": 0, "url": "https://a.example/x.pdf" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "no_valid_documents")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,
            Error::NoReferences => 400,
            Error::InvalidRequest(_) => 400,

            // 422 Unprocessable Entity - nothing usable, or unmergeable input
            Error::NoValidDocuments => 422,
            Error::MergeEngine(_) => 422,

            // 502 Bad Gateway - upstream document or report servers
            Error::Fetch { .. } => 502,
            Error::Report(_) => 502,
            Error::Network(_) => 502,

            // 503 Service Unavailable
            Error::NotConfigured(_) => 503,

            // 500 Internal Server Error
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::NoReferences => "no_references",
            Error::InvalidRequest(_) => "invalid_request",
            Error::Fetch { source, .. } => match source {
                FetchError::InvalidReference { .. } => "invalid_reference",
                _ => "fetch_failed",
            },
            Error::NoValidDocuments => "no_valid_documents",
            Error::MergeEngine(_) => "merge_failed",
            Error::Report(_) => "report_error",
            Error::NotConfigured(_) => "not_configured",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Fetch { index, source } => Some(serde_json::json!({
                "index": index,
                "url": source.url(),
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
