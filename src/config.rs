//! Configuration types for docmerge

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};
use url::Url;

/// Document fetching and validation settings
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Media type every document response must carry (default: "application/pdf")
    #[serde(default = "default_content_type")]
    pub expected_content_type: String,

    /// Leading bytes every document must start with (default: "%PDF-")
    #[serde(default = "default_magic_signature")]
    pub magic_signature: String,

    /// Whole-request timeout per HTTP call in seconds (default: 60)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upper bound on a single document body in bytes (None = unlimited)
    ///
    /// A document that exceeds the cap fails the whole request.
    #[serde(default)]
    pub max_document_bytes: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            expected_content_type: default_content_type(),
            magic_signature: default_magic_signature(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            max_document_bytes: None,
        }
    }
}

impl FetchConfig {
    /// Whole-request timeout as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Connect timeout as a [`Duration`]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Report endpoint settings
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Base URL of the service that stores merge reports, also used to
    /// resolve the relative document paths a report lists
    #[serde(default)]
    pub base_url: Option<Url>,
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Grace period for in-flight requests on shutdown in seconds (default: 5)
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

/// Main configuration for docmerge
///
/// Fields are organized into sub-configs:
/// - [`fetch`](FetchConfig) - document download and validation
/// - [`report`](ReportConfig) - report metadata service
/// - [`server`](ServerIntegrationConfig) - REST API
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Document fetching and validation
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Report metadata service
    #[serde(default)]
    pub report: ReportConfig,

    /// API and external server integration
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Build a configuration from defaults overlaid with environment variables
    ///
    /// | Variable | Setting |
    /// |---|---|
    /// | `PORT` | port of `server.api.bind_address` |
    /// | `DOCMERGE_BIND_ADDRESS` | full `server.api.bind_address` (wins over `PORT`) |
    /// | `BASE_URL` | `report.base_url` |
    /// | `DOCMERGE_FETCH_TIMEOUT_SECS` | `fetch.request_timeout_secs` |
    /// | `DOCMERGE_MAX_DOCUMENT_BYTES` | `fetch.max_document_bytes` |
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Some(port) = env_var("PORT") {
            let port: u16 = parse_env("PORT", &port)?;
            config.server.api.bind_address.set_port(port);
        }
        if let Some(address) = env_var("DOCMERGE_BIND_ADDRESS") {
            config.server.api.bind_address = parse_env("DOCMERGE_BIND_ADDRESS", &address)?;
        }
        if let Some(base_url) = env_var("BASE_URL") {
            config.report.base_url = Some(parse_env("BASE_URL", &base_url)?);
        }
        if let Some(timeout) = env_var("DOCMERGE_FETCH_TIMEOUT_SECS") {
            config.fetch.request_timeout_secs = parse_env("DOCMERGE_FETCH_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(limit) = env_var("DOCMERGE_MAX_DOCUMENT_BYTES") {
            config.fetch.max_document_bytes =
                Some(parse_env("DOCMERGE_MAX_DOCUMENT_BYTES", &limit)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.fetch.magic_signature.is_empty() {
            return Err(config_error(
                "magic signature must not be empty",
                "magic_signature",
            ));
        }
        if self.fetch.expected_content_type.trim().is_empty() {
            return Err(config_error(
                "expected content type must not be empty",
                "expected_content_type",
            ));
        }
        if self.fetch.request_timeout_secs == 0 {
            return Err(config_error(
                "request timeout must be at least one second",
                "request_timeout_secs",
            ));
        }
        if self.fetch.connect_timeout_secs == 0 {
            return Err(config_error(
                "connect timeout must be at least one second",
                "connect_timeout_secs",
            ));
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>, key: &str) -> Error {
    Error::Config {
        message: message.into(),
        key: Some(key.to_string()),
    }
}

/// Non-empty, trimmed environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| config_error(format!("invalid value '{}' for {}: {}", value, key, e), key))
}

fn default_content_type() -> String {
    "application/pdf".to_string()
}

fn default_magic_signature() -> String {
    "%PDF-".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("docmerge/{}", env!("CARGO_PKG_VERSION"))
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_true() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_shutdown_timeout_secs() -> u64 {
    5
}
