// ABOUTME: Configuration loading and validation for the optly tool server.
// ABOUTME: Reads OPTLY_* and endpoint environment variables with defaults.

use std::net::SocketAddr;

use thiserror::Error;

use optly_client::{optimizely, reports};
use optly_core::experiment::DEFAULT_ACCOUNT_ID;

pub const DEFAULT_BIND: &str = "127.0.0.1:8321";
pub const DEFAULT_REPORT_PAGE_URL: &str = "https://reports.optly.app";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPTLY_BIND is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("OPTLY_ACCOUNT_ID is not a valid numeric account id: {0}")]
    InvalidAccountId(String),

    #[error("OPTLY_ALLOW_REMOTE is true but OPTLY_AUTH_TOKEN is not set; refusing to start without authentication")]
    RemoteWithoutToken,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    pub bind: SocketAddr,
    pub allow_remote: bool,
    pub auth_token: Option<String>,
    pub account_id: u64,
    pub optimizely_base_url: String,
    pub report_function_url: String,
    pub report_page_url: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.parse().expect("default bind address is valid"),
            allow_remote: false,
            auth_token: None,
            account_id: DEFAULT_ACCOUNT_ID,
            optimizely_base_url: optimizely::DEFAULT_BASE_URL.to_string(),
            report_function_url: reports::DEFAULT_FUNCTION_URL.to_string(),
            report_page_url: DEFAULT_REPORT_PAGE_URL.to_string(),
        }
    }
}

impl ToolsConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - OPTLY_BIND: socket address to bind (default: 127.0.0.1:8321)
    /// - OPTLY_ALLOW_REMOTE: allow non-loopback connections (default: false)
    /// - OPTLY_AUTH_TOKEN: bearer token for inbound tool calls (optional)
    /// - OPTLY_ACCOUNT_ID: account id injected into metrics/update payloads
    /// - OPTIMIZELY_BASE_URL: Optimizely API base (default: https://api.optimizely.com)
    /// - REPORT_FUNCTION_URL: report-generation function endpoint
    /// - REPORT_PAGE_URL: public base URL for generated report pages
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind = match non_empty_env("OPTLY_BIND") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidBind(raw))?,
            None => defaults.bind,
        };

        let allow_remote = std::env::var("OPTLY_ALLOW_REMOTE")
            .map(|v| v == "true" || v == "1" || v == "yes")
            .unwrap_or(false);

        let auth_token = non_empty_env("OPTLY_AUTH_TOKEN");

        let account_id = match non_empty_env("OPTLY_ACCOUNT_ID") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidAccountId(raw))?,
            None => defaults.account_id,
        };

        let optimizely_base_url = non_empty_env("OPTIMIZELY_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.optimizely_base_url);

        let report_function_url =
            non_empty_env("REPORT_FUNCTION_URL").unwrap_or(defaults.report_function_url);

        let report_page_url = non_empty_env("REPORT_PAGE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.report_page_url);

        if allow_remote && auth_token.is_none() {
            return Err(ConfigError::RemoteWithoutToken);
        }

        Ok(Self {
            bind,
            allow_remote,
            auth_token,
            account_id,
            optimizely_base_url,
            report_function_url,
            report_page_url,
        })
    }
}

/// Read an env var and return `Some(value)` only if it is non-empty after
/// trimming.
fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}
