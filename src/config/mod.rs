//! Centralized configuration for the GAT CLI
//!
//! This module provides a single source of truth for all configuration values
//! used throughout the application.
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override defaults:
//! - `GAT_API_URL`: Override the default service API URL
//! - `GAT_API_KEY`: Provide the API key when no `--key` flag is given

/// Default service API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://app.globalapptesting.com/api";

/// API version segment appended to the base URL
pub const API_VERSION: &str = "v1";

/// Environment variable name for overriding the API URL
pub const API_URL_ENV_VAR: &str = "GAT_API_URL";

/// Environment variable name for the API key
pub const API_KEY_ENV_VAR: &str = "GAT_API_KEY";

/// Default API timeout in seconds
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Default interval between batch state polls, in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Upper bound on batch state polls for a single `--wait` invocation
pub const MAX_POLL_ATTEMPTS: u32 = 120;

/// Get the API base URL from environment or default
pub fn api_base_url() -> String {
    std::env::var(API_URL_ENV_VAR).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}
