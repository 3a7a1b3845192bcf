//! Error taxonomy for the GAT API client

use thiserror::Error;

/// Errors produced by the API client.
///
/// Every kind propagates unchanged to the command layer; the client never
/// retries and never swallows an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No API key was supplied via `--key` or `GAT_API_KEY`
    #[error("no API key provided; pass --key or set GAT_API_KEY")]
    MissingCredential,

    /// The service rejected the supplied credential (HTTP 401/403)
    #[error("authentication failed: {message}")]
    Authentication {
        /// Service-provided error text
        message: String,
    },

    /// The network could not be reached or the TLS handshake failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// No response arrived within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// A referenced identifier is unknown to the service (HTTP 404 or a
    /// client-side lookup miss)
    #[error("not found: {message}")]
    NotFound {
        /// Service-provided error text or lookup description
        message: String,
    },

    /// Any other non-2xx HTTP outcome
    #[error("request failed with status {status}: {message}")]
    RequestFailed {
        /// HTTP status code as returned by the service
        status: u16,
        /// Error text extracted from the response body
        message: String,
    },

    /// A 2xx response body did not match the declared result shape
    #[error("failed to decode response body: {message}")]
    Decode {
        /// Underlying serde error text
        message: String,
    },
}
