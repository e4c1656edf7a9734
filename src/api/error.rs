use thiserror::Error;

use super::token::TokenError;

/// Errors returned by catalogue API calls.
///
/// The action layer treats every variant the same way; the split exists for
/// logs and for callers that use the client directly.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, timeout, TLS failure, ...
    #[error("Request to '{path}' failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Backend answered with a non-2xx status
    #[error("Backend returned {status} for '{path}': {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },

    /// Response body could not be decoded
    #[error("Failed to decode response from '{path}': {message}")]
    Decode { path: String, message: String },

    /// Login returned a token whose claims cannot be read
    #[error("Invalid session token: {0}")]
    Token(#[from] TokenError),

    /// Endpoint path could not be joined onto the base URL
    #[error("Invalid endpoint '{path}': {message}")]
    InvalidUrl { path: String, message: String },
}

impl ApiError {
    /// HTTP status when the backend rejected the request.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
