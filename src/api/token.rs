//! Decoding of the signed token issued by `POST login`.
//!
//! The client never verifies the signature; the backend does that on every
//! request. Decoding only exposes the claims for display and expiry checks.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub level: Level,
    /// Expiry as seconds since the unix epoch.
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Admin,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token does not have three dot-separated segments")]
    Malformed,

    #[error("Token payload is not valid base64url: {0}")]
    Encoding(String),

    #[error("Token payload is not valid JSON claims: {0}")]
    Claims(String),
}

impl TokenPayload {
    /// Decodes the claims segment of `header.payload.signature`.
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let mut segments = token.trim().split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };

        // Some issuers pad the segments anyway.
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| TokenError::Claims(e.to_string()))
    }

    pub fn is_expired(&self, now: SystemTime) -> bool {
        let now = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        self.exp <= now
    }
}
