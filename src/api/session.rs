//! Per-session token storage.
//!
//! Holds the token returned by `login` for the lifetime of the process and
//! never persists it. Every outgoing request reads the slot when it is built,
//! so a login or logout affects the very next request.

use std::sync::Arc;

use parking_lot::RwLock;

/// Wrapper for the bearer token that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` when the raw value must go on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken(••••••••)")
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Shared slot for the current token.
///
/// Clones share the same slot; many readers (requests) may read while a
/// login or logout replaces the value.
#[derive(Clone, Default)]
pub struct SessionStore {
    token: Arc<RwLock<Option<SessionToken>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.token.read().clone()
    }

    pub fn set(&self, token: SessionToken) {
        *self.token.write() = Some(token);
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }
}
