use crate::api::TokenPayload;
use crate::model::Gesture;
use crate::store::mvi::Intent;
use crate::store::state::Notification;

/// Synchronous state changes. `Store::commit` is the only way to apply one.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// An operation started.
    StartLoading,
    /// An operation settled, successfully or not.
    StopLoading,
    /// A listing page arrived.
    SetGestures {
        gestures: Vec<Gesture>,
        total_pages: u32,
    },
    /// Jump to a page. Zero is treated as the first page.
    SetPage(u32),
    SetSearch(String),
    SelectGesture(Option<String>),
    ToggleEditorMode,
    Notify(Notification),
    DismissNotification,
    StartAuthenticating,
    Authenticated(TokenPayload),
    /// Login failed; any previous payload is kept.
    AuthenticationFailed,
    LoggedOut,
}

impl Intent for Mutation {}
