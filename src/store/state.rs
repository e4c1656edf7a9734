use crate::api::TokenPayload;
use crate::model::Gesture;
use crate::store::mvi::StoreState;

/// Everything the UI renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    /// Current page of the gesture listing, as last fetched.
    pub gestures: Vec<Gesture>,
    pub search: SearchState,
    pub selected_gesture_id: Option<String>,
    /// Whether edit controls are shown. On by default.
    pub editor_mode: bool,
    /// Operations started but not yet settled. Read through `is_loading`.
    pub(crate) pending: u32,
    pub notification: Option<Notification>,
    pub session: UserSession,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            gestures: Vec::new(),
            search: SearchState::default(),
            selected_gesture_id: None,
            editor_mode: true,
            pending: 0,
            notification: None,
            session: UserSession::default(),
        }
    }
}

impl StoreState for CatalogState {}

impl CatalogState {
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    /// The selected gesture, if it is on the current page.
    pub fn selected_gesture(&self) -> Option<&Gesture> {
        let id = self.selected_gesture_id.as_deref()?;
        self.gestures.iter().find(|g| g.id == id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.payload.is_some()
    }
}

/// Listing position and filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    /// 1-based.
    pub page: u32,
    /// Always at least 1.
    pub total_pages: u32,
    pub text: String,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserSession {
    pub authenticating: bool,
    pub payload: Option<TokenPayload>,
}

/// Outcome message of the last settled action. A new one replaces the old.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub success: bool,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}
