//! Reducer for the catalogue state.

use crate::store::mutation::Mutation;
use crate::store::mvi::Reducer;
use crate::store::state::CatalogState;

/// Pure function: all I/O (API calls, timers) happens in the store's
/// actions around the commit.
pub struct CatalogReducer;

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Intent = Mutation;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            Mutation::StartLoading => {
                state.pending += 1;
            }
            Mutation::StopLoading => {
                state.pending = state.pending.saturating_sub(1);
            }
            Mutation::SetGestures {
                gestures,
                total_pages,
            } => {
                state.gestures = gestures;
                state.search.total_pages = total_pages.max(1);
            }
            Mutation::SetPage(page) => {
                state.search.page = page.max(1);
            }
            Mutation::SetSearch(text) => {
                state.search.text = text;
            }
            Mutation::SelectGesture(id) => {
                state.selected_gesture_id = id;
            }
            Mutation::ToggleEditorMode => {
                state.editor_mode = !state.editor_mode;
            }
            Mutation::Notify(notification) => {
                state.notification = Some(notification);
            }
            Mutation::DismissNotification => {
                state.notification = None;
            }
            Mutation::StartAuthenticating => {
                state.session.authenticating = true;
            }
            Mutation::Authenticated(payload) => {
                state.session.authenticating = false;
                state.session.payload = Some(payload);
            }
            Mutation::AuthenticationFailed => {
                state.session.authenticating = false;
            }
            Mutation::LoggedOut => {
                state.session.authenticating = false;
                state.session.payload = None;
            }
        }
        state
    }
}
