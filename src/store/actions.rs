//! The catalogue store: observable state plus the async actions that drive it.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::SystemTime;

use scopeguard::ScopeGuard;
use tokio::sync::watch;

use crate::api::{ApiClient, ApiError};
use crate::config::SearchConfig;
use crate::model::{
    Credentials, DescriptionDraft, Gesture, GestureDraft, MeaningDraft, PictureFile, PictureMeta,
};
use crate::store::debounce::Debouncer;
use crate::store::mutation::Mutation;
use crate::store::mvi::Reducer;
use crate::store::reducer::CatalogReducer;
use crate::store::state::{CatalogState, Notification, SearchState, UserSession};

pub const LOAD_FAILED: &str = "Could not load gestures";
pub const LOGIN_FAILED: &str = "Login failed: check your username and password";

/// Single source of truth for the UI.
///
/// Cheap to clone; clones share state. Readers take snapshots with
/// [`Store::state`] or follow changes through [`Store::subscribe`]. The only
/// writer path is [`Store::commit`], which the actions below call after each
/// API round-trip.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    api: ApiClient,
    state: watch::Sender<CatalogState>,
    search_debounce: Debouncer,
    /// Bumped for every listing request; only the newest may write its page.
    list_generation: AtomicU64,
}

impl Store {
    pub fn new(api: ApiClient, search: &SearchConfig) -> Self {
        let (state, _) = watch::channel(CatalogState::default());
        Self {
            inner: Arc::new(StoreInner {
                api,
                state,
                search_debounce: Debouncer::new(search.debounce()),
                list_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    // -- State access ----------------------------------------------------------

    /// Apply a mutation through the reducer and notify subscribers.
    pub fn commit(&self, mutation: Mutation) {
        self.inner.state.send_modify(|state| {
            *state = CatalogReducer::reduce(std::mem::take(state), mutation);
        });
    }

    pub fn state(&self) -> CatalogState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.inner.state.subscribe()
    }

    pub fn gestures(&self) -> Vec<Gesture> {
        self.inner.state.borrow().gestures.clone()
    }

    pub fn selected_gesture(&self) -> Option<Gesture> {
        self.inner.state.borrow().selected_gesture().cloned()
    }

    pub fn search(&self) -> SearchState {
        self.inner.state.borrow().search.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.inner.state.borrow().notification.clone()
    }

    pub fn session(&self) -> UserSession {
        self.inner.state.borrow().session.clone()
    }

    pub fn editor_mode(&self) -> bool {
        self.inner.state.borrow().editor_mode
    }

    // -- UI-only actions -------------------------------------------------------

    pub fn select_gesture(&self, id: Option<String>) {
        self.commit(Mutation::SelectGesture(id));
    }

    pub fn toggle_editor_mode(&self) {
        self.commit(Mutation::ToggleEditorMode);
    }

    pub fn dismiss_notification(&self) {
        self.commit(Mutation::DismissNotification);
    }

    // -- Listing ---------------------------------------------------------------

    /// Fetch the current page with the current search text.
    ///
    /// A response that arrives after a newer listing request was issued is
    /// dropped, so the page on screen always matches the latest request.
    pub async fn load_gestures(&self) -> bool {
        let generation = self.inner.list_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let search = self.search();

        let _loading = self.start_loading();
        let result = self
            .inner
            .api
            .list_gestures(search.page, &search.text)
            .await;
        let current = self.inner.list_generation.load(Ordering::SeqCst) == generation;

        match result {
            Ok(page) if current => {
                tracing::debug!(
                    page = search.page,
                    count = page.gestures.len(),
                    total_pages = page.total_pages,
                    "Loaded gestures"
                );
                self.commit(Mutation::SetGestures {
                    gestures: page.gestures,
                    total_pages: page.total_pages,
                });
                true
            }
            Ok(_) => {
                tracing::debug!(generation, "Discarding stale gesture page");
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, page = search.page, "Failed to load gestures");
                if current {
                    self.commit(Mutation::Notify(Notification::failure(LOAD_FAILED)));
                }
                false
            }
        }
    }

    /// Jump to `page` and reload immediately.
    pub async fn set_page(&self, page: u32) -> bool {
        self.commit(Mutation::SetPage(page));
        self.load_gestures().await
    }

    /// Update the search text; the listing reloads from page 1 once the
    /// text has been stable for the configured delay.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_search(&self, text: impl Into<String>) {
        self.commit(Mutation::SetSearch(text.into()));

        let store: Weak<StoreInner> = Arc::downgrade(&self.inner);
        self.inner.search_debounce.schedule(async move {
            let Some(inner) = store.upgrade() else {
                return;
            };
            let store = Store { inner };
            store.commit(Mutation::SetPage(1));
            store.load_gestures().await;
        });
    }

    // -- Gestures --------------------------------------------------------------

    /// Returns the id of the created gesture.
    pub async fn add_gesture(&self, draft: &GestureDraft) -> Option<String> {
        self.run(
            "add_gesture",
            self.inner.api.add_gesture(draft),
            "Gesture created",
            "Failed to create gesture",
        )
        .await
    }

    pub async fn update_gesture(&self, id: &str, draft: &GestureDraft) -> bool {
        self.run(
            "update_gesture",
            self.inner.api.update_gesture(id, draft),
            "Gesture updated",
            "Failed to update gesture",
        )
        .await
        .is_some()
    }

    pub async fn delete_gesture(&self, id: &str) -> bool {
        self.run(
            "delete_gesture",
            self.inner.api.delete_gesture(id),
            "Gesture deleted",
            "Failed to delete gesture",
        )
        .await
        .is_some()
    }

    // -- Descriptions ----------------------------------------------------------

    pub async fn add_description(&self, gesture_id: &str, draft: &DescriptionDraft) -> bool {
        self.run(
            "add_description",
            self.inner.api.add_description(gesture_id, draft),
            "Description added",
            "Failed to add description",
        )
        .await
        .is_some()
    }

    pub async fn update_description(&self, id: &str, draft: &DescriptionDraft) -> bool {
        self.run(
            "update_description",
            self.inner.api.update_description(id, draft),
            "Description updated",
            "Failed to update description",
        )
        .await
        .is_some()
    }

    pub async fn delete_description(&self, id: &str) -> bool {
        self.run(
            "delete_description",
            self.inner.api.delete_description(id),
            "Description deleted",
            "Failed to delete description",
        )
        .await
        .is_some()
    }

    // -- Meanings --------------------------------------------------------------

    pub async fn add_gesture_meaning(&self, gesture_id: &str, draft: &MeaningDraft) -> bool {
        self.run(
            "add_gesture_meaning",
            self.inner.api.add_gesture_meaning(gesture_id, draft),
            "Meaning added",
            "Failed to add meaning",
        )
        .await
        .is_some()
    }

    pub async fn add_description_meaning(
        &self,
        description_id: &str,
        draft: &MeaningDraft,
    ) -> bool {
        self.run(
            "add_description_meaning",
            self.inner.api.add_description_meaning(description_id, draft),
            "Meaning added",
            "Failed to add meaning",
        )
        .await
        .is_some()
    }

    pub async fn update_meaning(&self, id: &str, draft: &MeaningDraft) -> bool {
        self.run(
            "update_meaning",
            self.inner.api.update_meaning(id, draft),
            "Meaning updated",
            "Failed to update meaning",
        )
        .await
        .is_some()
    }

    pub async fn delete_meaning(&self, id: &str) -> bool {
        self.run(
            "delete_meaning",
            self.inner.api.delete_meaning(id),
            "Meaning deleted",
            "Failed to delete meaning",
        )
        .await
        .is_some()
    }

    // -- Pictures --------------------------------------------------------------

    pub async fn add_picture(&self, gesture_id: &str, langs: &[String], file: PictureFile) -> bool {
        self.run(
            "add_picture",
            self.inner.api.add_picture(gesture_id, langs, file),
            "Picture added",
            "Failed to add picture",
        )
        .await
        .is_some()
    }

    pub async fn update_picture_meta(&self, id: &str, meta: &PictureMeta) -> bool {
        self.run(
            "update_picture_meta",
            self.inner.api.update_picture_meta(id, meta),
            "Picture updated",
            "Failed to update picture",
        )
        .await
        .is_some()
    }

    pub async fn update_picture_file(&self, id: &str, file: PictureFile) -> bool {
        self.run(
            "update_picture_file",
            self.inner.api.update_picture_file(id, file),
            "Picture replaced",
            "Failed to replace picture",
        )
        .await
        .is_some()
    }

    pub async fn delete_picture(&self, id: &str) -> bool {
        self.run(
            "delete_picture",
            self.inner.api.delete_picture(id),
            "Picture deleted",
            "Failed to delete picture",
        )
        .await
        .is_some()
    }

    // -- Session ---------------------------------------------------------------

    pub async fn login(&self, credentials: &Credentials) -> bool {
        self.commit(Mutation::StartAuthenticating);
        let _loading = self.start_loading();

        // Dropped mid-request: leave the authenticating state as well.
        let authenticating =
            scopeguard::guard(self, |store| store.commit(Mutation::AuthenticationFailed));
        let result = self.inner.api.login(credentials).await;
        ScopeGuard::into_inner(authenticating);

        match result {
            Ok(payload) => {
                self.commit(Mutation::Authenticated(payload));
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, username = %credentials.username, "Login failed");
                self.commit(Mutation::AuthenticationFailed);
                self.commit(Mutation::Notify(Notification::failure(LOGIN_FAILED)));
                false
            }
        }
    }

    pub fn logout(&self) {
        self.inner.api.logout();
        self.commit(Mutation::LoggedOut);
    }

    /// Adopt a token already present in the session store.
    ///
    /// Expired or unreadable tokens are cleared instead.
    pub fn restore_session(&self) -> bool {
        match self.inner.api.current_session() {
            None => false,
            Some(Ok(payload)) if !payload.is_expired(SystemTime::now()) => {
                self.commit(Mutation::Authenticated(payload));
                true
            }
            Some(Ok(_)) => {
                tracing::info!("Stored session token has expired");
                self.logout();
                false
            }
            Some(Err(err)) => {
                tracing::warn!(error = %err, "Discarding unreadable session token");
                self.logout();
                false
            }
        }
    }

    // -- Plumbing --------------------------------------------------------------

    /// Shared sequencing for every write action:
    /// loading on, call, then success notice and reload or failure notice,
    /// loading off when the guard drops. Errors end here; callers only see
    /// whether it worked.
    async fn run<T, F>(
        &self,
        action: &'static str,
        call: F,
        success: &'static str,
        failure: &'static str,
    ) -> Option<T>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let _loading = self.start_loading();

        match call.await {
            Ok(value) => {
                tracing::info!(action, "Action succeeded");
                self.commit(Mutation::Notify(Notification::success(success)));
                self.load_gestures().await;
                Some(value)
            }
            Err(err) => {
                tracing::warn!(action, error = %err, "Action failed");
                self.commit(Mutation::Notify(Notification::failure(failure)));
                None
            }
        }
    }

    /// Commit `StartLoading` and return a guard that commits the matching
    /// `StopLoading` when dropped, even if the action future itself is
    /// dropped before it settles.
    fn start_loading(&self) -> ScopeGuard<&Self, fn(&Self)> {
        self.commit(Mutation::StartLoading);
        let stop: fn(&Self) = |store| store.commit(Mutation::StopLoading);
        scopeguard::guard(self, stop)
    }
}
