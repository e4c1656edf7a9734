//! Client-side state store.
//!
//! [`Store`] owns a [`CatalogState`] and changes it only through
//! [`Mutation`]s run by [`CatalogReducer`]. Its async actions pair each API
//! call with the mutations that reflect loading, results, and notifications.

mod actions;
mod debounce;
mod mutation;
pub mod mvi;
mod reducer;
mod state;

pub use actions::{Store, LOAD_FAILED, LOGIN_FAILED};
pub use debounce::Debouncer;
pub use mutation::Mutation;
pub use reducer::CatalogReducer;
pub use state::{CatalogState, Notification, SearchState, UserSession};
