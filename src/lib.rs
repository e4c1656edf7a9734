//! Client for a hand-gesture catalogue: gestures, their descriptions,
//! multi-language meanings, and reference pictures.
//!
//! [`api::ApiClient`] talks to the REST backend; [`store::Store`] keeps the
//! state a UI renders from and sequences API calls with state changes.

pub mod api;
pub mod config;
pub mod logging;
pub mod model;
pub mod store;
