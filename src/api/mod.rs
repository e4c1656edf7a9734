//! REST client for the gesture catalogue backend.
//!
//! - [`ApiClient`]: one async method per endpoint
//! - [`SessionStore`]: transient holder of the login token, read on every request
//! - [`TokenPayload`]: claims decoded from that token

mod client;
mod error;
mod session;
mod token;

pub use client::{total_pages, ApiClient, GesturePage, PAGE_SIZE, TOTAL_ITEMS_HEADER};
pub use error::ApiError;
pub use session::{SessionStore, SessionToken};
pub use token::{Level, TokenError, TokenPayload};
