//! Configuration loading for the catalogue client.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ApiConfig, Config, SearchConfig};
