//! Centralized configuration loading from config.toml.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`GOBAN_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! GOBAN_<SECTION>_<KEY>=value
//!
//! Examples:
//!     GOBAN_ENGINE_LOG_LEVEL=debug
//!     GOBAN_BOARD_SIZE=19
//!     GOBAN_SEARCH_PLAYOUT_COUNT=50000
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;

#[cfg(test)]
mod tests;
