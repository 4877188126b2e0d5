//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable
//! overrides.

use crate::EngineConfig;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a subdirectory)
];

/// Load the engine configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the GOBAN_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> EngineConfig {
    if let Ok(path) = std::env::var("GOBAN_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from GOBAN_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "GOBAN_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(EngineConfig::default())
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &PathBuf) -> EngineConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(EngineConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(EngineConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (usize, u32, f32, bool, ...)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: GOBAN_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: EngineConfig) -> EngineConfig {
    // Engine
    env_override!(config, engine.name, "GOBAN_ENGINE_NAME");
    env_override!(config, engine.log_level, "GOBAN_ENGINE_LOG_LEVEL");

    // Board
    env_override!(config, board.size, "GOBAN_BOARD_SIZE", parse);
    env_override!(config, board.komi, "GOBAN_BOARD_KOMI", parse);

    // Search
    env_override!(
        config,
        search.playout_count,
        "GOBAN_SEARCH_PLAYOUT_COUNT",
        parse
    );
    env_override!(
        config,
        search.explore_rate,
        "GOBAN_SEARCH_EXPLORE_RATE",
        parse
    );
    env_override!(
        config,
        search.mature_update_threshold,
        "GOBAN_SEARCH_MATURE_UPDATE_THRESHOLD",
        parse
    );
    env_override!(config, search.prior_count, "GOBAN_SEARCH_PRIOR_COUNT", parse);
    env_override!(config, search.prior_mean, "GOBAN_SEARCH_PRIOR_MEAN", parse);
    env_override!(config, search.resign_mean, "GOBAN_SEARCH_RESIGN_MEAN", parse);
    env_override!(config, search.rave_use, "GOBAN_SEARCH_RAVE_USE", parse);
    env_override!(config, search.rave_update, "GOBAN_SEARCH_RAVE_UPDATE", parse);
    env_override!(
        config,
        search.rave_update_fraction,
        "GOBAN_SEARCH_RAVE_UPDATE_FRACTION",
        parse
    );
    env_override!(config, search.stat_bias, "GOBAN_SEARCH_STAT_BIAS", parse);
    env_override!(config, search.rave_bias, "GOBAN_SEARCH_RAVE_BIAS", parse);
    env_override!(
        config,
        search.progressive_bias,
        "GOBAN_SEARCH_PROGRESSIVE_BIAS",
        parse
    );
    env_override!(
        config,
        search.tree_max_moves,
        "GOBAN_SEARCH_TREE_MAX_MOVES",
        parse
    );
    env_override!(config, search.max_nodes, "GOBAN_SEARCH_MAX_NODES", parse);
    env_override!(
        config,
        search.print_min_visits,
        "GOBAN_SEARCH_PRINT_MIN_VISITS",
        parse
    );
    env_override!(
        config,
        search.print_max_children,
        "GOBAN_SEARCH_PRINT_MAX_CHILDREN",
        parse
    );

    config
}
