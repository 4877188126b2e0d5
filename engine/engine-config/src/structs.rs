//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// ============================================================================

fn d_engine_name() -> String {
    defaults::ENGINE_NAME.into()
}
fn d_log_level() -> String {
    defaults::LOG_LEVEL.into()
}
fn d_board_size() -> usize {
    defaults::BOARD_SIZE
}
fn d_komi() -> f32 {
    defaults::KOMI
}
fn d_playout_count() -> u32 {
    defaults::PLAYOUT_COUNT
}
fn d_explore_rate() -> f32 {
    defaults::EXPLORE_RATE
}
fn d_mature_update_threshold() -> f32 {
    defaults::MATURE_UPDATE_THRESHOLD
}
fn d_prior_count() -> f32 {
    defaults::PRIOR_COUNT
}
fn d_prior_mean() -> f32 {
    defaults::PRIOR_MEAN
}
fn d_resign_mean() -> f32 {
    defaults::RESIGN_MEAN
}
fn d_rave_use() -> bool {
    defaults::RAVE_USE
}
fn d_rave_update() -> bool {
    defaults::RAVE_UPDATE
}
fn d_rave_update_fraction() -> f32 {
    defaults::RAVE_UPDATE_FRACTION
}
fn d_stat_bias() -> f32 {
    defaults::STAT_BIAS
}
fn d_rave_bias() -> f32 {
    defaults::RAVE_BIAS
}
fn d_progressive_bias() -> f32 {
    defaults::PROGRESSIVE_BIAS
}
fn d_tree_max_moves() -> u32 {
    defaults::TREE_MAX_MOVES
}
fn d_max_nodes() -> usize {
    defaults::MAX_NODES
}
fn d_print_min_visits() -> f32 {
    defaults::PRINT_MIN_VISITS
}
fn d_print_max_children() -> usize {
    defaults::PRINT_MAX_CHILDREN
}

// ============================================================================
// Config structs
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub board: BoardSection,
    #[serde(default)]
    pub search: SearchSection,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: EngineSection::default(),
            board: BoardSection::default(),
            search: SearchSection::default(),
        }
    }
}

/// General engine settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    #[serde(default = "d_engine_name")]
    pub name: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            name: d_engine_name(),
            log_level: d_log_level(),
        }
    }
}

/// Board settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardSection {
    #[serde(default = "d_board_size")]
    pub size: usize,
    #[serde(default = "d_komi")]
    pub komi: f32,
}

impl Default for BoardSection {
    fn default() -> Self {
        Self {
            size: d_board_size(),
            komi: d_komi(),
        }
    }
}

/// Search parameters. Field names match the parameters registered on the
/// engine's text protocol.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSection {
    #[serde(default = "d_playout_count")]
    pub playout_count: u32,
    #[serde(default = "d_explore_rate")]
    pub explore_rate: f32,
    #[serde(default = "d_mature_update_threshold")]
    pub mature_update_threshold: f32,
    #[serde(default = "d_prior_count")]
    pub prior_count: f32,
    #[serde(default = "d_prior_mean")]
    pub prior_mean: f32,
    #[serde(default = "d_resign_mean")]
    pub resign_mean: f32,
    #[serde(default = "d_rave_use")]
    pub rave_use: bool,
    #[serde(default = "d_rave_update")]
    pub rave_update: bool,
    #[serde(default = "d_rave_update_fraction")]
    pub rave_update_fraction: f32,
    #[serde(default = "d_stat_bias")]
    pub stat_bias: f32,
    #[serde(default = "d_rave_bias")]
    pub rave_bias: f32,
    #[serde(default = "d_progressive_bias")]
    pub progressive_bias: f32,
    #[serde(default = "d_tree_max_moves")]
    pub tree_max_moves: u32,
    #[serde(default = "d_max_nodes")]
    pub max_nodes: usize,
    #[serde(default = "d_print_min_visits")]
    pub print_min_visits: f32,
    #[serde(default = "d_print_max_children")]
    pub print_max_children: usize,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            playout_count: d_playout_count(),
            explore_rate: d_explore_rate(),
            mature_update_threshold: d_mature_update_threshold(),
            prior_count: d_prior_count(),
            prior_mean: d_prior_mean(),
            resign_mean: d_resign_mean(),
            rave_use: d_rave_use(),
            rave_update: d_rave_update(),
            rave_update_fraction: d_rave_update_fraction(),
            stat_bias: d_stat_bias(),
            rave_bias: d_rave_bias(),
            progressive_bias: d_progressive_bias(),
            tree_max_moves: d_tree_max_moves(),
            max_nodes: d_max_nodes(),
            print_min_visits: d_print_min_visits(),
            print_max_children: d_print_max_children(),
        }
    }
}
