//! Default configuration values.
//!
//! Single source of truth for every default the engine ships with.

// Engine defaults
pub const ENGINE_NAME: &str = "goban";
pub const LOG_LEVEL: &str = "info";

// Board defaults
pub const BOARD_SIZE: usize = 9;
pub const KOMI: f32 = 7.5;

// Search defaults
pub const PLAYOUT_COUNT: u32 = 10_000;
pub const EXPLORE_RATE: f32 = 1.0;
pub const MATURE_UPDATE_THRESHOLD: f32 = 100.0;
pub const PRIOR_COUNT: f32 = 1.0;
pub const PRIOR_MEAN: f32 = 0.0;
pub const RESIGN_MEAN: f32 = -0.95;
pub const RAVE_USE: bool = true;
pub const RAVE_UPDATE: bool = true;
pub const RAVE_UPDATE_FRACTION: f32 = 0.5;
pub const STAT_BIAS: f32 = 1.0;
pub const RAVE_BIAS: f32 = 1.0;
pub const PROGRESSIVE_BIAS: f32 = 1.0;
pub const TREE_MAX_MOVES: u32 = 400;
pub const MAX_NODES: usize = 1_000_000;
pub const PRINT_MIN_VISITS: f32 = 100.0;
pub const PRINT_MAX_CHILDREN: usize = 4;
