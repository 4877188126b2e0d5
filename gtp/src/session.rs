//! Engine session: the live game and the search attached to it.
//!
//! The session owns the real board; the search only touches it through
//! `genmove`, which commits the chosen move itself. Everything the text
//! protocol can reconfigure at runtime goes through the parameter table.

use engine_config::EngineConfig;
use engine_core::{Board, Move, Player, PlayStatus, Vertex};
use games_go::{perft, Goban, UniformSampler};
use mcts::{Search, SearchConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::info;

/// Parameters readable and writable over the protocol.
pub const PARAM_NAMES: &[&str] = &[
    "explore_rate",
    "playout_count",
    "mature_update_threshold",
    "prior_count",
    "prior_mean",
    "resign_mean",
    "rave_use",
    "rave_update",
    "rave_update_fraction",
    "stat_bias",
    "rave_bias",
    "progressive_bias",
    "tree_max_moves",
    "print_min_visits",
    "print_max_children",
];

/// Errors surfaced to the protocol as command failures.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unacceptable size")]
    UnacceptableSize,

    #[error("illegal move")]
    IllegalMove,

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn to_search_config(search: &engine_config::SearchSection) -> SearchConfig {
    SearchConfig {
        playout_count: search.playout_count,
        explore_rate: search.explore_rate,
        mature_update_threshold: search.mature_update_threshold,
        prior_count: search.prior_count,
        prior_mean: search.prior_mean,
        resign_mean: search.resign_mean,
        rave_use: search.rave_use,
        rave_update: search.rave_update,
        rave_update_fraction: search.rave_update_fraction,
        stat_bias: search.stat_bias,
        rave_bias: search.rave_bias,
        progressive_bias: search.progressive_bias,
        tree_max_moves: search.tree_max_moves,
        max_nodes: search.max_nodes,
        print_min_visits: search.print_min_visits,
        print_max_children: search.print_max_children,
    }
}

/// A live game with its search state.
pub struct EngineSession {
    board: Goban,
    search: Search<Goban, UniformSampler>,
    rng: ChaCha20Rng,
}

impl EngineSession {
    pub fn new(config: &EngineConfig, seed: u64) -> Self {
        let size = config.board.size;
        let komi = config.board.komi;
        let search_config = to_search_config(&config.search);
        info!(size, komi, playouts = search_config.playout_count, "session created");

        Self {
            board: Goban::new(size).with_komi(komi),
            search: Search::new(
                search_config,
                UniformSampler::new(),
                Goban::new(size).with_komi(komi),
            ),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn board(&self) -> &Goban {
        &self.board
    }

    /// Replace the board with an empty one of the given dimension.
    pub fn boardsize(&mut self, size: usize) -> Result<(), SessionError> {
        if !(2..=Vertex::MAX_SIZE).contains(&size) {
            return Err(SessionError::UnacceptableSize);
        }
        let komi = self.board.komi();
        self.board = Goban::new(size).with_komi(komi);
        self.search = Search::new(
            self.search.config().clone(),
            UniformSampler::new(),
            Goban::new(size).with_komi(komi),
        );
        Ok(())
    }

    /// Empty the board and drop the search tree.
    pub fn clear_board(&mut self) {
        self.board.clear();
        self.search.reset();
    }

    pub fn set_komi(&mut self, komi: f32) {
        self.board.set_komi(komi);
    }

    /// Commit an external move (from the opponent or an operator).
    pub fn play(&mut self, m: Move) -> Result<(), SessionError> {
        if !self.board.is_really_legal(m) {
            return Err(SessionError::IllegalMove);
        }
        self.board.play_legal(m);
        debug_assert_eq!(self.board.last_move_status(), PlayStatus::Ok);
        Ok(())
    }

    /// Search and commit the engine's move for `player`.
    pub fn genmove(&mut self, player: Player) -> Vertex {
        self.search.genmove(&mut self.board, player, &mut self.rng)
    }

    pub fn showboard(&self) -> String {
        self.board.to_string()
    }

    /// Dump the search tree under the current position.
    pub fn show_tree(&mut self, min_visits: f32, max_children: usize) -> String {
        // The tree may be stale after external moves
        self.search.sync_root(&self.board);
        self.search.show_tree(min_visits, max_children)
    }

    pub fn default_show_limits(&self) -> (f32, usize) {
        let config = self.search.config();
        (config.print_min_visits, config.print_max_children)
    }

    /// Count legal move sequences from the current position.
    pub fn perft(&self, depth: usize) -> u64 {
        perft(&self.board, self.board.act_player(), depth)
    }

    pub fn get_param(&self, name: &str) -> Result<String, SessionError> {
        let c = self.search.config();
        let value = match name {
            "explore_rate" => c.explore_rate.to_string(),
            "playout_count" => c.playout_count.to_string(),
            "mature_update_threshold" => c.mature_update_threshold.to_string(),
            "prior_count" => c.prior_count.to_string(),
            "prior_mean" => c.prior_mean.to_string(),
            "resign_mean" => c.resign_mean.to_string(),
            "rave_use" => c.rave_use.to_string(),
            "rave_update" => c.rave_update.to_string(),
            "rave_update_fraction" => c.rave_update_fraction.to_string(),
            "stat_bias" => c.stat_bias.to_string(),
            "rave_bias" => c.rave_bias.to_string(),
            "progressive_bias" => c.progressive_bias.to_string(),
            "tree_max_moves" => c.tree_max_moves.to_string(),
            "print_min_visits" => c.print_min_visits.to_string(),
            "print_max_children" => c.print_max_children.to_string(),
            _ => return Err(SessionError::UnknownParameter(name.to_string())),
        };
        Ok(value)
    }

    pub fn set_param(&mut self, name: &str, value: &str) -> Result<(), SessionError> {
        fn parse<T: std::str::FromStr>(value: &str) -> Result<T, SessionError> {
            value
                .parse()
                .map_err(|_| SessionError::InvalidValue(value.to_string()))
        }

        let c = self.search.config_mut();
        match name {
            "explore_rate" => c.explore_rate = parse(value)?,
            "playout_count" => c.playout_count = parse(value)?,
            "mature_update_threshold" => c.mature_update_threshold = parse(value)?,
            "prior_count" => c.prior_count = parse(value)?,
            "prior_mean" => c.prior_mean = parse(value)?,
            "resign_mean" => c.resign_mean = parse(value)?,
            "rave_use" => c.rave_use = parse(value)?,
            "rave_update" => c.rave_update = parse(value)?,
            "rave_update_fraction" => c.rave_update_fraction = parse(value)?,
            "stat_bias" => c.stat_bias = parse(value)?,
            "rave_bias" => c.rave_bias = parse(value)?,
            "progressive_bias" => c.progressive_bias = parse(value)?,
            "tree_max_moves" => c.tree_max_moves = parse(value)?,
            "print_min_visits" => c.print_min_visits = parse(value)?,
            "print_max_children" => c.print_max_children = parse(value)?,
            _ => return Err(SessionError::UnknownParameter(name.to_string())),
        }
        info!(name, value, "parameter changed");
        Ok(())
    }

    /// All parameters with their current values, one per line.
    pub fn list_params(&self) -> String {
        PARAM_NAMES
            .iter()
            .map(|name| {
                let value = self.get_param(name).expect("listed parameter exists");
                format!("{name} {value}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
