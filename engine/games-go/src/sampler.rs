//! Random playout policies.
//!
//! Both samplers finish games by repeatedly choosing among empty points
//! that are playable and are not eye-like for the mover, passing when
//! nothing qualifies. Games are capped at three times the board area so a
//! degenerate position cannot loop forever.

use crate::Goban;
use engine_core::{Board, Move, Player, PlayStatus, Sampler, Vertex};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, WeightedAliasIndex};

fn move_cap(board: &Goban) -> usize {
    3 * board.size() * board.size()
}

/// Points worth playing for `player` right now.
fn candidates(board: &Goban, player: Player) -> Vec<Vertex> {
    board
        .empty_vertices()
        .into_iter()
        .filter(|&v| board.is_pseudo_legal(player, v) && !board.is_eye_like(player, v))
        .collect()
}

/// Uniform random playout policy.
#[derive(Debug, Clone, Default)]
pub struct UniformSampler;

impl UniformSampler {
    pub fn new() -> Self {
        Self
    }
}

impl Sampler<Goban> for UniformSampler {
    fn new_playout(&mut self, _board: &Goban) {}

    fn move_played(&mut self, _board: &Goban) {}

    fn probability(&self, board: &Goban, _player: Player, _vertex: Vertex) -> f32 {
        // Uniform over every empty point plus pass
        1.0 / (board.empty_vertices().len() + 1) as f32
    }

    fn run(&mut self, board: &mut Goban, rng: &mut ChaCha20Rng) {
        let cap = board.moves().len() + move_cap(board);
        while !board.both_player_pass() && board.moves().len() < cap {
            let player = board.act_player();
            let mut moves = candidates(board, player);
            moves.shuffle(rng);

            let mut played = false;
            for v in moves {
                board.play_legal(Move::new(player, v));
                if board.last_move_status() == PlayStatus::Ok {
                    played = true;
                    break;
                }
            }
            if !played {
                board.play_legal(Move::new(player, Vertex::PASS));
            }
        }
    }
}

/// Playout policy weighting each point by a fixed gamma value.
///
/// Gammas are per-vertex urgencies; pass carries an implicit gamma of 1.
/// With all gammas equal this degenerates to the uniform policy.
#[derive(Debug, Clone)]
pub struct GammaSampler {
    gammas: Vec<f32>,
}

impl GammaSampler {
    /// Build from a weight function over board points.
    pub fn from_fn(size: usize, gamma: impl Fn(Vertex) -> f32) -> Self {
        let mut gammas = vec![0.0; Vertex::TABLE_SIZE];
        for v in Vertex::all(size) {
            gammas[v.table_index()] = gamma(v).max(0.0);
        }
        Self { gammas }
    }

    #[inline]
    fn gamma(&self, vertex: Vertex) -> f32 {
        if vertex == Vertex::PASS {
            1.0
        } else {
            self.gammas[vertex.table_index()]
        }
    }
}

impl Sampler<Goban> for GammaSampler {
    fn new_playout(&mut self, _board: &Goban) {}

    fn move_played(&mut self, _board: &Goban) {}

    fn probability(&self, board: &Goban, player: Player, vertex: Vertex) -> f32 {
        let total: f32 = candidates(board, player)
            .into_iter()
            .map(|v| self.gamma(v))
            .sum::<f32>()
            + 1.0; // pass
        if total <= 0.0 {
            return 0.0;
        }
        (self.gamma(vertex) / total).clamp(0.0, 1.0)
    }

    fn run(&mut self, board: &mut Goban, rng: &mut ChaCha20Rng) {
        let cap = board.moves().len() + move_cap(board);
        while !board.both_player_pass() && board.moves().len() < cap {
            let player = board.act_player();
            let mut moves = candidates(board, player);

            let mut played = false;
            while !moves.is_empty() {
                let weights: Vec<f32> = moves.iter().map(|&v| self.gamma(v)).collect();
                let pick = match WeightedAliasIndex::new(weights) {
                    Ok(dist) => dist.sample(rng),
                    // All weights zero: fall back to a uniform pick
                    Err(_) => rng.gen_range(0..moves.len()),
                };
                let v = moves.swap_remove(pick);
                board.play_legal(Move::new(player, v));
                if board.last_move_status() == PlayStatus::Ok {
                    played = true;
                    break;
                }
            }
            if !played {
                board.play_legal(Move::new(player, Vertex::PASS));
            }
        }
    }
}
