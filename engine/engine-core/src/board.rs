//! The board and playout-policy contracts consumed by the search.
//!
//! The search core never owns a board implementation; it drives whatever
//! satisfies `Board` through this interface. Legality comes in three
//! strengths, from cheapest to strictest:
//!
//! - `is_pseudo_legal`: point is playable at a glance (empty, not the
//!   simple-ko point). Used as a precheck during tree descent.
//! - `is_legal`: full legality including suicide and positional superko.
//!   Used when expanding a node.
//! - `is_really_legal`: the strict form used when re-rooting the tree on the
//!   live game; pass is always legal.
//!
//! `play_legal` commits a move and reports the outcome through the
//! last-move status flag rather than a `Result`, so a rejected move leaves
//! the board unchanged and the caller decides how to recover.

use crate::{Move, Player, Vertex};
use rand_chacha::ChaCha20Rng;

/// Outcome of the most recent `play_legal` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStatus {
    /// The move was applied.
    Ok,
    /// The point is occupied or off the board.
    Occupied,
    /// The move would capture nothing and leave its own group without
    /// liberties.
    Suicide,
    /// The point is the simple-ko point.
    Ko,
    /// The move would recreate an earlier whole-board position.
    Superko,
}

/// A playable board position.
pub trait Board {
    /// Board dimension (9 for a 9x9 board).
    fn size(&self) -> usize;

    /// Reset to the empty starting position, keeping the dimension.
    fn clear(&mut self);

    /// Become a copy of another board of the same dimension.
    fn load_from(&mut self, other: &Self);

    /// The player to move.
    fn act_player(&self) -> Player;

    /// Force the player to move (used when the engine is asked to generate
    /// a move for a specific side).
    fn set_act_player(&mut self, player: Player);

    /// Full legality including suicide and positional superko.
    fn is_legal(&self, player: Player, vertex: Vertex) -> bool;

    /// Strict legality used while syncing the tree root with the game.
    fn is_really_legal(&self, m: Move) -> bool;

    /// Cheap precheck: the point could plausibly be played right now.
    fn is_pseudo_legal(&self, player: Player, vertex: Vertex) -> bool;

    /// Commit a move. Success or the failure reason is reported by
    /// `last_move_status`; a failed move leaves the position unchanged.
    fn play_legal(&mut self, m: Move);

    /// Outcome of the most recent `play_legal`.
    fn last_move_status(&self) -> PlayStatus;

    /// True when the last two moves were both passes.
    fn both_player_pass(&self) -> bool;

    /// Winner by terminal territory count. Meaningful once both players
    /// have passed.
    fn tt_winner(&self) -> Player;

    /// Winner of a finished random playout on this board.
    fn playout_winner(&self) -> Player;

    /// Every move played so far, in order.
    fn moves(&self) -> &[Move];

    /// Every empty point, in a stable order. Pass is not included; callers
    /// that need it append `Vertex::PASS` themselves.
    fn empty_vertices(&self) -> Vec<Vertex>;
}

/// A random-playout policy coupled to a board type.
///
/// The sampler owns whatever incremental state its move distribution needs;
/// `new_playout` and `move_played` are the maintenance hooks the search
/// calls as the board evolves.
pub trait Sampler<B: Board> {
    /// The board was just (re)loaded for a fresh playout.
    fn new_playout(&mut self, board: &B);

    /// A move was committed on the board.
    fn move_played(&mut self, board: &B);

    /// Probability in [0, 1] that this policy would sample the given move
    /// in the current position. Used as the progressive-bias prior of newly
    /// expanded tree nodes.
    fn probability(&self, board: &B, player: Player, vertex: Vertex) -> f32;

    /// Play the position out to a terminal state.
    fn run(&mut self, board: &mut B, rng: &mut ChaCha20Rng);
}
