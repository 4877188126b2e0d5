//! Search-tree node representation.
//!
//! Each node represents a move: `player` is the side that played `vertex`
//! to reach this position. Statistics are kept in the absolute
//! Black-positive score convention; only the prior is framed from the
//! mover's perspective, so `subjective_mean` reads correctly for both
//! sides.

use crate::config::SearchConfig;
use crate::stat::Stat;
use engine_core::{Move, Player, Vertex};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// The player who moved to reach this node.
    pub player: Player,

    /// The vertex played, or `Vertex::ANY` at the root.
    pub vertex: Vertex,

    /// Regular playout statistics.
    pub stat: Stat,

    /// Rapid-action value estimation statistics.
    pub rave_stat: Stat,

    /// Playout-policy probability of this move at creation time. Never
    /// changes afterwards.
    pub bias: f32,

    /// Whether all legal children for each player have been generated.
    has_all_legal_children: [bool; 2],

    /// Child node handles. Empty until expanded.
    pub children: Vec<NodeId>,
}

impl Node {
    /// Create a node for `player` playing `vertex`, with priors framed
    /// from that player's perspective.
    pub fn new(player: Player, vertex: Vertex, bias: f32, config: &SearchConfig) -> Node {
        debug_assert!((0.0..=1.0).contains(&bias), "bias out of range: {bias}");
        let prior_mean = player.subjective_score(config.prior_mean);
        Node {
            player,
            vertex,
            stat: Stat::with_prior(config.prior_count, prior_mean),
            rave_stat: Stat::with_prior(config.prior_count, prior_mean),
            bias,
            has_all_legal_children: [false; 2],
            children: Vec::new(),
        }
    }

    /// The move this node represents.
    #[inline]
    pub fn game_move(&self) -> Move {
        Move::new(self.player, self.vertex)
    }

    /// True once every legal child for `player` exists.
    #[inline]
    pub fn has_all_legal_children(&self, player: Player) -> bool {
        self.has_all_legal_children[player.index()]
    }

    /// Record that expansion for `player` completed.
    #[inline]
    pub fn mark_all_legal_children(&mut self, player: Player) {
        self.has_all_legal_children[player.index()] = true;
    }

    /// Give up the child list and clear the expansion flags, returning the
    /// detached handles so the tree can release them.
    pub(crate) fn forget_children(&mut self) -> Vec<NodeId> {
        self.has_all_legal_children = [false; 2];
        std::mem::take(&mut self.children)
    }

    /// A node is expanded once it has collected enough real updates beyond
    /// its prior.
    #[inline]
    pub fn ready_to_expand(&self, config: &SearchConfig) -> bool {
        self.stat.update_count() > config.prior_count + config.mature_update_threshold
    }

    /// Mean from the perspective of the player who moved here.
    #[inline]
    pub fn subjective_mean(&self) -> f32 {
        self.player.subjective_score(self.stat.mean())
    }

    /// Selection urgency for a parent whose side to move is `player`.
    ///
    /// Combines the (optionally RAVE-blended) value, a UCB exploration
    /// bonus and a progressive bias that fades with visits. `log_parent`
    /// is `ln` of the parent's update count, hoisted out by the caller.
    pub fn rave_urgency(&self, player: Player, log_parent: f32, config: &SearchConfig) -> f32 {
        let value = if config.rave_use {
            Stat::mix(
                &self.stat,
                config.stat_bias,
                &self.rave_stat,
                config.rave_bias,
            )
        } else {
            self.stat.mean()
        };
        let visits = self.stat.update_count();

        player.subjective_score(value)
            + config.explore_rate * (log_parent / visits).sqrt()
            + config.progressive_bias * self.bias / visits
    }
}
