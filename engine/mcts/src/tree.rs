//! Arena-owned search tree.
//!
//! All nodes live in a single arena indexed by `NodeId`, with a free list
//! so pruned subtrees can be reused; the arena never exceeds
//! `SearchConfig::max_nodes`. Nodes carry no parent pointers: backward
//! traversal goes through the per-playout trace kept by the search driver.
//!
//! The root is fixed at `(White, ANY)`. The per-player expansion flags let
//! the same root serve whichever side moves first, so following the live
//! game is a matter of advancing the active-root pointer.

use crate::config::SearchConfig;
use crate::node::{Node, NodeId};
use crate::stat::Stat;
use engine_core::{Board, Move, Player, Sampler, Vertex};
use std::fmt::Write as _;
use tracing::debug;

/// Search tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree {
    /// Arena storing all nodes. Freed slots stay in place until reused.
    nodes: Vec<Node>,

    /// Reusable slots released by pruning.
    free: Vec<NodeId>,

    /// Live node count.
    in_use: usize,

    /// Hard arena bound.
    max_nodes: usize,

    /// The game-start node.
    root: NodeId,

    /// The node matching the current real-board position.
    act_root: NodeId,
}

impl SearchTree {
    /// Create a tree holding only the root.
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            nodes: vec![Node::new(Player::White, Vertex::ANY, 0.0, config)],
            free: Vec::new(),
            in_use: 1,
            max_nodes: config.max_nodes.max(1),
            root: NodeId(0),
            act_root: NodeId(0),
        }
    }

    /// Drop every node and recreate a fresh root.
    pub fn reset(&mut self, config: &SearchConfig) {
        self.nodes.clear();
        self.free.clear();
        self.nodes
            .push(Node::new(Player::White, Vertex::ANY, 0.0, config));
        self.in_use = 1;
        self.max_nodes = config.max_nodes.max(1);
        self.root = NodeId(0);
        self.act_root = NodeId(0);
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// The node matching the current real-board position.
    #[inline]
    pub fn act_root(&self) -> NodeId {
        self.act_root
    }

    /// Live node count.
    #[inline]
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Allocate a slot for a node. `None` once the arena bound is reached.
    fn alloc(&mut self, node: Node) -> Option<NodeId> {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0 as usize] = node;
            self.in_use += 1;
            return Some(id);
        }
        if self.nodes.len() < self.max_nodes {
            let id = NodeId(self.nodes.len() as u32);
            self.nodes.push(node);
            self.in_use += 1;
            return Some(id);
        }
        None
    }

    /// Return a leaf slot to the free list.
    fn release(&mut self, id: NodeId) {
        debug_assert!(self.node(id).children.is_empty());
        self.free.push(id);
        self.in_use -= 1;
    }

    /// Recursively release a node and every descendant.
    pub fn free_subtree(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.release(id);
    }

    /// Release every child subtree of a node and clear its expansion flags.
    fn free_children(&mut self, id: NodeId) {
        let children = self.node_mut(id).forget_children();
        for child in children {
            self.free_subtree(child);
        }
    }

    /// Detach a child from its parent and release its subtree.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).children.retain(|&c| c != child);
        self.free_subtree(child);
    }

    /// Find the child of `id` carrying the given move.
    pub fn find_child(&self, id: NodeId, m: Move) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).game_move() == m)
    }

    /// Generate one child per legal move of `player` in the position the
    /// board represents. Idempotent: guarded by the per-player flag.
    ///
    /// Returns false if the arena bound was hit; the node is then left
    /// untouched and the flag stays clear, so the subtree degrades into
    /// rollout-only search.
    pub fn ensure_expanded<B: Board, S: Sampler<B>>(
        &mut self,
        id: NodeId,
        player: Player,
        board: &B,
        sampler: &S,
        config: &SearchConfig,
    ) -> bool {
        if self.node(id).has_all_legal_children(player) {
            return true;
        }

        let mut vertices = board.empty_vertices();
        vertices.push(Vertex::PASS);

        let mut added = Vec::new();
        for v in vertices {
            if !board.is_legal(player, v) {
                continue;
            }
            let bias = sampler.probability(board, player, v);
            match self.alloc(Node::new(player, v, bias, config)) {
                Some(child) => added.push(child),
                None => {
                    // Arena exhausted: roll the partial expansion back.
                    for child in added {
                        self.release(child);
                    }
                    debug!(node = id.0, "node arena full, expansion skipped");
                    return false;
                }
            }
        }

        self.node_mut(id).children.extend(added);
        self.node_mut(id).mark_all_legal_children(player);
        true
    }

    /// Drop children of `player` that the real board rejects. Catches
    /// superko children that were legal in the position where they were
    /// generated but not against the full game history.
    pub fn prune_illegal_children<B: Board>(&mut self, id: NodeId, player: Player, board: &B) {
        let doomed: Vec<NodeId> = self
            .node(id)
            .children
            .iter()
            .copied()
            .filter(|&c| {
                let child = self.node(c);
                child.player == player && !board.is_really_legal(child.game_move())
            })
            .collect();
        for child in doomed {
            debug!(vertex = %self.node(child).vertex, "pruning illegal child at root");
            self.remove_child(id, child);
        }
    }

    /// Advance the active root along the game record, growing the path as
    /// needed, then expand it for the side to move and prune children the
    /// full board history rejects.
    pub fn sync_root<B: Board, S: Sampler<B>>(
        &mut self,
        board: &B,
        scratch: &mut B,
        sampler: &mut S,
        config: &SearchConfig,
    ) {
        scratch.clear();
        sampler.new_playout(scratch);
        self.act_root = self.root;

        let moves: Vec<Move> = board.moves().to_vec();
        for m in moves {
            self.ensure_expanded(self.act_root, m.player, scratch, &*sampler, config);
            let child = match self.find_child(self.act_root, m) {
                Some(child) => child,
                None => {
                    // Either the child was pruned earlier (superko in a
                    // position the game then avoided) or the arena is full.
                    // Graft the one child the game actually played.
                    let bias = sampler.probability(scratch, m.player, m.vertex);
                    let node = Node::new(m.player, m.vertex, bias, config);
                    let id = match self.alloc(node) {
                        Some(id) => id,
                        None => {
                            // Everything outside the game path is
                            // expendable; reclaim and retry.
                            self.free_children(self.act_root);
                            self.alloc(Node::new(m.player, m.vertex, bias, config))
                                .expect("node arena too small to follow the game record")
                        }
                    };
                    self.node_mut(self.act_root).children.push(id);
                    id
                }
            };
            self.act_root = child;
            debug_assert!(scratch.is_really_legal(m));
            scratch.play_legal(m);
            sampler.move_played(scratch);
        }

        let player = board.act_player();
        self.ensure_expanded(self.act_root, player, board, &*sampler, config);
        self.prune_illegal_children(self.act_root, player, board);
    }

    /// Among the active node's children owned by `player`, the one with
    /// the highest selection urgency. Ties keep the first-seen child.
    pub fn best_rave_child(
        &self,
        id: NodeId,
        player: Player,
        config: &SearchConfig,
    ) -> Option<NodeId> {
        let parent = self.node(id);
        let log_parent = parent.stat.update_count().ln();

        let mut best: Option<NodeId> = None;
        let mut best_urgency = f32::NEG_INFINITY;
        for &child in &parent.children {
            let node = self.node(child);
            if node.player != player {
                continue;
            }
            let urgency = node.rave_urgency(player, log_parent, config);
            if urgency > best_urgency {
                best_urgency = urgency;
                best = Some(child);
            }
        }
        best
    }

    /// The child of `player` with the most updates; the robust choice for
    /// committing a move. Ties keep the first-seen child.
    pub fn most_explored_child(&self, id: NodeId, player: Player) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        let mut best_count = -1.0f32;
        for &child in &self.node(id).children {
            let node = self.node(child);
            if node.player != player {
                continue;
            }
            let count = node.stat.update_count();
            if count > best_count {
                best_count = count;
                best = Some(child);
            }
        }
        best
    }

    /// Render the subtree under the active root, one node per line,
    /// indented by depth. Children print in decreasing update count,
    /// truncated to `max_children` per level (shrinking by one per level
    /// down to a floor of one) and skipped below `min_visits`.
    pub fn show_tree(&self, config: &SearchConfig, min_visits: f32, max_children: usize) -> String {
        let mut out = String::new();
        self.rec_print(&mut out, self.act_root, 0, min_visits, max_children.max(1), config);
        out
    }

    fn rec_print(
        &self,
        out: &mut String,
        id: NodeId,
        depth: usize,
        min_visits: f32,
        max_children: usize,
        config: &SearchConfig,
    ) {
        let node = self.node(id);
        for _ in 0..depth {
            out.push_str("  ");
        }
        let mixed = Stat::mix(
            &node.stat,
            config.stat_bias,
            &node.rave_stat,
            config.rave_bias,
        );
        let _ = writeln!(
            out,
            "{} {} {} {} + {:.3} -> {:+.3}",
            node.player, node.vertex, node.stat, node.rave_stat, node.bias, mixed
        );

        let mut ordered = node.children.clone();
        // Stable sort keeps first-seen order among equal counts
        ordered.sort_by(|&a, &b| {
            self.node(b)
                .stat
                .update_count()
                .partial_cmp(&self.node(a).stat.update_count())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ordered.truncate(max_children);

        for child in ordered {
            if self.node(child).stat.update_count() >= min_visits {
                self.rec_print(
                    out,
                    child,
                    depth + 1,
                    min_visits,
                    max_children.saturating_sub(1).max(1),
                    config,
                );
            }
        }
    }
}
