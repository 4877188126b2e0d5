//! The playout driver.
//!
//! One playout couples three phases: descend through the tree under the
//! RAVE-UCB selection rule (expanding mature leaves on the way), finish the
//! game with the random policy on a scratch board, and propagate the
//! terminal score through every node on the traversed path.
//!
//! The driver is strictly single-threaded: playouts run back to back and
//! each one sees the tree exactly as the previous one left it. Between
//! playouts the tree is consistent, which is where an outer command loop
//! may interject for analysis queries.

use crate::config::SearchConfig;
use crate::node::NodeId;
use crate::tree::SearchTree;
use engine_core::{Board, Move, Player, PlayStatus, Sampler, Vertex};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace};

/// How a single playout ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayoutOutcome {
    /// A terminal position was reached and its score propagated.
    Scored(f32),
    /// A selected child proved illegal on the scratch board. The child was
    /// pruned and nothing was propagated.
    Aborted,
}

/// Per-vertex credit marker used by the RAVE update.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RaveMark {
    Unseen,
    Credit(Player),
}

/// Monte Carlo tree search over a board and a playout policy.
pub struct Search<B: Board, S: Sampler<B>> {
    tree: SearchTree,
    config: SearchConfig,
    sampler: S,
    scratch: B,
    /// Nodes visited by the current playout, root first.
    trace: Vec<NodeId>,
    /// Moves of the current playout, including the move that produced the
    /// active root and the rollout tail.
    move_history: Vec<Move>,
    /// Scratch table of the RAVE update, reused across playouts.
    rave_marks: Vec<RaveMark>,
}

impl<B: Board, S: Sampler<B>> Search<B, S> {
    /// Create a search. `scratch` must be a board of the same dimension as
    /// the game board; it is reloaded at every playout.
    pub fn new(config: SearchConfig, sampler: S, scratch: B) -> Self {
        Self {
            tree: SearchTree::new(&config),
            config,
            sampler,
            scratch,
            trace: Vec::new(),
            move_history: Vec::new(),
            rave_marks: vec![RaveMark::Unseen; Vertex::TABLE_SIZE],
        }
    }

    /// The search tree (for inspection).
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Current parameters.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Mutable parameters, for the engine's parameter commands. Changes to
    /// `max_nodes` take effect at the next `reset`.
    pub fn config_mut(&mut self) -> &mut SearchConfig {
        &mut self.config
    }

    /// Drop the whole tree and start over.
    pub fn reset(&mut self) {
        self.tree.reset(&self.config);
    }

    /// Re-root the tree on the current game record.
    pub fn sync_root(&mut self, board: &B) {
        self.tree
            .sync_root(board, &mut self.scratch, &mut self.sampler, &self.config);
    }

    /// Render the subtree under the active root.
    pub fn show_tree(&self, min_visits: f32, max_children: usize) -> String {
        self.tree.show_tree(&self.config, min_visits, max_children)
    }

    /// Run one playout from the active root against the given game board.
    pub fn playout(&mut self, board: &B, rng: &mut ChaCha20Rng) -> PlayoutOutcome {
        self.scratch.load_from(board);
        self.sampler.new_playout(&self.scratch);

        let act_root = self.tree.act_root();
        self.trace.clear();
        self.trace.push(act_root);
        self.move_history.clear();
        self.move_history.push(self.tree.node(act_root).game_move());

        let tree_phase = self.config.tree_max_moves > 0;
        let mut tree_move_count = 0u32;

        while tree_phase {
            let current = *self.trace.last().expect("trace holds at least the root");
            let player = self.scratch.act_player();

            if !self.tree.node(current).has_all_legal_children(player) {
                if !self.tree.node(current).ready_to_expand(&self.config) {
                    break;
                }
                if !self.tree.ensure_expanded(
                    current,
                    player,
                    &self.scratch,
                    &self.sampler,
                    &self.config,
                ) {
                    // Arena full: search below this node is rollout-only
                    break;
                }
            }

            let child = self
                .tree
                .best_rave_child(current, player, &self.config)
                .expect("expanded node has at least the pass child");
            self.trace.push(child);
            let m = self.tree.node(child).game_move();

            if !self.scratch.is_pseudo_legal(player, m.vertex) {
                self.trace.pop();
                self.tree.remove_child(current, child);
                trace!(vertex = %m.vertex, "pruned pseudo-illegal child during descent");
                return PlayoutOutcome::Aborted;
            }
            self.scratch.play_legal(m);
            if self.scratch.last_move_status() != PlayStatus::Ok {
                self.trace.pop();
                self.tree.remove_child(current, child);
                trace!(
                    vertex = %m.vertex,
                    status = ?self.scratch.last_move_status(),
                    "board rejected child during descent"
                );
                return PlayoutOutcome::Aborted;
            }
            self.sampler.move_played(&self.scratch);
            self.move_history.push(m);
            tree_move_count += 1;

            if self.scratch.both_player_pass() {
                let score = self.scratch.tt_winner().to_score();
                self.update_trace(score);
                return PlayoutOutcome::Scored(score);
            }
            if tree_move_count >= self.config.tree_max_moves {
                break;
            }
        }

        // Rollout; its moves join the history so RAVE can credit them
        let played = self.scratch.moves().len();
        self.sampler.run(&mut self.scratch, rng);
        for &m in &self.scratch.moves()[played..] {
            self.move_history.push(m);
        }

        let score = self.scratch.playout_winner().to_score();
        self.update_trace(score);
        PlayoutOutcome::Scored(score)
    }

    /// Propagate a terminal score through the traversed path.
    fn update_trace(&mut self, score: f32) {
        for &id in &self.trace {
            self.tree.node_mut(id).stat.update(score);
        }
        if self.config.rave_update {
            self.update_trace_rave(score);
        }
    }

    /// Credit the score to RAVE statistics of children whose move appears
    /// later in the playout.
    ///
    /// For each trace position, the scanned window runs from the next move
    /// up to `rave_update_fraction` of the history. Within a window only
    /// the first move touching a vertex earns credit, for the player who
    /// made it; passes never count.
    fn update_trace_rave(&mut self, score: f32) {
        let window_end = ((self.move_history.len() as f32 * self.config.rave_update_fraction)
            as usize)
            .min(self.move_history.len());

        for i in 0..self.trace.len() {
            if i + 1 >= window_end {
                break;
            }
            let node_id = self.trace[i];

            self.rave_marks.fill(RaveMark::Unseen);
            for m in &self.move_history[i + 1..window_end] {
                if !m.vertex.is_on_board() {
                    continue;
                }
                let slot = m.vertex.table_index();
                if self.rave_marks[slot] == RaveMark::Unseen {
                    self.rave_marks[slot] = RaveMark::Credit(m.player);
                }
            }

            let child_count = self.tree.node(node_id).children.len();
            for k in 0..child_count {
                let child = self.tree.node(node_id).children[k];
                let cm = self.tree.node(child).game_move();
                if cm.vertex.is_on_board()
                    && self.rave_marks[cm.vertex.table_index()] == RaveMark::Credit(cm.player)
                {
                    self.tree.node_mut(child).rave_stat.update(score);
                }
            }
        }
    }

    /// Generate a move: sync the tree with the game, run the configured
    /// number of playouts, commit the most-explored root child to the
    /// board, and return its vertex. Returns `Vertex::RESIGN` (committing
    /// nothing) when even the best child's subjective mean is hopeless.
    ///
    /// Selection during search maximises urgency; the final commitment
    /// maximises visits. The divergence is deliberate: a lightly visited
    /// high-mean child is not trusted with the game.
    pub fn genmove(&mut self, board: &mut B, player: Player, rng: &mut ChaCha20Rng) -> Vertex {
        board.set_act_player(player);
        self.sync_root(board);

        for _ in 0..self.config.playout_count {
            self.playout(board, rng);
        }

        let act_root = self.tree.act_root();
        let best = self
            .tree
            .most_explored_child(act_root, player)
            .expect("pass is always legal, so the root has a child");
        let best_node = self.tree.node(best);
        let (vertex, mean) = (best_node.vertex, best_node.subjective_mean());
        debug!(
            %player,
            %vertex,
            mean,
            visits = best_node.stat.update_count(),
            nodes = self.tree.in_use(),
            "genmove decision"
        );

        if mean < self.config.resign_mean {
            return Vertex::RESIGN;
        }
        board.play_legal(Move::new(player, vertex));
        debug_assert_eq!(board.last_move_status(), PlayStatus::Ok);
        vertex
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{GridBoard, StubSampler};
    use rand::SeedableRng;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(42)
    }

    fn search_on(size: usize, config: SearchConfig) -> Search<GridBoard, StubSampler> {
        Search::new(config, StubSampler, GridBoard::new(size))
    }

    #[test]
    fn test_single_playout_updates_trace_once() {
        let config = SearchConfig::default()
            .with_prior(1.0, 0.0)
            .with_mature_threshold(100.0);
        let mut search = search_on(3, config);
        let board = GridBoard::new(3);
        search.sync_root(&board);

        let outcome = search.playout(&board, &mut rng());
        assert_eq!(outcome, PlayoutOutcome::Scored(1.0));

        let tree = search.tree();
        let root = tree.act_root();
        // Root: prior + exactly one update
        assert!((tree.node(root).stat.update_count() - 2.0).abs() < 1e-6);
        // Exactly one child was descended into
        let touched: Vec<f32> = tree
            .node(root)
            .children
            .iter()
            .map(|&c| tree.node(c).stat.update_count())
            .filter(|&n| n > 1.0)
            .collect();
        assert_eq!(touched, vec![2.0]);
    }

    #[test]
    fn test_genmove_on_empty_board_plays_and_never_resigns() {
        let config = SearchConfig::for_testing().with_playouts(50);
        let mut search = search_on(3, config);
        let mut board = GridBoard::new(3);

        let vertex = search.genmove(&mut board, Player::Black, &mut rng());
        assert_ne!(vertex, Vertex::RESIGN);
        assert_eq!(board.moves().len(), 1);
        assert_eq!(board.moves()[0].player, Player::Black);

        let tree = search.tree();
        let visits = tree.node(tree.act_root()).stat.update_count();
        // prior + one update per playout (stub board never aborts)
        assert!((visits - (1.0 + 50.0)).abs() < 1e-6);
    }

    #[test]
    fn test_genmove_resigns_when_every_playout_is_lost() {
        let config = SearchConfig::for_testing()
            .with_playouts(300)
            .with_resign_mean(-0.95);
        let mut search = search_on(2, config);
        let mut board = GridBoard::new(2);
        board.winner = Some(Player::White);

        let vertex = search.genmove(&mut board, Player::Black, &mut rng());
        assert_eq!(vertex, Vertex::RESIGN);
        // Resigning commits nothing
        assert!(board.moves().is_empty());
    }

    #[test]
    fn test_rejected_child_is_pruned_without_propagation() {
        let config = SearchConfig::for_testing();
        let mut search = search_on(2, config);
        let mut board = GridBoard::new(2);
        for v in Vertex::all(2) {
            board.fail_on_play.insert(v);
        }
        search.sync_root(&board);

        let before = search.tree().node(search.tree().act_root()).children.len();
        let outcome = search.playout(&board, &mut rng());
        assert_eq!(outcome, PlayoutOutcome::Aborted);

        let tree = search.tree();
        let root = tree.act_root();
        // No score reached the root, the offending child is gone
        assert!((tree.node(root).stat.update_count() - 1.0).abs() < 1e-6);
        assert_eq!(tree.node(root).children.len(), before - 1);
    }

    #[test]
    fn test_pseudo_illegal_child_is_pruned() {
        let config = SearchConfig::for_testing();
        let mut search = search_on(2, config);
        let mut board = GridBoard::new(2);
        for v in Vertex::all(2) {
            board.pseudo_illegal.insert(v);
        }
        search.sync_root(&board);

        let outcome = search.playout(&board, &mut rng());
        assert_eq!(outcome, PlayoutOutcome::Aborted);
        assert!(
            (search.tree().node(search.tree().act_root()).stat.update_count() - 1.0).abs() < 1e-6
        );
    }

    #[test]
    fn test_two_root_passes_score_by_territory() {
        let config = SearchConfig::for_testing();
        let mut search = search_on(2, config);
        let mut board = GridBoard::new(2);
        board.winner = Some(Player::White);
        // Only pass is legal, so the tree phase plays pass, pass
        for v in Vertex::all(2) {
            board.illegal.insert(v);
        }
        search.sync_root(&board);

        // Early playouts end in the rollout; once the pass child matures
        // the double pass happens inside the tree and is scored by the
        // terminal territory counter. Every one is a loss for Black.
        for _ in 0..5 {
            let outcome = search.playout(&board, &mut rng());
            assert_eq!(outcome, PlayoutOutcome::Scored(-1.0));
        }
        let tree = search.tree();
        let root = tree.act_root();
        let pass_child = tree
            .find_child(root, Move::new(Player::Black, Vertex::PASS))
            .unwrap();
        // The pass child did get expanded for the reply
        assert!(tree.node(pass_child).has_all_legal_children(Player::White));
    }

    #[test]
    fn test_zero_tree_max_moves_is_rollout_only() {
        let config = SearchConfig::for_testing().with_tree_max_moves(0);
        let mut search = search_on(2, config);
        let board = GridBoard::new(2);
        search.sync_root(&board);

        search.playout(&board, &mut rng());

        let tree = search.tree();
        let root = tree.act_root();
        assert!((tree.node(root).stat.update_count() - 2.0).abs() < 1e-6);
        // No child was descended into
        for &c in &tree.node(root).children {
            assert!(tree.node(c).stat.update_count() <= 1.0);
        }
    }

    #[test]
    fn test_rave_credits_first_toucher_only() {
        let mut config = SearchConfig::for_testing();
        config.rave_update_fraction = 1.0;
        let mut search = search_on(3, config.clone());
        let board = GridBoard::new(3);
        search.sync_root(&board);

        let root = search.tree.act_root();
        // Children for both players so the mask can be checked both ways
        let empty = GridBoard::new(3);
        search
            .tree
            .ensure_expanded(root, Player::White, &empty, &StubSampler, &config);

        let v5 = Vertex::of_coords(1, 2);
        let v2 = Vertex::of_coords(0, 2);
        search.trace = vec![root];
        search.move_history = vec![
            search.tree.node(root).game_move(),
            Move::new(Player::Black, v5),
            Move::new(Player::White, v2),
            Move::new(Player::White, v5),
            Move::new(Player::Black, Vertex::PASS),
        ];
        search.update_trace_rave(1.0);

        let tree = &search.tree;
        let rave_count = |player, vertex| {
            let id = tree.find_child(root, Move::new(player, vertex)).unwrap();
            tree.node(id).rave_stat.update_count()
        };
        // v5 was first touched by Black: only Black's child is credited
        assert!((rave_count(Player::Black, v5) - 2.0).abs() < 1e-6);
        assert!((rave_count(Player::White, v5) - 1.0).abs() < 1e-6);
        // v2 was first touched by White
        assert!((rave_count(Player::White, v2) - 2.0).abs() < 1e-6);
        assert!((rave_count(Player::Black, v2) - 1.0).abs() < 1e-6);
        // Pass earns no credit
        let pass_id = tree
            .find_child(root, Move::new(Player::Black, Vertex::PASS))
            .unwrap();
        assert!((tree.node(pass_id).rave_stat.update_count() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rave_window_fraction_limits_credit() {
        let mut config = SearchConfig::for_testing();
        config.rave_update_fraction = 0.4;
        let mut search = search_on(3, config);
        let board = GridBoard::new(3);
        search.sync_root(&board);

        let root = search.tree.act_root();
        let early = Vertex::of_coords(0, 0);
        let late = Vertex::of_coords(2, 2);
        search.trace = vec![root];
        // Five entries, window ends at floor(5 * 0.4) = 2: only index 1
        search.move_history = vec![
            search.tree.node(root).game_move(),
            Move::new(Player::Black, early),
            Move::new(Player::White, Vertex::of_coords(1, 1)),
            Move::new(Player::Black, late),
            Move::new(Player::White, Vertex::PASS),
        ];
        search.update_trace_rave(-1.0);

        let tree = &search.tree;
        let in_window = tree
            .find_child(root, Move::new(Player::Black, early))
            .unwrap();
        let out_of_window = tree
            .find_child(root, Move::new(Player::Black, late))
            .unwrap();
        assert!((tree.node(in_window).rave_stat.update_count() - 2.0).abs() < 1e-6);
        assert!((tree.node(out_of_window).rave_stat.update_count() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_final_move_is_robust_max_not_argmax_mean() {
        let config = SearchConfig::for_testing().with_playouts(0);
        let mut search = search_on(2, config);
        let mut board = GridBoard::new(2);
        search.sync_root(&board);

        let root = search.tree.act_root();
        let a = search.tree.node(root).children[0];
        let b = search.tree.node(root).children[1];
        let a_vertex = search.tree.node(a).vertex;
        // A: heavily visited, decent mean. B: barely visited, great mean.
        search.tree.node_mut(a).stat.reset(10_000.0, 0.55);
        search.tree.node_mut(b).stat.reset(20.0, 0.90);

        assert_eq!(search.tree.most_explored_child(root, Player::Black), Some(a));

        let vertex = search.genmove(&mut board, Player::Black, &mut rng());
        assert_eq!(vertex, a_vertex);
        assert_eq!(board.moves()[0].vertex, a_vertex);
    }
}
