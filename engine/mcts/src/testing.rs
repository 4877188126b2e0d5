//! Scriptable board and sampler used by the unit tests.
//!
//! `GridBoard` is a deliberately dumb board: stones never capture, every
//! empty point is legal unless a test scripts otherwise, and the winner is
//! whatever the test says it is. That makes every search behaviour
//! reproducible without real game dynamics.

use engine_core::{Board, Move, Player, PlayStatus, Sampler, Vertex};
use rand_chacha::ChaCha20Rng;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub(crate) struct GridBoard {
    pub size: usize,
    pub stones: Vec<Option<Player>>,
    pub act_player: Player,
    pub moves: Vec<Move>,
    pub last_status: PlayStatus,
    /// Vertices `is_legal` rejects.
    pub illegal: HashSet<Vertex>,
    /// Vertices `is_really_legal` rejects (scripted superko).
    pub really_illegal: HashSet<Vertex>,
    /// Vertices `is_pseudo_legal` rejects.
    pub pseudo_illegal: HashSet<Vertex>,
    /// Vertices where `play_legal` reports failure.
    pub fail_on_play: HashSet<Vertex>,
    /// Forced winner for both scoring queries.
    pub winner: Option<Player>,
}

impl GridBoard {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            stones: vec![None; size * size],
            act_player: Player::Black,
            moves: Vec::new(),
            last_status: PlayStatus::Ok,
            illegal: HashSet::new(),
            really_illegal: HashSet::new(),
            pseudo_illegal: HashSet::new(),
            fail_on_play: HashSet::new(),
            winner: None,
        }
    }

    fn index(&self, v: Vertex) -> usize {
        v.row() * self.size + v.col()
    }
}

impl Board for GridBoard {
    fn size(&self) -> usize {
        self.size
    }

    fn clear(&mut self) {
        // Scripted legality and the forced winner survive a clear
        self.stones = vec![None; self.size * self.size];
        self.act_player = Player::Black;
        self.moves.clear();
        self.last_status = PlayStatus::Ok;
    }

    fn load_from(&mut self, other: &Self) {
        *self = other.clone();
    }

    fn act_player(&self) -> Player {
        self.act_player
    }

    fn set_act_player(&mut self, player: Player) {
        self.act_player = player;
    }

    fn is_legal(&self, _player: Player, vertex: Vertex) -> bool {
        if vertex == Vertex::PASS {
            return true;
        }
        vertex.is_on_board()
            && self.stones[self.index(vertex)].is_none()
            && !self.illegal.contains(&vertex)
    }

    fn is_really_legal(&self, m: Move) -> bool {
        if m.vertex == Vertex::PASS {
            return true;
        }
        !self.really_illegal.contains(&m.vertex) && self.is_legal(m.player, m.vertex)
    }

    fn is_pseudo_legal(&self, _player: Player, vertex: Vertex) -> bool {
        if vertex == Vertex::PASS {
            return true;
        }
        vertex.is_on_board()
            && self.stones[self.index(vertex)].is_none()
            && !self.pseudo_illegal.contains(&vertex)
    }

    fn play_legal(&mut self, m: Move) {
        if m.vertex != Vertex::PASS {
            if self.fail_on_play.contains(&m.vertex) {
                self.last_status = PlayStatus::Suicide;
                return;
            }
            if self.stones[self.index(m.vertex)].is_some() {
                self.last_status = PlayStatus::Occupied;
                return;
            }
            let idx = self.index(m.vertex);
            self.stones[idx] = Some(m.player);
        }
        self.moves.push(m);
        self.act_player = m.player.other();
        self.last_status = PlayStatus::Ok;
    }

    fn last_move_status(&self) -> PlayStatus {
        self.last_status
    }

    fn both_player_pass(&self) -> bool {
        let n = self.moves.len();
        n >= 2
            && self.moves[n - 1].vertex == Vertex::PASS
            && self.moves[n - 2].vertex == Vertex::PASS
    }

    fn tt_winner(&self) -> Player {
        self.winner.unwrap_or(Player::Black)
    }

    fn playout_winner(&self) -> Player {
        self.winner.unwrap_or(Player::Black)
    }

    fn moves(&self) -> &[Move] {
        &self.moves
    }

    fn empty_vertices(&self) -> Vec<Vertex> {
        Vertex::all(self.size)
            .filter(|&v| self.stones[self.index(v)].is_none())
            .collect()
    }
}

/// Sampler that ends playouts by passing twice and rates every move 0.5.
#[derive(Debug, Clone, Default)]
pub(crate) struct StubSampler;

impl Sampler<GridBoard> for StubSampler {
    fn new_playout(&mut self, _board: &GridBoard) {}

    fn move_played(&mut self, _board: &GridBoard) {}

    fn probability(&self, _board: &GridBoard, _player: Player, _vertex: Vertex) -> f32 {
        0.5
    }

    fn run(&mut self, board: &mut GridBoard, _rng: &mut ChaCha20Rng) {
        while !board.both_player_pass() {
            let pl = board.act_player();
            board.play_legal(Move::new(pl, Vertex::PASS));
        }
    }
}
