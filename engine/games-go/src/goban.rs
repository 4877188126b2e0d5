//! The board: stones, captures, ko and scoring.
//!
//! Cells hold `0` (empty), `+1` (Black) or `-1` (White). Whole-board
//! positions are Zobrist-hashed and the hash of every position ever on the
//! board is kept, which makes positional superko a membership test. The
//! simple-ko point is tracked separately as a cheap precheck.

use engine_core::{Board, Move, Player, PlayStatus, Vertex};
use once_cell::sync::Lazy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::fmt;

/// Orthogonal neighbor offsets.
const NEIGHBORS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Column letters used when rendering; `I` is skipped.
const COLUMN_LETTERS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// One Zobrist key per (vertex, player) pair, fixed across runs.
static ZOBRIST: Lazy<Vec<u64>> = Lazy::new(|| {
    let mut rng = ChaCha20Rng::seed_from_u64(0x60BA_9E15);
    (0..Vertex::TABLE_SIZE * 2).map(|_| rng.gen()).collect()
});

#[inline]
fn zobrist(vertex: Vertex, player: Player) -> u64 {
    ZOBRIST[vertex.table_index() * 2 + player.index()]
}

#[inline]
fn stone(player: Player) -> i8 {
    match player {
        Player::Black => 1,
        Player::White => -1,
    }
}

/// A playable Go board.
#[derive(Debug, Clone)]
pub struct Goban {
    size: usize,
    cells: Vec<i8>,
    act_player: Player,
    ko_point: Option<Vertex>,
    moves: Vec<Move>,
    hash: u64,
    hash_history: Vec<u64>,
    komi: f32,
    last_status: PlayStatus,
}

impl Goban {
    /// Create an empty board of the given dimension.
    pub fn new(size: usize) -> Self {
        assert!(size >= 2 && size <= Vertex::MAX_SIZE);
        Self {
            size,
            cells: vec![0; size * size],
            act_player: Player::Black,
            ko_point: None,
            moves: Vec::new(),
            hash: 0,
            hash_history: vec![0],
            komi: 7.5,
            last_status: PlayStatus::Ok,
        }
    }

    /// Builder pattern: set the komi.
    pub fn with_komi(mut self, komi: f32) -> Self {
        self.komi = komi;
        self
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    pub fn set_komi(&mut self, komi: f32) {
        self.komi = komi;
    }

    /// The stone at a vertex, if any.
    pub fn stone_at(&self, vertex: Vertex) -> Option<Player> {
        match self.cells[self.index(vertex)] {
            1 => Some(Player::Black),
            -1 => Some(Player::White),
            _ => None,
        }
    }

    #[inline]
    fn index(&self, vertex: Vertex) -> usize {
        vertex.row() * self.size + vertex.col()
    }

    #[inline]
    fn vertex_at(&self, idx: usize) -> Vertex {
        Vertex::of_coords(idx / self.size, idx % self.size)
    }

    #[inline]
    fn on_board(&self, vertex: Vertex) -> bool {
        vertex.is_on_board() && vertex.row() < self.size && vertex.col() < self.size
    }

    fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let size = self.size;
        let row = (idx / size) as i32;
        let col = (idx % size) as i32;
        NEIGHBORS.iter().filter_map(move |&(dr, dc)| {
            let r = row + dr;
            let c = col + dc;
            if r >= 0 && c >= 0 && (r as usize) < size && (c as usize) < size {
                Some(r as usize * size + c as usize)
            } else {
                None
            }
        })
    }

    /// Flood-fill the group containing `start` into `group`, marking
    /// `visited` along the way.
    fn collect_group(&self, cells: &[i8], start: usize, group: &mut Vec<usize>, visited: &mut [bool]) {
        group.clear();
        let color = cells[start];
        if color == 0 {
            return;
        }
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(idx) = stack.pop() {
            group.push(idx);
            for n in self.neighbors(idx) {
                if !visited[n] && cells[n] == color {
                    visited[n] = true;
                    stack.push(n);
                }
            }
        }
    }

    fn group_has_liberty(&self, cells: &[i8], group: &[usize]) -> bool {
        group
            .iter()
            .any(|&idx| self.neighbors(idx).any(|n| cells[n] == 0))
    }

    fn count_liberties(&self, cells: &[i8], group: &[usize]) -> usize {
        let mut seen = vec![false; cells.len()];
        let mut count = 0;
        for &idx in group {
            for n in self.neighbors(idx) {
                if cells[n] == 0 && !seen[n] {
                    seen[n] = true;
                    count += 1;
                }
            }
        }
        count
    }

    /// Place a stone on `cells`, removing captures. Returns the resulting
    /// position hash and the captured indices, or `None` for suicide.
    fn place(&self, cells: &mut [i8], mut hash: u64, player: Player, idx: usize) -> Option<(u64, Vec<usize>)> {
        let own = stone(player);
        cells[idx] = own;
        hash ^= zobrist(self.vertex_at(idx), player);

        let mut captured = Vec::new();
        let mut visited = vec![false; cells.len()];
        let mut group = Vec::with_capacity(16);
        let neighbors: Vec<usize> = self.neighbors(idx).collect();
        for &n in &neighbors {
            if cells[n] == -own && !visited[n] {
                self.collect_group(cells, n, &mut group, &mut visited);
                if !self.group_has_liberty(cells, &group) {
                    for &g in &group {
                        cells[g] = 0;
                        hash ^= zobrist(self.vertex_at(g), player.other());
                        captured.push(g);
                    }
                }
            }
        }

        // Suicide check on the placed stone's own group
        visited.fill(false);
        self.collect_group(cells, idx, &mut group, &mut visited);
        if !self.group_has_liberty(cells, &group) {
            return None;
        }
        Some((hash, captured))
    }

    /// True when every orthogonal neighbor is an own stone. Playout
    /// policies refuse such points so random games terminate.
    pub fn is_eye_like(&self, player: Player, vertex: Vertex) -> bool {
        if !self.on_board(vertex) || self.cells[self.index(vertex)] != 0 {
            return false;
        }
        let own = stone(player);
        self.neighbors(self.index(vertex)).all(|n| self.cells[n] == own)
    }

    /// Area score from Black's perspective: stones plus exclusive
    /// territory, komi subtracted.
    pub fn score(&self) -> f32 {
        let mut black = 0.0f32;
        let mut white = self.komi;
        let mut visited = vec![false; self.cells.len()];

        for idx in 0..self.cells.len() {
            if visited[idx] {
                continue;
            }
            match self.cells[idx] {
                1 => black += 1.0,
                -1 => white += 1.0,
                _ => {
                    let (count, borders_black, borders_white) =
                        self.territory_region(idx, &mut visited);
                    if borders_black && !borders_white {
                        black += count as f32;
                    } else if borders_white && !borders_black {
                        white += count as f32;
                    }
                }
            }
        }
        black - white
    }

    /// Flood-fill an empty region, reporting its size and bordering colors.
    fn territory_region(&self, start: usize, visited: &mut [bool]) -> (usize, bool, bool) {
        let mut count = 0;
        let mut borders_black = false;
        let mut borders_white = false;
        let mut stack = vec![start];
        visited[start] = true;

        while let Some(idx) = stack.pop() {
            count += 1;
            for n in self.neighbors(idx) {
                match self.cells[n] {
                    1 => borders_black = true,
                    -1 => borders_white = true,
                    _ => {
                        if !visited[n] {
                            visited[n] = true;
                            stack.push(n);
                        }
                    }
                }
            }
        }
        (count, borders_black, borders_white)
    }

    fn winner_by_score(&self) -> Player {
        if self.score() > 0.0 {
            Player::Black
        } else {
            Player::White
        }
    }
}

impl Board for Goban {
    fn size(&self) -> usize {
        self.size
    }

    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = 0);
        self.act_player = Player::Black;
        self.ko_point = None;
        self.moves.clear();
        self.hash = 0;
        self.hash_history.clear();
        self.hash_history.push(0);
        self.last_status = PlayStatus::Ok;
    }

    fn load_from(&mut self, other: &Self) {
        self.clone_from(other);
    }

    fn act_player(&self) -> Player {
        self.act_player
    }

    fn set_act_player(&mut self, player: Player) {
        self.act_player = player;
    }

    fn is_legal(&self, player: Player, vertex: Vertex) -> bool {
        if vertex == Vertex::PASS {
            return true;
        }
        if !self.on_board(vertex) || self.cells[self.index(vertex)] != 0 {
            return false;
        }
        if self.ko_point == Some(vertex) {
            return false;
        }
        let mut cells = self.cells.clone();
        match self.place(&mut cells, self.hash, player, self.index(vertex)) {
            None => false,
            Some((hash, _)) => !self.hash_history.contains(&hash),
        }
    }

    fn is_really_legal(&self, m: Move) -> bool {
        m.vertex == Vertex::PASS || self.is_legal(m.player, m.vertex)
    }

    fn is_pseudo_legal(&self, _player: Player, vertex: Vertex) -> bool {
        if vertex == Vertex::PASS {
            return true;
        }
        self.on_board(vertex)
            && self.cells[self.index(vertex)] == 0
            && self.ko_point != Some(vertex)
    }

    fn play_legal(&mut self, m: Move) {
        if m.vertex == Vertex::PASS {
            self.ko_point = None;
            self.moves.push(m);
            self.hash_history.push(self.hash);
            self.act_player = m.player.other();
            self.last_status = PlayStatus::Ok;
            return;
        }
        if !self.on_board(m.vertex) || self.cells[self.index(m.vertex)] != 0 {
            self.last_status = PlayStatus::Occupied;
            return;
        }
        if self.ko_point == Some(m.vertex) {
            self.last_status = PlayStatus::Ko;
            return;
        }

        let idx = self.index(m.vertex);
        let mut cells = self.cells.clone();
        let (hash, captured) = match self.place(&mut cells, self.hash, m.player, idx) {
            Some(result) => result,
            None => {
                self.last_status = PlayStatus::Suicide;
                return;
            }
        };
        if self.hash_history.contains(&hash) {
            self.last_status = PlayStatus::Superko;
            return;
        }

        // Simple ko: a single capture by a lone stone that itself has
        // exactly one liberty
        self.ko_point = None;
        if captured.len() == 1 {
            let mut visited = vec![false; cells.len()];
            let mut group = Vec::with_capacity(4);
            self.collect_group(&cells, idx, &mut group, &mut visited);
            if group.len() == 1 && self.count_liberties(&cells, &group) == 1 {
                self.ko_point = Some(self.vertex_at(captured[0]));
            }
        }

        self.cells = cells;
        self.hash = hash;
        self.hash_history.push(hash);
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
        self.winner_by_score()
    }

    fn playout_winner(&self) -> Player {
        self.winner_by_score()
    }

    fn moves(&self) -> &[Move] {
        &self.moves
    }

    fn empty_vertices(&self) -> Vec<Vertex> {
        Vertex::all(self.size)
            .filter(|&v| self.cells[self.index(v)] == 0)
            .collect()
    }
}

impl fmt::Display for Goban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..self.size {
            write!(f, " {}", COLUMN_LETTERS[col] as char)?;
        }
        writeln!(f)?;
        for row in (0..self.size).rev() {
            write!(f, "{:2}", row + 1)?;
            for col in 0..self.size {
                let c = match self.cells[row * self.size + col] {
                    1 => 'X',
                    -1 => 'O',
                    _ => '.',
                };
                write!(f, " {c}")?;
            }
            writeln!(f, " {:2}", row + 1)?;
        }
        write!(f, "  ")?;
        for col in 0..self.size {
            write!(f, " {}", COLUMN_LETTERS[col] as char)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{} to play, komi {}",
            match self.act_player {
                Player::Black => "Black",
                Player::White => "White",
            },
            self.komi
        )
    }
}
