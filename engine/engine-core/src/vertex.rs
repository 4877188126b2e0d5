//! Board coordinates and moves.
//!
//! A `Vertex` packs a `(row, col)` pair into a `u16` so it is independent of
//! any particular board size, with three sentinel values: `PASS`, `ANY`
//! ("unset", used by the search-tree root) and `RESIGN` (returned by the
//! engine instead of a vertex). Rows count from 1 at the bottom of the
//! board; column letters skip `I` per Go convention.

use crate::{ParseError, Player};
use std::fmt;
use std::str::FromStr;

/// Column letters in protocol order. `I` is skipped.
const COLUMN_LETTERS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// A board point or one of the sentinel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vertex(u16);

impl Vertex {
    /// The pass move.
    pub const PASS: Vertex = Vertex(0xFFFD);
    /// Sentinel for "no vertex set" (the tree root).
    pub const ANY: Vertex = Vertex(0xFFFE);
    /// Sentinel returned by the engine when it resigns.
    pub const RESIGN: Vertex = Vertex(0xFFFF);

    /// Largest supported board dimension.
    pub const MAX_SIZE: usize = 25;

    /// Create a vertex from zero-based board coordinates.
    pub fn of_coords(row: usize, col: usize) -> Vertex {
        debug_assert!(row < Self::MAX_SIZE && col < Self::MAX_SIZE);
        Vertex(((row as u16) << 5) | col as u16)
    }

    /// Zero-based row (0 is the bottom edge). Only valid for board points.
    #[inline]
    pub fn row(self) -> usize {
        (self.0 >> 5) as usize
    }

    /// Zero-based column. Only valid for board points.
    #[inline]
    pub fn col(self) -> usize {
        (self.0 & 0x1F) as usize
    }

    /// True for an actual board point (not a sentinel).
    #[inline]
    pub fn is_on_board(self) -> bool {
        self.0 < 0xFFFD
    }

    /// Dense index usable for per-vertex tables. Sentinels excluded.
    #[inline]
    pub fn table_index(self) -> usize {
        debug_assert!(self.is_on_board());
        self.0 as usize
    }

    /// Number of slots a per-vertex table needs to cover every board point.
    pub const TABLE_SIZE: usize = Self::MAX_SIZE << 5;

    /// Enumerate every point of a `size` x `size` board, row by row.
    pub fn all(size: usize) -> impl Iterator<Item = Vertex> {
        (0..size).flat_map(move |row| (0..size).map(move |col| Vertex::of_coords(row, col)))
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Vertex::PASS => write!(f, "pass"),
            Vertex::ANY => write!(f, "any"),
            Vertex::RESIGN => write!(f, "resign"),
            v => write!(
                f,
                "{}{}",
                COLUMN_LETTERS[v.col()] as char,
                v.row() + 1
            ),
        }
    }
}

impl FromStr for Vertex {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "pass" => return Ok(Vertex::PASS),
            "resign" => return Ok(Vertex::RESIGN),
            _ => {}
        }
        let bytes = lower.as_bytes();
        if bytes.len() < 2 {
            return Err(ParseError::InvalidVertex(s.to_string()));
        }
        let col_letter = bytes[0].to_ascii_uppercase();
        let col = COLUMN_LETTERS
            .iter()
            .position(|&c| c == col_letter)
            .ok_or_else(|| ParseError::InvalidVertex(s.to_string()))?;
        let row: usize = lower[1..]
            .parse::<usize>()
            .ok()
            .filter(|&r| r >= 1 && r <= Vertex::MAX_SIZE)
            .ok_or_else(|| ParseError::InvalidVertex(s.to_string()))?;
        if col >= Vertex::MAX_SIZE {
            return Err(ParseError::InvalidVertex(s.to_string()));
        }
        Ok(Vertex::of_coords(row - 1, col))
    }
}

/// A player/vertex pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub player: Player,
    pub vertex: Vertex,
}

impl Move {
    pub fn new(player: Player, vertex: Vertex) -> Move {
        Move { player, vertex }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.player, self.vertex)
    }
}
