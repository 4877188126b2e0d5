//! Core vocabulary and contracts for the Go engine
//!
//! This crate provides the types shared by every component:
//! - `Player`, `Vertex`, `Move`: the game vocabulary
//! - `Board`: the contract a playable board implementation must satisfy
//! - `Sampler`: the contract of the random-playout policy
//!
//! The search core depends only on these contracts, never on a concrete
//! board, so boards and playout policies can be swapped independently.

pub mod board;
pub mod player;
pub mod vertex;

// Re-export main types for convenience
pub use board::{Board, PlayStatus, Sampler};
pub use player::Player;
pub use vertex::{Move, Vertex};

use thiserror::Error;

/// Error type for parsing players and vertices from protocol text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid player: {0:?}")]
    InvalidPlayer(String),
    #[error("invalid vertex: {0:?}")]
    InvalidVertex(String),
}
