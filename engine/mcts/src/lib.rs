//! Monte Carlo tree search core for the Go engine.
//!
//! The search is built from three collaborating pieces:
//!
//! 1. [`Stat`]: a commutative accumulator of playout outcomes with a
//!    virtual prior, providing means and UCB values
//! 2. [`SearchTree`]: an arena-owned tree of [`Node`]s with an active-root
//!    pointer that follows the live game
//! 3. [`Search`]: the playout driver coupling tree descent, frontier
//!    expansion, random rollouts and backpropagation
//!
//! One playout:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Search                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌──────────────┐  ┌────────────────────┐  │
//! │  │ SearchTree  │  │ scratch      │  │     Sampler        │  │
//! │  │ (arena)     │  │ Board        │  │ (random playouts)  │  │
//! │  └──────┬──────┘  └──────┬───────┘  └─────────┬──────────┘  │
//! │         │                │                    │             │
//! │         ▼                ▼                    ▼             │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │   descend → expand → rollout → propagate along trace  │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The driver is single-threaded by design; consistency between playouts
//! is what lets an engine front end interleave analysis commands with the
//! search loop.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcts::{Search, SearchConfig};
//! use games_go::{Goban, UniformSampler};
//! use engine_core::Player;
//! use rand_chacha::ChaCha20Rng;
//! use rand::SeedableRng;
//!
//! let mut board = Goban::new(9);
//! let mut search = Search::new(SearchConfig::default(), UniformSampler::new(), Goban::new(9));
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let vertex = search.genmove(&mut board, Player::Black, &mut rng);
//! println!("engine plays {vertex}");
//! ```

pub mod config;
pub mod node;
pub mod search;
pub mod stat;
pub mod tree;

#[cfg(test)]
mod testing;

// Re-export main types
pub use config::SearchConfig;
pub use node::{Node, NodeId};
pub use search::{PlayoutOutcome, Search};
pub use stat::Stat;
pub use tree::SearchTree;
