//! Game state machine and its configuration.
//!
//! - [`Game`] - one game: board, falling/next piece, counters, random source
//! - [`Command`] - the input vocabulary consumed by [`Game::tick`]
//! - [`GameConfig`] / [`GameRules`] - board size, piece catalog, seed and
//!   policies, validated once and shared between games
//! - policies - pluggable speed, scoring and level rules
//!
//! # Game Flow
//!
//! 1. Validate a [`GameConfig`] into shared [`GameRules`]
//! 2. Create a [`Game`] (seeded for reproducibility)
//! 3. Feed one [`Command`] per [`Game::tick`]; gravity pulls the piece down
//!    every `speed` ticks
//! 4. A piece that cannot move down locks, full rows clear, the next piece
//!    spawns
//! 5. The game terminates when a fresh piece collides at its spawn position
//!
//! Agents look ahead with [`Game::try_moves`], which plays on an independent
//! copy and leaves the original untouched.

pub use self::{command::*, config::*, game::*, policy::*};

mod command;
mod config;
mod game;
mod policy;
