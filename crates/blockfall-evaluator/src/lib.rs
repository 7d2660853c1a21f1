//! Board evaluation and automated players for the blockfall engine.
//!
//! # Architecture
//!
//! ```text
//! Session (play a whole game)
//!     ↓ asks
//! Agent (commands for the current piece)
//!     ↓ SearchAgent tries every MoveCatalog sequence on a simulation copy
//! Candidate (resulting board + lines + score)
//!     ↓ measured by
//! Board metrics → feature vector → weighted score
//! ```
//!
//! - [`board_metrics`] - holes, column heights, aggregate height, bumpiness
//! - [`weights`] - feature order and the weight vector tuned by training
//! - [`move_catalog`] - the fixed list of rotate-then-shift sequences
//! - [`search_agent`] - greedy search over the catalog with weighted or
//!   reference selection
//! - [`agent`] - the [`Agent`](agent::Agent) trait, a random baseline and the
//!   [`AutoPlayer`](agent::AutoPlayer) that binds an agent to a live game
//! - [`session`] - playing games to completion or a piece cap

pub mod agent;
pub mod board_metrics;
pub mod move_catalog;
pub mod search_agent;
pub mod session;
pub mod weights;
