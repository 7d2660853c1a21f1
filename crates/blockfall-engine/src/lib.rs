//! Deterministic falling-block puzzle engine.
//!
//! [`core`] holds the data structures (pieces, bordered board, catalogs) and
//! [`engine`] the tick-driven game state machine built on them. Everything is
//! re-exported at the crate root.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
