pub use self::{board::*, piece::*};

pub mod catalog;

pub(crate) mod board;
pub(crate) mod piece;
