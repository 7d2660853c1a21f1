use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Player or agent input consumed by [`Game::tick`](crate::Game::tick).
///
/// `Store` is part of the vocabulary but has no effect: holding a piece is not
/// implemented.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    #[display("nothing")]
    Nothing,
    #[display("left")]
    Left,
    #[display("right")]
    Right,
    #[display("rotate_left")]
    RotateLeft,
    #[display("rotate_right")]
    RotateRight,
    #[display("down")]
    Down,
    #[display("store")]
    Store,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidCommandError {
    #[display("command code {_0} is out of range (0..=6)")]
    Code(#[error(not(source))] u8),
    #[display("unknown command `{_0}`")]
    Name(#[error(not(source))] String),
}

impl Command {
    /// Every command, ordered by numeric code.
    pub const ALL: [Self; 7] = [
        Self::Nothing,
        Self::Left,
        Self::Right,
        Self::RotateLeft,
        Self::RotateRight,
        Self::Down,
        Self::Store,
    ];

    /// Numeric code of this command, the inverse of `TryFrom<u8>`.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = InvalidCommandError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(InvalidCommandError::Code(code))
    }
}

impl FromStr for Command {
    type Err = InvalidCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidCommandError::Name(s.to_owned()))
    }
}
