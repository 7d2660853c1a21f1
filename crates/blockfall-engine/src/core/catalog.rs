//! Built-in piece catalogs.
//!
//! Every state matrix is square and rotation order is clockwise, so
//! [`Rotation::Right`](crate::Rotation::Right) steps to the next entry.

use std::str::FromStr;

use super::piece::{Piece, Shape};

/// Selects one of the built-in catalogs by name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum CatalogKind {
    /// The seven classic tetrominoes.
    #[default]
    #[display("classic")]
    Classic,
    /// Five pieces fitting in a 2x2 matrix.
    #[display("small")]
    Small,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown piece catalog `{name}` (expected `classic` or `small`)")]
pub struct UnknownCatalogError {
    #[error(not(source))]
    name: String,
}

impl FromStr for CatalogKind {
    type Err = UnknownCatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" => Ok(Self::Classic),
            "small" => Ok(Self::Small),
            _ => Err(UnknownCatalogError { name: s.to_owned() }),
        }
    }
}

impl CatalogKind {
    #[must_use]
    pub fn pieces(self) -> Vec<Piece> {
        match self {
            Self::Classic => classic_pieces(),
            Self::Small => small_pieces(),
        }
    }
}

fn piece<const N: usize>(name: char, value: u8, states: [[[u8; N]; N]; 4]) -> Piece {
    let states = states.map(|rows| Shape::new(rows).filled_with(value));
    Piece::new(name, states).expect("built-in piece tables are valid")
}

/// Classic tetrominoes in the order I, J, L, O, S, T, Z.
///
/// Cell values are `1..=7` in the same order so that a board snapshot tells
/// which piece each cell came from.
#[must_use]
pub fn classic_pieces() -> Vec<Piece> {
    vec![
        piece(
            'I',
            1,
            [
                [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
                [[0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0]],
                [[0, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0]],
                [[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]],
            ],
        ),
        piece(
            'J',
            2,
            [
                [[1, 0, 0], [1, 1, 1], [0, 0, 0]],
                [[0, 1, 1], [0, 1, 0], [0, 1, 0]],
                [[0, 0, 0], [1, 1, 1], [0, 0, 1]],
                [[0, 1, 0], [0, 1, 0], [1, 1, 0]],
            ],
        ),
        piece(
            'L',
            3,
            [
                [[0, 0, 1], [1, 1, 1], [0, 0, 0]],
                [[0, 1, 0], [0, 1, 0], [0, 1, 1]],
                [[0, 0, 0], [1, 1, 1], [1, 0, 0]],
                [[1, 1, 0], [0, 1, 0], [0, 1, 0]],
            ],
        ),
        piece('O', 4, [[[1, 1], [1, 1]]; 4]),
        piece(
            'S',
            5,
            [
                [[0, 1, 1], [1, 1, 0], [0, 0, 0]],
                [[0, 1, 0], [0, 1, 1], [0, 0, 1]],
                [[0, 0, 0], [0, 1, 1], [1, 1, 0]],
                [[1, 0, 0], [1, 1, 0], [0, 1, 0]],
            ],
        ),
        piece(
            'T',
            6,
            [
                [[0, 1, 0], [1, 1, 1], [0, 0, 0]],
                [[0, 1, 0], [0, 1, 1], [0, 1, 0]],
                [[1, 1, 1], [0, 1, 0], [0, 0, 0]],
                [[0, 1, 0], [1, 1, 0], [0, 1, 0]],
            ],
        ),
        piece(
            'Z',
            7,
            [
                [[1, 1, 0], [0, 1, 1], [0, 0, 0]],
                [[0, 0, 1], [0, 1, 1], [0, 1, 0]],
                [[0, 0, 0], [1, 1, 0], [0, 1, 1]],
                [[0, 1, 0], [1, 1, 0], [1, 0, 0]],
            ],
        ),
    ]
}

/// Small pieces: dot, diagonal, small L, small I and small O.
#[must_use]
pub fn small_pieces() -> Vec<Piece> {
    vec![
        piece(
            '.',
            1,
            [
                [[0, 1], [0, 0]],
                [[0, 0], [0, 1]],
                [[0, 0], [1, 0]],
                [[1, 0], [0, 0]],
            ],
        ),
        piece(
            '/',
            2,
            [
                [[0, 1], [1, 0]],
                [[1, 0], [0, 1]],
                [[0, 1], [1, 0]],
                [[1, 0], [0, 1]],
            ],
        ),
        piece(
            'l',
            3,
            [
                [[0, 1], [1, 1]],
                [[1, 0], [1, 1]],
                [[1, 1], [1, 0]],
                [[1, 1], [0, 1]],
            ],
        ),
        piece(
            'i',
            4,
            [
                [[1, 1], [0, 0]],
                [[0, 1], [0, 1]],
                [[0, 0], [1, 1]],
                [[1, 0], [1, 0]],
            ],
        ),
        piece('o', 5, [[[1, 1], [1, 1]]; 4]),
    ]
}
