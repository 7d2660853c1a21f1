//! Precomputed command sequences tried by the search agent.
//!
//! Each sequence first rotates the piece (0, 1 or 2 quarter turns in either
//! direction) and then shifts it a number of columns in one direction, all
//! while the piece is still at the top of the board. The catalog therefore
//! approximates "every placement reachable without moving down first" rather
//! than searching real drop paths.

use blockfall_engine::Command;

const ROTATIONS: [&[Command]; 4] = [
    &[],
    &[Command::RotateLeft],
    &[Command::RotateRight],
    &[Command::RotateLeft, Command::RotateLeft],
];

/// Ordered list of candidate command sequences for a given board width.
///
/// For every rotation prefix the list holds the bare rotation followed by
/// `1..=max_shift` shifts to the left and to the right, interleaved. No
/// sequence mixes left and right shifts.
///
/// # Example
///
/// ```
/// use blockfall_engine::Command;
/// use blockfall_evaluator::move_catalog::MoveCatalog;
///
/// let catalog = MoveCatalog::new(10);
/// assert_eq!(catalog.max_shift(), 5);
/// assert_eq!(catalog.len(), 4 * (1 + 2 * 5));
/// assert!(catalog.sequences()[0].is_empty());
/// assert_eq!(catalog.sequences()[1], [Command::Left]);
/// assert_eq!(catalog.sequences()[2], [Command::Right]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCatalog {
    max_shift: usize,
    sequences: Vec<Vec<Command>>,
}

impl MoveCatalog {
    /// Builds the catalog with shifts up to half the board width.
    #[must_use]
    pub fn new(board_width: usize) -> Self {
        Self::with_max_shift(board_width / 2)
    }

    /// Whether this catalog covers the shift range of `board_width`.
    #[must_use]
    pub fn fits(&self, board_width: usize) -> bool {
        self.max_shift == board_width / 2
    }

    #[must_use]
    pub fn with_max_shift(max_shift: usize) -> Self {
        let mut sequences = Vec::with_capacity(ROTATIONS.len() * (1 + 2 * max_shift));
        for rotation in ROTATIONS {
            sequences.push(rotation.to_vec());
            let mut left = rotation.to_vec();
            let mut right = rotation.to_vec();
            for _ in 0..max_shift {
                left.push(Command::Left);
                right.push(Command::Right);
                sequences.push(left.clone());
                sequences.push(right.clone());
            }
        }
        Self {
            max_shift,
            sequences,
        }
    }

    #[must_use]
    pub fn max_shift(&self) -> usize {
        self.max_shift
    }

    #[must_use]
    pub fn sequences(&self) -> &[Vec<Command>] {
        &self.sequences
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sequence_mixes_directions() {
        let catalog = MoveCatalog::new(10);
        for seq in catalog.sequences() {
            let has_left = seq.contains(&Command::Left);
            let has_right = seq.contains(&Command::Right);
            assert!(!(has_left && has_right), "{seq:?}");
            let shifts = seq
                .iter()
                .filter(|c| matches!(c, Command::Left | Command::Right))
                .count();
            assert!(shifts <= 5);
        }
    }

    #[test]
    fn test_rotation_prefixes() {
        let catalog = MoveCatalog::with_max_shift(1);
        assert_eq!(
            catalog.sequences(),
            [
                vec![],
                vec![Command::Left],
                vec![Command::Right],
                vec![Command::RotateLeft],
                vec![Command::RotateLeft, Command::Left],
                vec![Command::RotateLeft, Command::Right],
                vec![Command::RotateRight],
                vec![Command::RotateRight, Command::Left],
                vec![Command::RotateRight, Command::Right],
                vec![Command::RotateLeft, Command::RotateLeft],
                vec![Command::RotateLeft, Command::RotateLeft, Command::Left],
                vec![Command::RotateLeft, Command::RotateLeft, Command::Right],
            ]
        );
    }

    #[test]
    fn test_sequences_are_unique() {
        let catalog = MoveCatalog::new(10);
        for (i, a) in catalog.sequences().iter().enumerate() {
            for b in &catalog.sequences()[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
