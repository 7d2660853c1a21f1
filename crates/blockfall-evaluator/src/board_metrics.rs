//! Board-quality features computed from a board's playable area.
//!
//! All functions look at locked cells only and ignore the walls. Row `0` is the
//! top row, so a column's height is the number of rows from its topmost
//! occupied cell down to the floor.

use std::iter;

use blockfall_engine::{Board, EMPTY};
use serde::{Deserialize, Serialize};

/// Height of every playable column, left to right.
///
/// An empty column has height `0`.
#[must_use]
pub fn column_heights(board: &Board) -> Vec<usize> {
    let height = board.height();
    let mut heights = vec![0; board.width()];
    for (y, row) in board.playable_rows().enumerate() {
        for (h, cell) in iter::zip(&mut heights, row) {
            if *h == 0 && *cell != EMPTY {
                *h = height - y;
            }
        }
    }
    heights
}

/// Number of empty cells that have at least one occupied cell above them in
/// the same column.
#[must_use]
pub fn holes(board: &Board) -> usize {
    let mut covered = vec![false; board.width()];
    let mut holes = 0;
    for row in board.playable_rows() {
        for (covered, cell) in iter::zip(&mut covered, row) {
            if *cell != EMPTY {
                *covered = true;
            } else if *covered {
                holes += 1;
            }
        }
    }
    holes
}

/// Tallest column height.
#[must_use]
pub fn max_height(heights: &[usize]) -> usize {
    heights.iter().copied().max().unwrap_or(0)
}

/// Sum of all column heights.
#[must_use]
pub fn aggregate_height(heights: &[usize]) -> usize {
    heights.iter().sum()
}

/// Sum of absolute height differences between adjacent columns.
#[must_use]
pub fn bumpiness(heights: &[usize]) -> usize {
    heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum()
}

/// The four board features used by the search agent, plus the maximum height.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMetrics {
    pub holes: usize,
    pub max_height: usize,
    pub aggregate_height: usize,
    pub bumpiness: usize,
}

impl BoardMetrics {
    /// Computes every metric from the locked cells.
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::{Board, Position, Shape};
    /// use blockfall_evaluator::board_metrics::BoardMetrics;
    ///
    /// let mut board = Board::new(4, 4);
    /// board.lock(&Shape::new([[1, 0], [1, 1]]), Position::new(1, 2));
    ///
    /// let metrics = BoardMetrics::from_board(&board);
    /// assert_eq!(metrics.holes, 0);
    /// assert_eq!(metrics.max_height, 2);
    /// assert_eq!(metrics.aggregate_height, 3);
    /// assert_eq!(metrics.bumpiness, 2);
    /// ```
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let heights = column_heights(board);
        Self {
            holes: holes(board),
            max_height: max_height(&heights),
            aggregate_height: aggregate_height(&heights),
            bumpiness: bumpiness(&heights),
        }
    }
}
