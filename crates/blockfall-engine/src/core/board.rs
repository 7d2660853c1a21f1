use std::fmt;

use serde::{Deserialize, Serialize};

use super::piece::Shape;

/// Cell value of an empty cell.
pub const EMPTY: u8 = 0;

/// Cell value of the permanent border.
pub const WALL: u8 = u8::MAX;

/// Reference point of a shape matrix on the board.
///
/// Coordinates are in board space, which includes the one-cell left wall:
/// `x = 1` is the first playable column and `y = 0` is the top row. `x` may be
/// negative when the shape matrix has empty leading columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn left(self) -> Self {
        Self::new(self.x - 1, self.y)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        Self::new(self.x + 1, self.y)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.x, self.y + 1)
    }
}

/// Bordered playing field stored as a flat row-major buffer.
///
/// # Layout
///
/// A `width`×`height` playable area is surrounded by a one-cell [`WALL`] on the
/// left, right and bottom. The top is open so pieces can spawn.
///
/// ```text
/// W . . . . W
/// W . . . . W
/// W . . . . W
/// W W W W W W
/// ```
///
/// Collision checks never test bounds explicitly on the sides or the bottom:
/// any piece cell that would overlap the border overlaps a non-zero wall cell.
/// The border is never written by [`Board::lock`] nor moved by
/// [`Board::clear_lines`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {}x{}", self.width, self.height)?;
        for row in self.cells.chunks(self.total_width()) {
            for cell in row {
                let c = match *cell {
                    EMPTY => '.',
                    WALL => '#',
                    _ => 'o',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Board {
    /// Creates an empty board with the given playable dimensions.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let total_width = width + 2;
        let mut cells = Vec::with_capacity(total_width * (height + 1));
        for _ in 0..height {
            cells.extend(empty_row(total_width));
        }
        cells.extend(std::iter::repeat_n(WALL, total_width));
        Self {
            width,
            height,
            cells,
        }
    }

    /// Number of playable columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of playable rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns including both side walls.
    #[must_use]
    pub fn total_width(&self) -> usize {
        self.width + 2
    }

    /// Number of rows including the bottom wall.
    #[must_use]
    pub fn total_height(&self) -> usize {
        self.height + 1
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.total_width() && y < self.total_height()).then(|| y * self.total_width() + x)
    }

    /// Returns the cell at board coordinates, or `None` outside the buffer.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Returns the cell at playable coordinates (`row` 0 is the top row).
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the playable area.
    #[must_use]
    pub fn playable_cell(&self, row: usize, col: usize) -> u8 {
        assert!(row < self.height && col < self.width);
        self.cells[row * self.total_width() + col + 1]
    }

    /// Iterates the playable rows (walls stripped), top to bottom.
    pub fn playable_rows(&self) -> impl Iterator<Item = &[u8]> {
        let width = self.width;
        self.cells
            .chunks(self.total_width())
            .take(self.height)
            .map(move |row| &row[1..=width])
    }

    /// Iterates every row including walls, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.total_width())
    }

    /// Number of occupied playable cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.playable_rows()
            .flatten()
            .filter(|cell| **cell != EMPTY)
            .count()
    }

    /// Returns `true` when the shape placed at `position` overlaps an occupied
    /// cell or leaves the board.
    ///
    /// This is equivalent to the element-wise product of the shape and the
    /// overlapped board region not being all zero.
    #[must_use]
    pub fn is_colliding(&self, shape: &Shape, position: Position) -> bool {
        shape.occupied_cells().any(|(row, col, _)| {
            let (x, y) = offset(position, row, col);
            self.cell(x, y).is_none_or(|cell| cell != EMPTY)
        })
    }

    /// Writes the shape's cells permanently into the board.
    pub fn lock(&mut self, shape: &Shape, position: Position) {
        for (row, col, value) in shape.occupied_cells() {
            let (x, y) = offset(position, row, col);
            let Some(index) = self.index(x, y) else {
                debug_assert!(false, "locking a cell outside the board at ({x}, {y})");
                continue;
            };
            debug_assert_ne!(self.cells[index], WALL, "locking over the border");
            self.cells[index] = value;
        }
    }

    /// Returns a copy with the shape drawn in, without touching `self`.
    #[must_use]
    pub fn with_overlay(&self, shape: &Shape, position: Position) -> Self {
        let mut board = self.clone();
        for (row, col, value) in shape.occupied_cells() {
            let (x, y) = offset(position, row, col);
            if let Some(index) = board.index(x, y) {
                board.cells[index] = value;
            }
        }
        board
    }

    /// Removes complete rows and compacts the rest downward, preserving order.
    ///
    /// A row is complete when every cell, both side walls included, is
    /// non-zero. The bottom wall row is never considered. Returns the number
    /// of removed rows; that many empty rows appear at the top.
    pub fn clear_lines(&mut self) -> usize {
        let total_width = self.total_width();
        let mut write = self.height;
        for read in (0..self.height).rev() {
            let range = read * total_width..(read + 1) * total_width;
            if self.cells[range.clone()].iter().all(|cell| *cell != EMPTY) {
                continue;
            }
            write -= 1;
            if write != read {
                self.cells.copy_within(range, write * total_width);
            }
        }
        for y in 0..write {
            let row = &mut self.cells[y * total_width..(y + 1) * total_width];
            for (dst, src) in row.iter_mut().zip(empty_row(total_width)) {
                *dst = src;
            }
        }
        write
    }
}

fn offset(position: Position, row: usize, col: usize) -> (i32, i32) {
    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    let (dx, dy) = (col as i32, row as i32);
    (position.x + dx, position.y + dy)
}

fn empty_row(total_width: usize) -> impl Iterator<Item = u8> {
    (0..total_width).map(move |x| {
        if x == 0 || x + 1 == total_width {
            WALL
        } else {
            EMPTY
        }
    })
}
