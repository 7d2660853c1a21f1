use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Largest supported side length of a rotation state matrix.
pub const MAX_SHAPE_SIDE: usize = 4;

/// Largest supported number of rotation states per piece.
pub const MAX_ROTATIONS: usize = 4;

/// Direction of a quarter turn.
///
/// Rotation is a modular step over the piece's rotation states: `Right` moves
/// to the next state, `Left` to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    Left,
    Right,
}

impl Rotation {
    fn apply(self, index: usize, count: usize) -> usize {
        match self {
            Rotation::Left => (index + count - 1) % count,
            Rotation::Right => (index + 1) % count,
        }
    }
}

/// One rotation state of a piece: a square matrix of cell values.
///
/// A cell value of `0` is empty, any other value is occupied. Matrices up to
/// [`MAX_SHAPE_SIDE`]×[`MAX_SHAPE_SIDE`] are stored inline so shapes are `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    side: u8,
    cells: [[u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

impl Shape {
    /// Builds a shape from an `N`×`N` matrix.
    ///
    /// # Panics
    ///
    /// Panics if `N` exceeds [`MAX_SHAPE_SIDE`].
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::Shape;
    ///
    /// let t = Shape::new([[0, 1, 0], [1, 1, 1], [0, 0, 0]]);
    /// assert_eq!(t.side(), 3);
    /// assert_eq!(t.cell_count(), 4);
    /// ```
    #[must_use]
    pub fn new<const N: usize>(rows: [[u8; N]; N]) -> Self {
        assert!(
            N <= MAX_SHAPE_SIDE,
            "shape side {} exceeds {}",
            N,
            MAX_SHAPE_SIDE
        );
        let mut cells = [[0; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (dst, src) in cells.iter_mut().zip(&rows) {
            dst[..N].copy_from_slice(src);
        }
        #[expect(clippy::cast_possible_truncation)]
        let side = N as u8;
        Self { side, cells }
    }

    /// Returns a copy where every occupied cell holds `value`.
    #[must_use]
    pub fn filled_with(mut self, value: u8) -> Self {
        assert_ne!(value, 0, "fill value must be non-zero");
        for cell in self.cells.iter_mut().flatten() {
            if *cell != 0 {
                *cell = value;
            }
        }
        self
    }

    #[must_use]
    pub fn side(&self) -> usize {
        usize::from(self.side)
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        if row >= self.side() || col >= self.side() {
            return 0;
        }
        self.cells[row][col]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.occupied_cells().count()
    }

    /// Iterates `(row, col, value)` for every occupied cell, row-major.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        let side = self.side();
        self.cells[..side].iter().enumerate().flat_map(move |(row, cells)| {
            cells[..side]
                .iter()
                .enumerate()
                .filter(|(_, value)| **value != 0)
                .map(move |(col, value)| (row, col, *value))
        })
    }

    /// Computes the tight bounding box of the occupied cells.
    ///
    /// # Panics
    ///
    /// Panics if the shape has no occupied cell.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let mut cells = self.occupied_cells();
        let (row, col, _) = cells.next().expect("bounding box of an empty shape");
        let init = BoundingBox {
            row_min: row,
            row_max: row,
            col_min: col,
            col_max: col,
        };
        cells.fold(init, |bbox, (row, col, _)| BoundingBox {
            row_min: bbox.row_min.min(row),
            row_max: bbox.row_max.max(row),
            col_min: bbox.col_min.min(col),
            col_max: bbox.col_max.max(col),
        })
    }

    /// Returns the minimal sub-matrix containing every occupied cell.
    #[must_use]
    pub fn cropped(&self) -> CroppedShape {
        let bbox = self.bounding_box();
        let mut cells = ArrayVec::new();
        for row in bbox.row_min..=bbox.row_max {
            for col in bbox.col_min..=bbox.col_max {
                cells.push(self.cells[row][col]);
            }
        }
        CroppedShape {
            width: bbox.width(),
            cells,
        }
    }
}

/// Inclusive row/column extent of a shape's occupied cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

impl BoundingBox {
    #[must_use]
    pub fn width(&self) -> usize {
        self.col_max - self.col_min + 1
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.row_max - self.row_min + 1
    }
}

/// Bounding-box crop of a [`Shape`], used by previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedShape {
    width: usize,
    cells: ArrayVec<u8, { MAX_SHAPE_SIDE * MAX_SHAPE_SIDE }>,
}

impl CroppedShape {
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.len() / self.width
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PieceError {
    #[display("piece has no rotation state")]
    NoStates,
    #[display("piece has {count} rotation states, at most {} are supported", MAX_ROTATIONS)]
    TooManyStates { count: usize },
    #[display("rotation state #{index} has no occupied cell")]
    EmptyState { index: usize },
}

/// A falling-block piece: an ordered list of rotation states and the index of
/// the current one.
///
/// Rotating only moves the index; the state matrices are never modified.
/// Each game owns its own copies, so rotating a piece never affects another
/// game drawing from the same catalog.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Rotation, catalog};
///
/// let mut t = catalog::classic_pieces().remove(5);
/// assert_eq!(t.name(), 'T');
///
/// let peeked = *t.peek_rotation(Rotation::Right);
/// assert_eq!(t.rotation_index(), 0);
///
/// assert_eq!(*t.rotate(Rotation::Right), peeked);
/// assert_eq!(t.rotation_index(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    name: char,
    states: ArrayVec<Shape, MAX_ROTATIONS>,
    current: usize,
}

impl Piece {
    /// Creates a piece from its rotation states, starting at the first one.
    pub fn new<I>(name: char, states: I) -> Result<Self, PieceError>
    where
        I: IntoIterator<Item = Shape>,
    {
        let states = states.into_iter().collect::<Vec<_>>();
        if states.is_empty() {
            return Err(PieceError::NoStates);
        }
        if states.len() > MAX_ROTATIONS {
            return Err(PieceError::TooManyStates {
                count: states.len(),
            });
        }
        if let Some(index) = states.iter().position(Shape::is_empty) {
            return Err(PieceError::EmptyState { index });
        }
        Ok(Self {
            name,
            states: states.into_iter().collect(),
            current: 0,
        })
    }

    #[must_use]
    pub fn name(&self) -> char {
        self.name
    }

    #[must_use]
    pub fn rotation_count(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn rotation_index(&self) -> usize {
        self.current
    }

    /// Returns all rotation states in order.
    #[must_use]
    pub fn states(&self) -> &[Shape] {
        &self.states
    }

    #[must_use]
    pub fn current_state(&self) -> &Shape {
        &self.states[self.current]
    }

    /// Returns the state a rotation would produce without committing it.
    #[must_use]
    pub fn peek_rotation(&self, rotation: Rotation) -> &Shape {
        &self.states[rotation.apply(self.current, self.states.len())]
    }

    /// Commits a rotation and returns the new current state.
    pub fn rotate(&mut self, rotation: Rotation) -> &Shape {
        self.current = rotation.apply(self.current, self.states.len());
        &self.states[self.current]
    }

    /// Returns a copy of this piece reset to its first rotation state.
    #[must_use]
    pub fn reset_rotation(&self) -> Self {
        Self {
            current: 0,
            ..self.clone()
        }
    }

    /// Bounding box of the current rotation state.
    ///
    /// Recomputed on every call so it always reflects the current rotation.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        self.current_state().bounding_box()
    }

    /// Bounding-box crop of the current rotation state.
    #[must_use]
    pub fn cropped(&self) -> CroppedShape {
        self.current_state().cropped()
    }

    /// Largest state side length, which bounds the piece's footprint.
    #[must_use]
    pub fn max_side(&self) -> usize {
        self.states.iter().map(Shape::side).max().unwrap_or(0)
    }
}
