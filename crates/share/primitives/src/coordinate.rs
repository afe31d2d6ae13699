//! Share coordinates within a square.

use core::fmt;

/// Position of a share in a data square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Row index.
    pub row: u16,
    /// Column index.
    pub col: u16,
}

impl Coordinate {
    /// Create a coordinate.
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Coordinate at `index` in row-major order for a square of `width`.
    ///
    /// Callers must ensure `index < width * width` and `width <= 65536`.
    pub fn from_index(index: usize, width: usize) -> Self {
        Self {
            row: (index / width) as u16,
            col: (index % width) as u16,
        }
    }

    /// Row-major index of this coordinate in a square of `width`.
    pub fn index(&self, width: usize) -> usize {
        self.row as usize * width + self.col as usize
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
