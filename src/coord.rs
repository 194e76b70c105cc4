//! Grid geometry: the square grid a puzzle is cut into, and row-major cells within it.

use crate::error::{PuzzleError, Result};

/// The smallest grid that is still a puzzle (2x2).
pub const MIN_DIFFICULTY: u32 = 4;

/// Difficulty used when nothing else is requested.
pub const DEFAULT_DIFFICULTY: u32 = 9;

/// A named difficulty offered to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Short name shown to the player.
    pub label: &'static str,
    /// Total tile count.
    pub difficulty: u32,
}

/// The difficulties offered by default, easiest first.
pub const PRESETS: [Preset; 4] = [
    Preset {
        label: "Easy (2x2)",
        difficulty: 4,
    },
    Preset {
        label: "Medium (3x3)",
        difficulty: 9,
    },
    Preset {
        label: "Hard (4x4)",
        difficulty: 16,
    },
    Preset {
        label: "Expert (5x5)",
        difficulty: 25,
    },
];

/// A square grid of `side * side` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    side: u32,
}

impl Grid {
    /// Build the grid for a difficulty (total tile count). The difficulty must be a perfect
    /// square of at least [`MIN_DIFFICULTY`].
    ///
    /// ```rust
    /// use jigsaw_lib::coord::Grid;
    ///
    /// assert_eq!(Grid::from_difficulty(16).unwrap().side(), 4);
    /// assert!(Grid::from_difficulty(10).is_err());
    /// ```
    pub fn from_difficulty(difficulty: u32) -> Result<Grid> {
        if difficulty < MIN_DIFFICULTY {
            return Err(PuzzleError::InvalidDifficulty(difficulty));
        }
        let side = integer_sqrt(difficulty);
        if side * side != difficulty {
            return Err(PuzzleError::InvalidDifficulty(difficulty));
        }
        Ok(Grid { side })
    }

    /// Number of rows, which is also the number of columns.
    pub fn side(self) -> u32 {
        self.side
    }

    /// Total number of cells.
    pub fn cell_count(self) -> usize {
        (self.side * self.side) as usize
    }

    /// The difficulty this grid was built from.
    pub fn difficulty(self) -> u32 {
        self.side * self.side
    }

    /// The cell at the given row and column, if it lies inside the grid.
    pub fn cell(self, row: u32, col: u32) -> Option<Cell> {
        (row < self.side && col < self.side).then(|| Cell((row * self.side + col) as usize))
    }

    /// Whether the cell index is inside this grid.
    pub fn contains(self, cell: Cell) -> bool {
        cell.0 < self.cell_count()
    }

    /// `(row, col)` of a cell.
    pub fn row_col(self, cell: Cell) -> (u32, u32) {
        let side = self.side as usize;
        ((cell.0 / side) as u32, (cell.0 % side) as u32)
    }

    /// All cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (0..self.cell_count()).map(Cell)
    }
}

/// A row-major index into the target grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell(pub usize);

impl Cell {
    /// The correct cell for a tile, which by construction shares the tile's id.
    pub fn home_of(tile_id: usize) -> Cell {
        Cell(tile_id)
    }

    /// The raw row-major index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<Cell> for usize {
    fn from(cell: Cell) -> usize {
        cell.0
    }
}

fn integer_sqrt(n: u32) -> u32 {
    let n = n as u64;
    let mut root = (n as f64).sqrt() as u64;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root as u32
}
