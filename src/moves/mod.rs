//! Module for tile moves: where a player wants a tile to go, and what happened when it went.

use crate::coord::{Cell, Grid};
use crate::drop_target::{self, Point, Rect};

/// Where a move sends its tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveTarget {
    /// A pointer was released at `at` while the target area covered `area`. Resolves to the cell
    /// under the pointer, or to the staging area when the pointer is outside the grid.
    Pointer {
        /// release position
        at: Point,
        /// the target area's bounds at the time of release
        area: Rect,
    },
    /// A specific cell.
    Cell(Cell),
    /// Back to the staging area.
    Staging,
}

impl MoveTarget {
    /// The cell this target names for a grid, `None` meaning the staging area.
    pub fn resolve(self, grid: Grid) -> Option<Cell> {
        match self {
            MoveTarget::Pointer { at, area } => drop_target::resolve(at, area, grid.side()),
            MoveTarget::Cell(cell) => Some(cell),
            MoveTarget::Staging => None,
        }
    }
}

/// A request to move one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    /// The tile being moved.
    pub tile_id: usize,
    /// Where it goes.
    pub target: MoveTarget,
}

impl Move {
    /// Drop `tile_id` at a pointer position over the target area.
    pub fn pointer(tile_id: usize, at: Point, area: Rect) -> Self {
        Self {
            tile_id,
            target: MoveTarget::Pointer { at, area },
        }
    }

    /// Put `tile_id` into `cell`.
    pub fn to_cell(tile_id: usize, cell: Cell) -> Self {
        Self {
            tile_id,
            target: MoveTarget::Cell(cell),
        }
    }

    /// Return `tile_id` to the staging area.
    pub fn to_staging(tile_id: usize) -> Self {
        Self {
            tile_id,
            target: MoveTarget::Staging,
        }
    }
}

/// The result of a successful move, for the caller to react to (play a drop or completion sound,
/// animate an evicted tile back to the staging area).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The tile that moved.
    pub tile_id: usize,
    /// The cell it landed in, `None` for the staging area.
    pub cell: Option<Cell>,
    /// A tile that was pushed out of `cell` to make room.
    pub evicted: Option<usize>,
    /// Whether this move solved the puzzle.
    pub completed: bool,
}

/// A sound the caller should play in response to a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// A tile was dropped.
    Drop,
    /// The puzzle was solved.
    Complete,
}

impl MoveOutcome {
    /// The sounds to play for this move, nothing when sound is switched off.
    pub fn cues(&self, sound_enabled: bool) -> &'static [SoundCue] {
        match (sound_enabled, self.completed) {
            (false, _) => &[],
            (true, false) => &[SoundCue::Drop],
            (true, true) => &[SoundCue::Drop, SoundCue::Complete],
        }
    }
}

/// A sequence of moves, applied in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoveSequence(pub Vec<Move>);

impl MoveSequence {
    /// The moves that put every tile of `grid` into its home cell, in tile order.
    pub fn solution(grid: Grid) -> Self {
        Self(
            grid.cells()
                .map(|cell| Move::to_cell(cell.index(), cell))
                .collect(),
        )
    }

    /// Number of moves in the sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence has no moves.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Move> for MoveSequence {
    fn from_iter<T: IntoIterator<Item = Move>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for MoveSequence {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_resolve() {
        let grid = Grid::from_difficulty(9).unwrap();
        let area = Rect::new(0.0, 0.0, 300.0, 300.0);
        assert_eq!(
            Move::pointer(0, Point::new(150.0, 150.0), area).target.resolve(grid),
            Some(Cell(4))
        );
        assert_eq!(
            Move::pointer(0, Point::new(400.0, 150.0), area).target.resolve(grid),
            None
        );
        assert_eq!(Move::to_cell(0, Cell(7)).target.resolve(grid), Some(Cell(7)));
        assert_eq!(Move::to_staging(0).target.resolve(grid), None);
    }

    #[test]
    fn cues_follow_completion_and_preference() {
        let mut outcome = MoveOutcome {
            tile_id: 0,
            cell: Some(Cell(0)),
            evicted: None,
            completed: false,
        };
        assert_eq!(outcome.cues(true), &[SoundCue::Drop]);
        assert!(outcome.cues(false).is_empty());
        outcome.completed = true;
        assert_eq!(outcome.cues(true), &[SoundCue::Drop, SoundCue::Complete]);
    }

    #[test]
    fn solution_visits_every_cell() {
        let grid = Grid::from_difficulty(16).unwrap();
        let solution = MoveSequence::solution(grid);
        assert_eq!(solution.len(), 16);
        for (i, mv) in solution.into_iter().enumerate() {
            assert_eq!(mv, Move::to_cell(i, Cell(i)));
        }
    }
}
