//! Which tile sits in which cell.
//!
//! A tile is either in exactly one cell of the target grid or unplaced in the staging area, and
//! a cell holds at most one tile. Dropping a tile onto an occupied cell evicts the previous
//! occupant back to the staging area.

use tracing::debug;

use crate::coord::{Cell, Grid};
use crate::error::{PuzzleError, Result};

/// The position of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementEntry {
    /// The tile.
    pub tile_id: usize,
    /// Its cell, or `None` while it is in the staging area.
    pub cell: Option<Cell>,
}

/// Cell occupancy for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementState {
    grid: Grid,
    // indexed by tile id
    cells: Vec<Option<Cell>>,
    // indexed by cell, the inverse of `cells`
    occupants: Vec<Option<usize>>,
}

impl PlacementState {
    /// Every tile of `grid` unplaced.
    pub fn new(grid: Grid) -> Self {
        let n = grid.cell_count();
        Self {
            grid,
            cells: vec![None; n],
            occupants: vec![None; n],
        }
    }

    /// A state with the given tiles placed, applied in order with the usual eviction rule.
    pub fn with_placements(
        grid: Grid,
        placements: impl IntoIterator<Item = (usize, Cell)>,
    ) -> Result<Self> {
        let mut state = Self::new(grid);
        for (tile_id, cell) in placements {
            state.move_tile(tile_id, Some(cell))?;
        }
        Ok(state)
    }

    /// The grid these placements are for.
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Move a tile into `target`, or back to the staging area when `target` is `None`.
    ///
    /// If another tile occupies `target` it is sent back to the staging area and its id is
    /// returned.
    pub fn move_tile(&mut self, tile_id: usize, target: Option<Cell>) -> Result<Option<usize>> {
        if tile_id >= self.cells.len() {
            return Err(PuzzleError::UnknownTile(tile_id));
        }
        if let Some(cell) = target {
            if !self.grid.contains(cell) {
                return Err(PuzzleError::CellOutOfRange(cell.index()));
            }
        }

        if let Some(old) = self.cells[tile_id].take() {
            self.occupants[old.index()] = None;
        }

        let Some(cell) = target else {
            return Ok(None);
        };
        let evicted = self.occupants[cell.index()].replace(tile_id);
        if let Some(other) = evicted {
            debug!(tile = tile_id, evicted = other, cell = cell.index(), "evicting tile");
            self.cells[other] = None;
        }
        self.cells[tile_id] = Some(cell);
        Ok(evicted)
    }

    /// Whether every tile is in its home cell.
    pub fn is_complete(&self) -> bool {
        self.cells
            .iter()
            .enumerate()
            .all(|(id, cell)| *cell == Some(Cell::home_of(id)))
    }

    /// Send every tile back to the staging area.
    pub fn reset(&mut self) {
        self.cells.fill(None);
        self.occupants.fill(None);
    }

    /// The cell holding `tile_id`, if it is placed.
    pub fn cell_of(&self, tile_id: usize) -> Result<Option<Cell>> {
        self.cells
            .get(tile_id)
            .copied()
            .ok_or(PuzzleError::UnknownTile(tile_id))
    }

    /// The tile in `cell`, if any.
    pub fn occupant(&self, cell: Cell) -> Option<usize> {
        self.occupants.get(cell.index()).copied().flatten()
    }

    /// Number of tiles currently in the grid.
    pub fn placed_count(&self) -> usize {
        self.occupants.iter().filter(|o| o.is_some()).count()
    }

    /// One entry per tile, ordered by tile id.
    pub fn entries(&self) -> impl Iterator<Item = PlacementEntry> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(tile_id, &cell)| PlacementEntry { tile_id, cell })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(d: u32) -> Grid {
        Grid::from_difficulty(d).unwrap()
    }

    #[test]
    fn starts_unplaced() {
        let state = PlacementState::new(grid(9));
        assert_eq!(state.entries().count(), 9);
        assert!(state.entries().all(|e| e.cell.is_none()));
        assert_eq!(state.placed_count(), 0);
        assert!(!state.is_complete());
    }

    #[test]
    fn eviction_on_collision() {
        let mut state = PlacementState::new(grid(9));
        assert_eq!(state.move_tile(0, Some(Cell(2))).unwrap(), None);
        assert_eq!(state.move_tile(1, Some(Cell(2))).unwrap(), Some(0));
        assert_eq!(state.cell_of(0).unwrap(), None);
        assert_eq!(state.cell_of(1).unwrap(), Some(Cell(2)));
        assert_eq!(state.occupant(Cell(2)), Some(1));
    }

    #[test]
    fn moving_frees_the_old_cell() {
        let mut state = PlacementState::new(grid(4));
        state.move_tile(3, Some(Cell(0))).unwrap();
        state.move_tile(3, Some(Cell(1))).unwrap();
        assert_eq!(state.occupant(Cell(0)), None);
        assert_eq!(state.occupant(Cell(1)), Some(3));

        // dropping onto its own cell evicts nothing
        assert_eq!(state.move_tile(3, Some(Cell(1))).unwrap(), None);
        assert_eq!(state.cell_of(3).unwrap(), Some(Cell(1)));

        state.move_tile(3, None).unwrap();
        assert_eq!(state.occupant(Cell(1)), None);
        assert_eq!(state.placed_count(), 0);
    }

    #[test]
    fn rejects_unknown_tiles_and_cells() {
        let mut state = PlacementState::new(grid(4));
        assert!(matches!(
            state.move_tile(4, Some(Cell(0))),
            Err(PuzzleError::UnknownTile(4))
        ));
        assert!(matches!(
            state.move_tile(0, Some(Cell(4))),
            Err(PuzzleError::CellOutOfRange(4))
        ));
        assert!(matches!(state.cell_of(17), Err(PuzzleError::UnknownTile(17))));
        assert_eq!(state, PlacementState::new(grid(4)));
    }

    #[test]
    fn completion_is_exact() {
        let g = grid(16);
        let mut state = PlacementState::with_placements(g, (0..16).map(|i| (i, Cell(i)))).unwrap();
        assert!(state.is_complete());

        for id in 0..16 {
            let mut broken = state.clone();
            broken.move_tile(id, None).unwrap();
            assert!(!broken.is_complete());
        }

        // swapping two tiles leaves everything placed but unsolved
        state.move_tile(0, Some(Cell(1))).unwrap();
        state.move_tile(1, Some(Cell(0))).unwrap();
        assert_eq!(state.placed_count(), 16);
        assert_eq!(state.cell_of(0).unwrap(), Some(Cell(1)));
        assert_eq!(state.cell_of(1).unwrap(), Some(Cell(0)));
        assert!(!state.is_complete());
    }

    #[test]
    fn reset_clears_everything() {
        let g = grid(9);
        let mut state = PlacementState::with_placements(g, (0..9).map(|i| (i, Cell(8 - i)))).unwrap();
        state.reset();
        assert_eq!(state, PlacementState::new(g));
        state.reset();
        assert_eq!(state, PlacementState::new(g));
    }

    use proptest::collection::vec;
    use proptest::prelude::*;
    use proptest_derive::Arbitrary;

    #[derive(Debug, Clone, Arbitrary)]
    struct Op {
        #[proptest(strategy = "0usize..16")]
        tile: usize,
        #[proptest(strategy = "proptest::option::of((0usize..16).prop_map(Cell))")]
        cell: Option<Cell>,
    }

    proptest! {
        #[test]
        fn cells_stay_unique(ops in vec(any::<Op>(), 0..100)) {
            let mut state = PlacementState::new(grid(16));
            for op in ops {
                state.move_tile(op.tile, op.cell).unwrap();
                let mut seen = [false; 16];
                for entry in state.entries() {
                    if let Some(cell) = entry.cell {
                        prop_assert!(!seen[cell.index()]);
                        seen[cell.index()] = true;
                        prop_assert_eq!(state.occupant(cell), Some(entry.tile_id));
                    }
                }
                prop_assert_eq!(seen.iter().filter(|s| **s).count(), state.placed_count());
            }
        }

        #[test]
        fn complete_iff_every_tile_home(ops in vec(any::<Op>(), 0..100)) {
            let mut state = PlacementState::new(grid(16));
            for op in ops {
                state.move_tile(op.tile, op.cell).unwrap();
            }
            let all_home = state.entries().all(|e| e.cell == Some(Cell(e.tile_id)));
            prop_assert_eq!(state.is_complete(), all_home);
        }
    }
}
