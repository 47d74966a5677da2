//! Planner output: the cells an agent should walk plus the pursuit flag.

use crate::components::{Direction, GridCell};

/// Cells from the start cell to the goal cell, both included.
///
/// An empty path means "stay put this tick" and is never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    cells: Vec<GridCell>,
    pursuit: bool,
}

impl Path {
    pub fn new(cells: Vec<GridCell>) -> Self {
        Self {
            cells,
            pursuit: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Mark (or unmark) the path as chasing the player.
    pub fn with_pursuit(mut self, pursuit: bool) -> Self {
        self.pursuit = pursuit;
        self
    }

    pub fn is_pursuit(&self) -> bool {
        self.pursuit
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Number of moves needed to walk the path.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<GridCell> {
        self.cells
    }

    pub fn start(&self) -> Option<GridCell> {
        self.cells.first().copied()
    }

    pub fn destination(&self) -> Option<GridCell> {
        self.cells.last().copied()
    }

    /// The cell to move into next, if the path goes anywhere.
    pub fn next_cell(&self) -> Option<GridCell> {
        self.cells.get(1).copied()
    }

    /// Direction of the first step.
    pub fn next_direction(&self) -> Option<Direction> {
        Direction::between(self.start()?, self.next_cell()?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }
}

impl From<Vec<GridCell>> for Path {
    fn from(cells: Vec<GridCell>) -> Self {
        Path::new(cells)
    }
}
