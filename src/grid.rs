//! Obstacle occupancy grid shared by both planners.
//!
//! The grid is sized once when a map loads, filled by the map loader through
//! `register_obstacle`, and only read afterwards. Out-of-bounds cells are
//! reported as obstacles so the map border is impassable without padding.

use micromegas_tracing::prelude::warn;

use crate::ai::{Connectivity, DIAGONAL_COST, STRAIGHT_COST};
use crate::components::{Direction, GridCell};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObstacleGrid {
    width: u32,
    height: u32,
    blocked: Vec<bool>,
}

impl ObstacleGrid {
    /// Allocate a `width × height` grid with every cell free.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            blocked: vec![false; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// A 0×0 grid: no map size has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Mark a cell as impassable. The caller bounds-checks; an out-of-range
    /// cell is a contract violation and is dropped in release builds.
    pub fn register_obstacle(&mut self, column: u32, row: u32) {
        let cell = GridCell::new(column, row);
        debug_assert!(
            self.contains(cell),
            "obstacle ({column}, {row}) outside {}x{} grid",
            self.width,
            self.height
        );
        match self.index(cell) {
            Some(i) => self.blocked[i] = true,
            None => warn!(
                "ignoring obstacle ({}, {}) outside {}x{} grid",
                column, row, self.width, self.height
            ),
        }
    }

    /// Whether the cell is impassable. Cells outside the grid always are.
    pub fn is_obstacle(&self, column: u32, row: u32) -> bool {
        self.index(GridCell::new(column, row))
            .is_none_or(|i| self.blocked[i])
    }

    pub fn is_free(&self, cell: GridCell) -> bool {
        !self.is_obstacle(cell.x, cell.y)
    }

    pub fn obstacle_count(&self) -> usize {
        self.blocked.iter().filter(|b| **b).count()
    }

    /// Free neighbors of `cell` paired with the step cost to reach them.
    ///
    /// Cardinal steps come first, then diagonals, so expansion order is
    /// stable. A diagonal step is only allowed when both cardinal cells it
    /// passes between are free.
    pub fn neighbors(
        &self,
        cell: GridCell,
        connectivity: Connectivity,
    ) -> impl Iterator<Item = (GridCell, u32)> + '_ {
        let diagonals: &[Direction] = match connectivity {
            Connectivity::Four => &[],
            Connectivity::Eight => &Direction::DIAGONAL,
        };
        Direction::CARDINAL
            .iter()
            .chain(diagonals.iter())
            .filter_map(move |dir| {
                let (dx, dy) = dir.delta();
                let next = cell.offset(dx, dy)?;
                if !self.is_free(next) {
                    return None;
                }
                if !dir.is_diagonal() {
                    return Some((next, STRAIGHT_COST));
                }
                let corner_a = cell.offset(dx, 0)?;
                let corner_b = cell.offset(0, dy)?;
                (self.is_free(corner_a) && self.is_free(corner_b)).then_some((next, DIAGONAL_COST))
            })
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }
}
