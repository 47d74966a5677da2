//! A* shortest path between two cells of the obstacle grid.
//!
//! Ties in `f = g + h` go to the entry with the larger `g` (the one closer to
//! the goal), so the same grid, start and goal always produce the same path.

use micromegas_tracing::prelude::{debug, span_scope};
use pathfinding::prelude::astar;

use super::Connectivity;
use super::path::Path;
use crate::components::GridCell;
use crate::grid::ObstacleGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSearchPlanner {
    connectivity: Connectivity,
    max_expanded_cells: Option<usize>,
}

impl GridSearchPlanner {
    pub fn new(connectivity: Connectivity) -> Self {
        Self {
            connectivity,
            max_expanded_cells: None,
        }
    }

    /// Give up (empty path) after expanding this many cells.
    pub fn with_budget(mut self, max_expanded_cells: Option<usize>) -> Self {
        self.max_expanded_cells = max_expanded_cells;
        self
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Shortest obstacle-avoiding path from `start` to `goal`, both included.
    ///
    /// Returns an empty path when the goal is unreachable, when either end is
    /// blocked or off the grid, or when the expansion budget runs out.
    pub fn find_path(&self, grid: &ObstacleGrid, start: GridCell, goal: GridCell) -> Path {
        span_scope!("grid_search");

        if !grid.is_free(start) || !grid.is_free(goal) {
            debug!(
                "no search: start ({}, {}) or goal ({}, {}) blocked",
                start.x, start.y, goal.x, goal.y
            );
            return Path::empty();
        }

        let connectivity = self.connectivity;
        let budget = self.max_expanded_cells.unwrap_or(usize::MAX);
        let mut expanded = 0usize;

        let result = astar(
            &start,
            |cell| {
                expanded += 1;
                // Once over budget, stop feeding the frontier so it drains.
                let within_budget = expanded <= budget;
                grid.neighbors(*cell, connectivity)
                    .filter(move |_| within_budget)
            },
            |cell| connectivity.heuristic(cell, &goal),
            |cell| *cell == goal,
        );

        match result {
            Some((cells, _cost)) => Path::new(cells),
            None => {
                debug!(
                    "no path ({}, {}) -> ({}, {}) after {} expansions",
                    start.x, start.y, goal.x, goal.y, expanded
                );
                Path::empty()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::grid::tests::grid_from_rows;

    /// Consecutive cells are single moves, every cell is free, nothing repeats.
    pub(crate) fn assert_walkable(path: &Path, grid: &ObstacleGrid, connectivity: Connectivity) {
        for cell in path.iter() {
            assert!(grid.is_free(*cell), "path crosses obstacle at {:?}", cell);
        }
        for pair in path.cells().windows(2) {
            assert!(
                connectivity.is_step(&pair[0], &pair[1]),
                "{:?} -> {:?} is not a single move",
                pair[0],
                pair[1]
            );
        }
        let mut seen = path.cells().to_vec();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), path.len(), "path revisits a cell");
    }

    #[test]
    fn open_grid_eight_way_is_chebyshev_optimal() {
        let grid = ObstacleGrid::new(8, 6);
        let planner = GridSearchPlanner::new(Connectivity::Eight);
        let start = GridCell::new(1, 1);
        for y in 0..6 {
            for x in 0..8 {
                let goal = GridCell::new(x, y);
                let path = planner.find_path(&grid, start, goal);
                assert_eq!(path.start(), Some(start));
                assert_eq!(path.destination(), Some(goal));
                assert_eq!(path.steps() as u32, start.chebyshev(&goal));
                assert_walkable(&path, &grid, Connectivity::Eight);
            }
        }
    }

    #[test]
    fn open_grid_four_way_is_manhattan_optimal() {
        let grid = ObstacleGrid::new(6, 6);
        let planner = GridSearchPlanner::new(Connectivity::Four);
        let start = GridCell::new(5, 0);
        for y in 0..6 {
            for x in 0..6 {
                let goal = GridCell::new(x, y);
                let path = planner.find_path(&grid, start, goal);
                assert_eq!(path.steps() as u32, start.manhattan(&goal));
                assert_walkable(&path, &grid, Connectivity::Four);
            }
        }
    }

    #[test]
    fn straight_line_prefers_cardinal_steps() {
        let grid = ObstacleGrid::new(5, 3);
        let planner = GridSearchPlanner::default();
        let path = planner.find_path(&grid, GridCell::new(0, 1), GridCell::new(3, 1));
        assert_eq!(
            path.cells(),
            &[
                GridCell::new(0, 1),
                GridCell::new(1, 1),
                GridCell::new(2, 1),
                GridCell::new(3, 1),
            ]
        );
    }

    #[test]
    fn routes_around_wall() {
        let grid = grid_from_rows(&[
            ".....",
            ".###.",
            ".#...",
            ".#.#.",
            ".....",
        ]);
        for connectivity in [Connectivity::Four, Connectivity::Eight] {
            let planner = GridSearchPlanner::new(connectivity);
            let path = planner.find_path(&grid, GridCell::new(2, 2), GridCell::new(0, 2));
            assert!(!path.is_empty(), "{:?} found no detour", connectivity);
            assert_eq!(path.destination(), Some(GridCell::new(0, 2)));
            assert_walkable(&path, &grid, connectivity);
        }
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let grid = grid_from_rows(&[
            "......",
            "..###.",
            "..#.#.",
            "..###.",
            "......",
        ]);
        for connectivity in [Connectivity::Four, Connectivity::Eight] {
            let planner = GridSearchPlanner::new(connectivity);
            let path = planner.find_path(&grid, GridCell::new(0, 0), GridCell::new(3, 2));
            assert!(path.is_empty());
        }
    }

    #[test]
    fn diagonal_gap_between_corners_is_closed() {
        let grid = grid_from_rows(&["#.", ".#"]);
        let planner = GridSearchPlanner::new(Connectivity::Eight);
        let path = planner.find_path(&grid, GridCell::new(1, 0), GridCell::new(0, 1));
        assert!(path.is_empty());
    }

    #[test]
    fn start_equal_goal_is_single_cell() {
        let grid = ObstacleGrid::new(3, 3);
        let planner = GridSearchPlanner::default();
        let path = planner.find_path(&grid, GridCell::new(1, 1), GridCell::new(1, 1));
        assert_eq!(path.cells(), &[GridCell::new(1, 1)]);
        assert_eq!(path.next_direction(), None);
    }

    #[test]
    fn blocked_or_outside_endpoints_yield_empty() {
        let grid = grid_from_rows(&["...", ".#.", "..."]);
        let planner = GridSearchPlanner::default();
        assert!(planner.find_path(&grid, GridCell::new(1, 1), GridCell::new(0, 0)).is_empty());
        assert!(planner.find_path(&grid, GridCell::new(0, 0), GridCell::new(1, 1)).is_empty());
        assert!(planner.find_path(&grid, GridCell::new(0, 0), GridCell::new(3, 0)).is_empty());
        assert!(planner.find_path(&grid, GridCell::new(9, 9), GridCell::new(0, 0)).is_empty());
    }

    #[test]
    fn repeated_search_is_identical() {
        let grid = grid_from_rows(&[
            "........",
            "..#.....",
            "..#..#..",
            ".....#..",
            "........",
        ]);
        let planner = GridSearchPlanner::default();
        let first = planner.find_path(&grid, GridCell::new(0, 2), GridCell::new(7, 2));
        for _ in 0..10 {
            let again = planner.find_path(&grid, GridCell::new(0, 2), GridCell::new(7, 2));
            assert_eq!(first, again);
        }
    }

    #[test]
    fn exhausted_budget_gives_up() {
        let grid = ObstacleGrid::new(30, 30);
        let start = GridCell::new(0, 0);
        let goal = GridCell::new(29, 29);
        let tight = GridSearchPlanner::new(Connectivity::Four).with_budget(Some(5));
        assert!(tight.find_path(&grid, start, goal).is_empty());

        let roomy = GridSearchPlanner::new(Connectivity::Four).with_budget(Some(10_000));
        assert_eq!(roomy.find_path(&grid, start, goal).steps(), 58);
    }

    #[test]
    fn found_paths_are_not_flagged_as_pursuit() {
        let grid = ObstacleGrid::new(3, 3);
        let path = GridSearchPlanner::default().find_path(
            &grid,
            GridCell::new(0, 0),
            GridCell::new(2, 2),
        );
        assert!(!path.is_pursuit());
    }
}
