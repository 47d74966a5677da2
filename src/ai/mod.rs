//! Grid planners. Chase and wander share one connectivity and cost model so
//! both behaviors avoid obstacles identically.

pub mod grid_search;
pub mod path;
pub mod random_walk;

use crate::components::GridCell;

/// Cost of a cardinal step.
pub const STRAIGHT_COST: u32 = 10;
/// Cost of a diagonal step (10·√2, rounded down).
pub const DIAGONAL_COST: u32 = 14;

/// Which neighbors count as adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Up, down, left, right.
    Four,
    /// Cardinal moves plus diagonals that don't cut a blocked corner.
    #[default]
    Eight,
}

impl Connectivity {
    /// Lower bound on the cost of any path from `from` to `to`.
    ///
    /// Manhattan for four-way movement, octile for eight-way. Both are
    /// consistent with the step costs, so A* never reopens a closed cell.
    pub fn heuristic(&self, from: &GridCell, to: &GridCell) -> u32 {
        match self {
            Connectivity::Four => from.manhattan(to).saturating_mul(STRAIGHT_COST),
            Connectivity::Eight => {
                let dx = from.x.abs_diff(to.x);
                let dy = from.y.abs_diff(to.y);
                let (short, long) = (dx.min(dy), dx.max(dy));
                short
                    .saturating_mul(DIAGONAL_COST)
                    .saturating_add((long - short).saturating_mul(STRAIGHT_COST))
            }
        }
    }

    /// Whether `to` is one move away from `from` (ignoring obstacles).
    pub fn is_step(&self, from: &GridCell, to: &GridCell) -> bool {
        match self {
            Connectivity::Four => from.manhattan(to) == 1,
            Connectivity::Eight => from.chebyshev(to) == 1,
        }
    }

    /// Minimum number of moves between two cells on an open grid.
    pub fn open_distance(&self, from: &GridCell, to: &GridCell) -> u32 {
        match self {
            Connectivity::Four => from.manhattan(to),
            Connectivity::Eight => from.chebyshev(to),
        }
    }
}
