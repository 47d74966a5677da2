//! Idle wandering: walk to a random free cell near the agent.
//!
//! Destinations are drawn uniformly from the square of the configured radius
//! around the start. Samples that fall outside the grid, on an obstacle, on
//! the start itself, or that the grid search cannot reach are rejected and
//! redrawn, up to a fixed number of attempts.

use micromegas_tracing::prelude::{debug, span_scope};
use rand::Rng;

use super::grid_search::GridSearchPlanner;
use super::path::Path;
use crate::components::GridCell;
use crate::grid::ObstacleGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomWalkPlanner {
    radius: u32,
    attempts: u32,
    search: GridSearchPlanner,
}

impl RandomWalkPlanner {
    pub fn new(radius: u32, attempts: u32, search: GridSearchPlanner) -> Self {
        Self {
            radius,
            attempts,
            search,
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Path from `start` to a reachable free cell within `radius`
    /// (Chebyshev), or an empty path once every attempt was rejected.
    pub fn random_path<R: Rng + ?Sized>(
        &self,
        grid: &ObstacleGrid,
        start: GridCell,
        rng: &mut R,
    ) -> Path {
        span_scope!("random_walk");

        if !grid.is_free(start) {
            return Path::empty();
        }

        for _ in 0..self.attempts {
            let Some(candidate) = self.sample(start, rng) else {
                continue;
            };
            if candidate == start || !grid.is_free(candidate) {
                continue;
            }
            let path = self.search.find_path(grid, start, candidate);
            if !path.is_empty() {
                return path;
            }
        }

        debug!(
            "wander from ({}, {}) gave up after {} attempts",
            start.x, start.y, self.attempts
        );
        Path::empty()
    }

    fn sample<R: Rng + ?Sized>(&self, start: GridCell, rng: &mut R) -> Option<GridCell> {
        let r = i64::from(self.radius);
        let x = i64::from(start.x) + rng.gen_range(-r..=r);
        let y = i64::from(start.y) + rng.gen_range(-r..=r);
        Some(GridCell::new(u32::try_from(x).ok()?, u32::try_from(y).ok()?))
    }
}
