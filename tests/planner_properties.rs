//! Planner invariants checked over seeded random maps.

use std::collections::VecDeque;

use npc_navigation::ai::grid_search::GridSearchPlanner;
use npc_navigation::ai::random_walk::RandomWalkPlanner;
use npc_navigation::{Connectivity, GridCell, ObstacleGrid, Path};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WIDTH: u32 = 14;
const HEIGHT: u32 = 10;

fn random_grid(rng: &mut StdRng, density: f64) -> ObstacleGrid {
    let mut grid = ObstacleGrid::new(WIDTH, HEIGHT);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            if rng.gen_bool(density) {
                grid.register_obstacle(x, y);
            }
        }
    }
    grid
}

fn random_free_cell(grid: &ObstacleGrid, rng: &mut StdRng) -> Option<GridCell> {
    (0..200)
        .map(|_| GridCell::new(rng.gen_range(0..WIDTH), rng.gen_range(0..HEIGHT)))
        .find(|cell| grid.is_free(*cell))
}

/// Four-way breadth-first distance, used as ground truth.
fn bfs_distance(grid: &ObstacleGrid, start: GridCell, goal: GridCell) -> Option<usize> {
    let mut dist = vec![usize::MAX; (WIDTH * HEIGHT) as usize];
    let index = |c: GridCell| (c.y * WIDTH + c.x) as usize;
    let mut queue = VecDeque::from([start]);
    dist[index(start)] = 0;
    while let Some(cell) = queue.pop_front() {
        if cell == goal {
            return Some(dist[index(cell)]);
        }
        for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
            let Some(next) = cell.offset(dx, dy) else {
                continue;
            };
            if grid.is_free(next) && dist[index(next)] == usize::MAX {
                dist[index(next)] = dist[index(cell)] + 1;
                queue.push_back(next);
            }
        }
    }
    None
}

fn assert_valid(path: &Path, grid: &ObstacleGrid, connectivity: Connectivity) {
    for cell in path.iter() {
        assert!(grid.is_free(*cell), "{:?} is blocked", cell);
    }
    for pair in path.cells().windows(2) {
        assert!(connectivity.is_step(&pair[0], &pair[1]));
        if connectivity == Connectivity::Eight && pair[0].x != pair[1].x && pair[0].y != pair[1].y {
            // No squeezing between two blocked corners.
            assert!(grid.is_free(GridCell::new(pair[1].x, pair[0].y)));
            assert!(grid.is_free(GridCell::new(pair[0].x, pair[1].y)));
        }
    }
}

#[test]
fn four_way_paths_match_breadth_first_distance() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let planner = GridSearchPlanner::new(Connectivity::Four);
    for _ in 0..150 {
        let grid = random_grid(&mut rng, 0.3);
        let (Some(start), Some(goal)) =
            (random_free_cell(&grid, &mut rng), random_free_cell(&grid, &mut rng))
        else {
            continue;
        };

        let path = planner.find_path(&grid, start, goal);
        match bfs_distance(&grid, start, goal) {
            Some(distance) => {
                assert_eq!(path.steps(), distance, "{:?} -> {:?}", start, goal);
                assert_eq!(path.start(), Some(start));
                assert_eq!(path.destination(), Some(goal));
                assert_valid(&path, &grid, Connectivity::Four);
            }
            None => assert!(path.is_empty()),
        }
    }
}

#[test]
fn eight_way_reaches_the_same_cells_in_no_more_moves() {
    let mut rng = StdRng::seed_from_u64(77);
    let four = GridSearchPlanner::new(Connectivity::Four);
    let eight = GridSearchPlanner::new(Connectivity::Eight);
    for _ in 0..150 {
        let grid = random_grid(&mut rng, 0.25);
        let (Some(start), Some(goal)) =
            (random_free_cell(&grid, &mut rng), random_free_cell(&grid, &mut rng))
        else {
            continue;
        };

        let cardinal = four.find_path(&grid, start, goal);
        let diagonal = eight.find_path(&grid, start, goal);
        // Corner-cutting is forbidden, so diagonals never open new regions.
        assert_eq!(cardinal.is_empty(), diagonal.is_empty());
        if !diagonal.is_empty() {
            assert!(diagonal.steps() <= cardinal.steps());
            assert!(diagonal.steps() as u32 >= start.chebyshev(&goal));
            assert_valid(&diagonal, &grid, Connectivity::Eight);
        }
    }
}

#[test]
fn wander_targets_stay_local_and_reachable() {
    let mut rng = StdRng::seed_from_u64(4242);
    for connectivity in [Connectivity::Four, Connectivity::Eight] {
        let wander = RandomWalkPlanner::new(3, 10, GridSearchPlanner::new(connectivity));
        for _ in 0..100 {
            let grid = random_grid(&mut rng, 0.2);
            let Some(start) = random_free_cell(&grid, &mut rng) else {
                continue;
            };
            let path = wander.random_path(&grid, start, &mut rng);
            let Some(goal) = path.destination() else {
                continue;
            };
            assert_ne!(goal, start);
            assert!(start.chebyshev(&goal) <= 3);
            assert!(!path.is_pursuit());
            assert_eq!(path.start(), Some(start));
            assert_valid(&path, &grid, connectivity);
        }
    }
}
