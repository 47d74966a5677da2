use bevy::prelude::*;

use crate::ai::path::Path;

// ---------------------------------------------------------------------------
// Grid and spatial
// ---------------------------------------------------------------------------

/// A tile on the obstacle grid, addressed by column (`x`) and row (`y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Neighbor at the given offset, or None if it would leave the
    /// non-negative quadrant.
    pub fn offset(&self, dx: i32, dy: i32) -> Option<GridCell> {
        Some(GridCell {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    /// Number of king moves between two cells.
    pub fn chebyshev(&self, other: &GridCell) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn manhattan(&self, other: &GridCell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Eight-way movement direction. Rows grow downward, so `Up` is `-y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Grid offset for this direction.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (1, -1),
            Direction::DownLeft => (-1, 1),
            Direction::DownRight => (1, 1),
        }
    }

    pub fn is_diagonal(&self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }

    /// Direction of a single step between two adjacent cells.
    pub fn between(from: GridCell, to: GridCell) -> Option<Direction> {
        let dx = i64::from(to.x) - i64::from(from.x);
        let dy = i64::from(to.y) - i64::from(from.y);
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            (-1, -1) => Some(Direction::UpLeft),
            (1, -1) => Some(Direction::UpRight),
            (-1, 1) => Some(Direction::DownLeft),
            (1, 1) => Some(Direction::DownRight),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entity markers
// ---------------------------------------------------------------------------

/// The entity whose `Transform` is fed to the manager as the player position.
#[derive(Component, Debug)]
pub struct Player;

/// An NPC planned by the navigation systems every tick.
#[derive(Component, Debug)]
pub struct Agent;

// ---------------------------------------------------------------------------
// Planning output
// ---------------------------------------------------------------------------

/// Latest navigation decision for an agent. Overwritten every tick.
#[derive(Component, Debug, Clone, Default)]
pub struct AgentDecision {
    pub path: Path,
    /// Player is within melee reach; callers use it to gate the attack animation.
    pub attack: bool,
}

impl AgentDecision {
    pub fn is_pursuing(&self) -> bool {
        self.path.is_pursuit()
    }
}
