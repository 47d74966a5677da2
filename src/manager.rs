//! Perception and decision layer.
//!
//! `AiManager` owns the obstacle grid for the active map and the player's
//! last known position. Each tick, agents ask it for a path: it measures the
//! agent-player distance, picks idle, wander or pursue from the behavior
//! mode, converts world positions to cells and runs the matching planner.
//!
//! World positions use the grid's top-left corner as origin, with rows
//! growing along `+y`.

use bevy::prelude::*;
use micromegas_tracing::prelude::info;
use rand::Rng;

use crate::ai::grid_search::GridSearchPlanner;
use crate::ai::path::Path;
use crate::ai::random_walk::RandomWalkPlanner;
use crate::components::GridCell;
use crate::grid::ObstacleGrid;
use crate::resources::NavigationConfig;

/// How agents react to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorMode {
    /// Ignore the player and wander.
    AlwaysWander,
    /// Chase the player from anywhere on the map.
    AlwaysPursue,
    /// Chase, wander or idle depending on distance to the player.
    #[default]
    Adaptive,
}

/// What an agent does this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behavior {
    Idle,
    Wander,
    Pursue,
}

#[derive(Resource, Debug, Clone)]
pub struct AiManager {
    config: NavigationConfig,
    grid: ObstacleGrid,
    search: GridSearchPlanner,
    wander: RandomWalkPlanner,
    player_position: Vec2,
    player_on_scene: bool,
    player_moved: bool,
}

impl AiManager {
    /// Build a manager with no map registered yet.
    pub fn new(config: NavigationConfig) -> Result<Self, String> {
        config.validate()?;
        let (search, wander) = planners(&config);
        Ok(Self {
            config,
            grid: ObstacleGrid::default(),
            search,
            wander,
            player_position: Vec2::ZERO,
            player_on_scene: true,
            player_moved: false,
        })
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Replace the configuration. The grid and player state are kept.
    pub fn set_config(&mut self, config: NavigationConfig) -> Result<(), String> {
        config.validate()?;
        let (search, wander) = planners(&config);
        self.config = config;
        self.search = search;
        self.wander = wander;
        Ok(())
    }

    pub fn mode(&self) -> BehaviorMode {
        self.config.mode
    }

    pub fn set_mode(&mut self, mode: BehaviorMode) {
        if self.config.mode != mode {
            info!("behavior mode {:?} -> {:?}", self.config.mode, mode);
        }
        self.config.mode = mode;
    }

    // -----------------------------------------------------------------------
    // Map registration
    // -----------------------------------------------------------------------

    /// Size the obstacle grid for a newly loaded map, dropping any old one.
    pub fn register_map_size(&mut self, width: u32, height: u32) {
        info!("navigation grid registered: {}x{}", width, height);
        self.grid = ObstacleGrid::new(width, height);
    }

    /// Block one cell. The caller keeps `column`/`row` inside the map.
    pub fn register_obstacle(&mut self, column: u32, row: u32) {
        self.grid.register_obstacle(column, row);
    }

    /// Block the cell containing a world position.
    pub fn register_obstacle_at(&mut self, world: Vec2) {
        let cell = self.to_grid(world);
        self.grid.register_obstacle(cell.x, cell.y);
    }

    pub fn grid(&self) -> &ObstacleGrid {
        &self.grid
    }

    // -----------------------------------------------------------------------
    // Player tracking
    // -----------------------------------------------------------------------

    pub fn set_player_position(&mut self, position: Vec2) {
        if position != self.player_position {
            self.player_moved = true;
        }
        self.player_position = position;
    }

    pub fn player_position(&self) -> Vec2 {
        self.player_position
    }

    pub fn set_player_on_scene(&mut self, on_scene: bool) {
        self.player_on_scene = on_scene;
    }

    pub fn is_player_on_scene(&self) -> bool {
        self.player_on_scene
    }

    /// Whether the player position changed since the last `update`.
    pub fn has_player_moved(&self) -> bool {
        self.player_moved
    }

    /// End-of-tick bookkeeping.
    pub fn update(&mut self) {
        self.player_moved = false;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Cell containing a world position. Components are divided by the tile
    /// size and truncated toward zero; negative or NaN inputs clamp to 0.
    pub fn to_grid(&self, world: Vec2) -> GridCell {
        let tile = self.config.tile_size;
        GridCell::new((world.x / tile) as u32, (world.y / tile) as u32)
    }

    pub fn distance_to_player(&self, agent: Vec2) -> f32 {
        agent.distance(self.player_position)
    }

    /// Which behavior the agent at `agent` should follow this tick.
    pub fn decide(&self, agent: Vec2) -> Behavior {
        if !self.player_on_scene || self.config.mode == BehaviorMode::AlwaysWander {
            return Behavior::Wander;
        }
        if self.config.mode == BehaviorMode::AlwaysPursue {
            return Behavior::Pursue;
        }

        let distance = self.distance_to_player(agent);
        if distance <= self.config.sight_distance {
            Behavior::Pursue
        } else if distance <= self.config.wander_distance {
            Behavior::Wander
        } else {
            Behavior::Idle
        }
    }

    /// This tick's path for an agent. Pursuit paths carry the pursuit flag;
    /// an empty path means the agent stays put.
    pub fn get_agent_path<R: Rng + ?Sized>(&self, agent: Vec2, rng: &mut R) -> Path {
        debug_assert!(
            !self.grid.is_empty(),
            "agent path requested before register_map_size"
        );
        match self.decide(agent) {
            Behavior::Pursue => self
                .path_between(agent, self.player_position)
                .with_pursuit(true),
            Behavior::Wander => self.wander_path(agent, rng),
            Behavior::Idle => Path::empty(),
        }
    }

    /// Melee range check, independent of pathing.
    pub fn should_play_attack_animation(&self, agent: Vec2) -> bool {
        self.distance_to_player(agent) < self.config.attack_distance
    }

    /// Shortest path between two world positions.
    ///
    /// A destination inside an obstacle is moved one cell down-right first.
    /// That cell is not checked, so it may be blocked or off the map too, in
    /// which case the path is empty.
    pub fn path_between(&self, from: Vec2, to: Vec2) -> Path {
        let start = self.to_grid(from);
        let mut goal = self.to_grid(to);
        if self.grid.is_obstacle(goal.x, goal.y) {
            goal = GridCell::new(goal.x.saturating_add(1), goal.y.saturating_add(1));
        }
        self.search.find_path(&self.grid, start, goal)
    }

    /// Wander path from a world position.
    pub fn wander_path<R: Rng + ?Sized>(&self, from: Vec2, rng: &mut R) -> Path {
        self.wander.random_path(&self.grid, self.to_grid(from), rng)
    }
}

fn planners(config: &NavigationConfig) -> (GridSearchPlanner, RandomWalkPlanner) {
    let search =
        GridSearchPlanner::new(config.connectivity).with_budget(config.max_expanded_cells);
    let wander = RandomWalkPlanner::new(config.wander_radius, config.wander_attempts, search);
    (search, wander)
}
