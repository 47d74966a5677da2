use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ai::Connectivity;
use crate::manager::BehaviorMode;

// ---------------------------------------------------------------------------
// Navigation config
// ---------------------------------------------------------------------------

/// World units covered by one grid cell.
pub const DEFAULT_TILE_SIZE: f32 = 16.0;
/// Agents closer than this chase the player (adaptive mode).
pub const DEFAULT_SIGHT_DISTANCE: f32 = 285.0;
/// Agents closer than this, but out of sight, wander; farther ones idle.
pub const DEFAULT_WANDER_DISTANCE: f32 = 350.0;
/// Melee reach for the attack animation.
pub const DEFAULT_ATTACK_DISTANCE: f32 = 25.0;
pub const DEFAULT_WANDER_RADIUS: u32 = 4;
pub const DEFAULT_WANDER_ATTEMPTS: u32 = 10;

/// Everything the decision manager needs, passed in explicitly.
///
/// Deserializable from JSON; absent fields keep their defaults.
#[derive(Resource, Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub tile_size: f32,
    pub mode: BehaviorMode,
    pub sight_distance: f32,
    pub wander_distance: f32,
    pub attack_distance: f32,
    pub connectivity: Connectivity,
    /// Chebyshev radius, in cells, of the wander destination square.
    pub wander_radius: u32,
    pub wander_attempts: u32,
    /// Per-search expansion cap; `None` searches until the frontier drains.
    pub max_expanded_cells: Option<usize>,
    /// Seed for `NavigationRng`; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            mode: BehaviorMode::default(),
            sight_distance: DEFAULT_SIGHT_DISTANCE,
            wander_distance: DEFAULT_WANDER_DISTANCE,
            attack_distance: DEFAULT_ATTACK_DISTANCE,
            connectivity: Connectivity::default(),
            wander_radius: DEFAULT_WANDER_RADIUS,
            wander_attempts: DEFAULT_WANDER_ATTEMPTS,
            max_expanded_cells: None,
            seed: None,
        }
    }
}

impl NavigationConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: NavigationConfig = serde_json::from_str(text)
            .map_err(|e| format!("Failed to parse navigation config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(format!("tile_size must be positive, got {}", self.tile_size));
        }
        for (name, value) in [
            ("sight_distance", self.sight_distance),
            ("wander_distance", self.wander_distance),
            ("attack_distance", self.attack_distance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        if self.sight_distance > self.wander_distance {
            return Err(format!(
                "sight_distance ({}) exceeds wander_distance ({})",
                self.sight_distance, self.wander_distance
            ));
        }
        if self.wander_radius == 0 {
            return Err("wander_radius must be at least 1".to_string());
        }
        if self.wander_attempts == 0 {
            return Err("wander_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Random source
// ---------------------------------------------------------------------------

/// Random source handed to the wander planner by the navigation systems.
#[derive(Resource, Deref, DerefMut)]
pub struct NavigationRng(pub StdRng);

impl NavigationRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

impl FromWorld for NavigationRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world
            .get_resource::<NavigationConfig>()
            .and_then(|config| config.seed);
        Self::new(seed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
