pub mod ai;
pub mod components;
pub mod events;
pub mod grid;
pub mod manager;
pub mod plugins;
pub mod resources;

use bevy::prelude::*;

use plugins::navigation::NavigationPlugin;
use plugins::telemetry::TelemetryPlugin;

pub use ai::Connectivity;
pub use ai::path::Path;
pub use components::GridCell;
pub use grid::ObstacleGrid;
pub use manager::{AiManager, Behavior, BehaviorMode};
pub use resources::NavigationConfig;

/// Navigation systems plus frame telemetry.
///
/// Insert a `NavigationConfig` first to override the defaults, then insert
/// an `AiManager` whenever a map is loaded.
pub struct NpcNavigationPlugin;

impl Plugin for NpcNavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(NavigationPlugin);
        app.add_plugins(TelemetryPlugin);
    }
}
