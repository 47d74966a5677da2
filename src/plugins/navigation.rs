//! ECS glue around `AiManager`.
//!
//! Every tick the player's `Transform` is fed to the manager, each `Agent`
//! gets a fresh `AgentDecision`, and pursuit transitions are announced with
//! observer events. The map loader owns the manager's lifetime: it inserts an
//! `AiManager` resource when a map loads and removes it on unload; these
//! systems idle while no manager exists.

use bevy::ecs::query::QuerySingleError;
use bevy::prelude::*;
use micromegas_tracing::prelude::{debug, imetric, span_fn, span_scope, warn};

use crate::components::{Agent, AgentDecision, Player};
use crate::events::{PursuitEnded, PursuitStarted};
use crate::manager::AiManager;
use crate::resources::{NavigationConfig, NavigationRng};

/// Insert `NavigationConfig` before adding this plugin to seed `NavigationRng`
/// from it.
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NavigationConfig>();
        app.init_resource::<NavigationRng>();

        app.add_systems(
            Update,
            (track_player, plan_agent_paths.after(track_player))
                .run_if(resource_exists::<AiManager>),
        );
        app.add_systems(
            Last,
            end_navigation_tick.run_if(resource_exists::<AiManager>),
        );
    }
}

/// Build a manager for a freshly loaded map from the active config.
pub fn manager_for_map(
    config: &NavigationConfig,
    width: u32,
    height: u32,
    obstacles: impl IntoIterator<Item = (u32, u32)>,
) -> Result<AiManager, String> {
    let mut manager = AiManager::new(config.clone())?;
    manager.register_map_size(width, height);
    for (column, row) in obstacles {
        if column < width && row < height {
            manager.register_obstacle(column, row);
        } else {
            warn!("skipping obstacle ({}, {}) outside {}x{} map", column, row, width, height);
        }
    }
    Ok(manager)
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Feed the player's position to the manager. No player entity means the
/// player is off scene; more than one keeps the last known position.
#[span_fn]
fn track_player(mut manager: ResMut<AiManager>, player_query: Query<&Transform, With<Player>>) {
    match player_query.single() {
        Ok(transform) => {
            manager.set_player_on_scene(true);
            manager.set_player_position(transform.translation.truncate());
        }
        Err(QuerySingleError::NoEntities(_)) => {
            if manager.is_player_on_scene() {
                debug!("player left the scene");
            }
            manager.set_player_on_scene(false);
        }
        Err(QuerySingleError::MultipleEntities(_)) => {
            warn!(
                "{} Player entities, keeping last position ({}, {})",
                player_query.iter().count(),
                manager.player_position().x,
                manager.player_position().y
            );
        }
    }
}

/// Plan every agent and publish pursuit transitions.
#[span_fn]
fn plan_agent_paths(
    manager: Res<AiManager>,
    mut rng: ResMut<NavigationRng>,
    mut agent_query: Query<(Entity, &Transform, Option<&mut AgentDecision>), With<Agent>>,
    mut commands: Commands,
) {
    let mut planned = 0u64;
    let mut pursuing = 0u64;

    for (entity, transform, decision) in &mut agent_query {
        let position = transform.translation.truncate();
        let next = AgentDecision {
            path: manager.get_agent_path(position, &mut rng.0),
            attack: manager.should_play_attack_animation(position),
        };

        let was_pursuing = decision.as_ref().is_some_and(|d| d.is_pursuing());
        match (was_pursuing, next.is_pursuing()) {
            (false, true) => {
                debug!("agent {:?} started pursuit", entity);
                commands.trigger(PursuitStarted { agent: entity });
            }
            (true, false) => {
                commands.trigger(PursuitEnded { agent: entity });
            }
            _ => {}
        }

        planned += 1;
        if next.is_pursuing() {
            pursuing += 1;
        }

        match decision {
            Some(mut current) => *current = next,
            None => {
                commands.entity(entity).insert(next);
            }
        }
    }

    imetric!("agents_planned", "count", planned);
    imetric!("agents_pursuing", "count", pursuing);
}

fn end_navigation_tick(mut manager: ResMut<AiManager>) {
    manager.update();
}
