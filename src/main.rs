use bevy::prelude::*;
use bevy::tasks::{ComputeTaskPool, TaskPoolBuilder};
use micromegas_telemetry_sink::TelemetryGuardBuilder;
use micromegas_telemetry_sink::tracing_interop::TracingCaptureLayer;
use micromegas_tracing::dispatch::{flush_thread_buffer, init_thread_stream, unregister_thread_stream};
use micromegas_tracing::levels::LevelFilter;
use micromegas_tracing::prelude::info;
use npc_navigation::components::{Agent, AgentDecision, Player};
use npc_navigation::plugins::navigation::manager_for_map;
use npc_navigation::{NavigationConfig, NpcNavigationPlugin};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

const ARENA_WIDTH: u32 = 40;
const ARENA_HEIGHT: u32 = 30;
const DEMO_TICKS: u32 = 240;
/// World units the scripted player covers per tick.
const PLAYER_STEP: f32 = 4.0;

fn main() {
    // Spans require MICROMEGAS_ENABLE_CPU_TRACING=true; logs and metrics
    // always flow to the local sink.
    let _telemetry_guard = TelemetryGuardBuilder::default()
        .with_install_tracing_capture(false)
        .build()
        .expect("failed to initialize telemetry");

    // Capture Bevy's own `tracing` output into Micromegas as well.
    let log_layer = TracingCaptureLayer {
        max_level: LevelFilter::Info,
    };
    let subscriber = Registry::default().with(log_layer);
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    ComputeTaskPool::get_or_init(|| {
        TaskPoolBuilder::new()
            .on_thread_spawn(|| {
                init_thread_stream();
            })
            .on_thread_destroy(|| {
                flush_thread_buffer();
                unregister_thread_stream();
            })
            .build()
    });

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read config {}: {}", path, e));
            NavigationConfig::from_json(&text).unwrap_or_else(|e| panic!("{}", e))
        }
        None => NavigationConfig {
            seed: Some(2024),
            ..default()
        },
    };
    info!("navigation demo starting: {:?}", config);

    let manager = manager_for_map(&config, ARENA_WIDTH, ARENA_HEIGHT, arena_obstacles())
        .unwrap_or_else(|e| panic!("invalid navigation config: {}", e));
    let tile = config.tile_size;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(config)
        .add_plugins(NpcNavigationPlugin)
        .insert_resource(manager)
        .add_systems(Startup, move |commands: Commands| spawn_actors(commands, tile))
        .add_systems(PreUpdate, walk_player)
        .add_systems(PostUpdate, report_decisions);
    app.finish();
    app.cleanup();

    for _ in 0..DEMO_TICKS {
        app.update();
    }
    info!("navigation demo finished after {} ticks", DEMO_TICKS);
}

/// Border walls plus two pillars in the middle of the arena.
fn arena_obstacles() -> Vec<(u32, u32)> {
    let mut cells = Vec::new();
    for x in 0..ARENA_WIDTH {
        cells.push((x, 0));
        cells.push((x, ARENA_HEIGHT - 1));
    }
    for y in 1..ARENA_HEIGHT - 1 {
        cells.push((0, y));
        cells.push((ARENA_WIDTH - 1, y));
    }
    for y in 8..14 {
        cells.push((14, y));
        cells.push((26, y));
    }
    cells
}

fn spawn_actors(mut commands: Commands, tile: f32) {
    let at = |x: u32, y: u32| Transform::from_xyz((x as f32 + 0.5) * tile, (y as f32 + 0.5) * tile, 0.0);
    commands.spawn((Player, at(4, 10)));
    // Near, mid-range and far agents relative to the player's route.
    commands.spawn((Agent, at(10, 12)));
    commands.spawn((Agent, at(22, 20)));
    commands.spawn((Agent, at(36, 26)));
}

/// Walk the player back and forth along row 10, ahead of `track_player`.
fn walk_player(mut tick: Local<u32>, mut player_query: Query<&mut Transform, With<Player>>) {
    *tick += 1;
    let Ok(mut transform) = player_query.single_mut() else {
        return;
    };
    let leg = 60;
    let heading = if (*tick / leg) % 2 == 0 { 1.0 } else { -1.0 };
    transform.translation.x += heading * PLAYER_STEP;
}

fn report_decisions(
    mut tick: Local<u32>,
    agents: Query<(Entity, &AgentDecision), With<Agent>>,
) {
    *tick += 1;
    if *tick % 30 != 0 {
        return;
    }
    for (entity, decision) in &agents {
        info!(
            "tick {} agent {:?}: pursuing={} attack={} steps={} next={:?}",
            *tick,
            entity,
            decision.is_pursuing(),
            decision.attack,
            decision.path.steps(),
            decision.path.next_direction()
        );
    }
}
