//! Frame-level telemetry for the navigation loop.

use bevy::prelude::*;
use micromegas_tracing::prelude::{fmetric, imetric, span_scope};

use crate::components::AgentDecision;

pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Last, navigation_telemetry);
    }
}

fn navigation_telemetry(time: Res<Time>, decisions: Query<&AgentDecision>) {
    span_scope!("navigation_frame");
    let dt_ms = time.delta_secs_f64() * 1000.0;
    fmetric!("frame_time_ms", "ms", dt_ms);

    let path_cells: usize = decisions.iter().map(|d| d.path.len()).sum();
    let attacking = decisions.iter().filter(|d| d.attack).count();
    imetric!("path_cells_total", "count", path_cells as u64);
    imetric!("agents_attacking", "count", attacking as u64);
}
