//! Navigation events triggered by the planning systems and observed by
//! audio, animation or UI code outside this crate.

use bevy::prelude::*;

/// An agent switched from wandering/idling to chasing the player.
#[derive(Event, Debug, Clone, Copy)]
pub struct PursuitStarted {
    pub agent: Entity,
}

/// An agent stopped chasing the player.
#[derive(Event, Debug, Clone, Copy)]
pub struct PursuitEnded {
    pub agent: Entity,
}
