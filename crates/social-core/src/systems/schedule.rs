//! Tick Schedule
//!
//! Wires the engine passes into a `bevy_ecs` schedule for hosts that drive
//! the simulation through an ECS world. One run of the schedule is one call
//! to `SocialWorld::update_tick`, followed by an event drain.

use bevy_ecs::prelude::*;
use tracing::warn;

use crate::events::{EventLogger, TickEvents};
use crate::world::{effective_delta, SocialWorld};

use super::{bonding, culture, emotion, groups, interaction, relationships};

/// Resource: time covered by the next tick
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct TickDelta(pub f32);

impl Default for TickDelta {
    fn default() -> Self {
        Self(1.0)
    }
}

impl TickDelta {
    /// Usable delta: negative or non-finite values count as zero
    pub fn seconds(&self) -> f32 {
        effective_delta(self.0)
    }
}

/// System: advance the simulation clock
pub fn advance_clock(delta: Res<TickDelta>, mut world: ResMut<SocialWorld>) {
    if delta.seconds() != delta.0 {
        warn!(delta = delta.0, "non-positive tick delta treated as zero");
    }
    world.clock.advance(delta.seconds());
}

/// System: move this tick's events into `TickEvents` and the log file
pub fn drain_tick_events(
    mut world: ResMut<SocialWorld>,
    mut tick_events: ResMut<TickEvents>,
    logger: Option<ResMut<EventLogger>>,
) {
    tick_events.records = world.drain_events();
    if let Some(mut logger) = logger {
        if let Err(e) = logger.log_batch(&tick_events.records) {
            warn!("failed to log events: {}", e);
        }
    }
}

/// Build the per-tick schedule. Requires `SocialWorld`, `TickDelta` and
/// `TickEvents` resources; `EventLogger` is optional.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            interaction::run_interactions,
            relationships::decay_relationships,
            groups::update_groups,
            culture::evolve_culture,
            emotion::spread_emotions,
            bonding::update_bonds,
            advance_clock,
            drain_tick_events,
        )
            .chain(),
    );
    schedule
}
