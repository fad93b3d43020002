//! Emotional Contagion
//!
//! Co-present agents that recently had a positive interaction may pass
//! their emotional state to one another. States are discrete, so contagion
//! overwrites rather than averages.

use bevy_ecs::prelude::*;
use rand::Rng;
use tracing::debug;

use social_events::{AgentId, SocialEvent};

use crate::systems::schedule::TickDelta;
use crate::world::SocialWorld;

impl SocialWorld {
    /// Pairs (a < b) eligible for contagion this tick
    fn contagion_candidates(&self) -> Vec<(AgentId, AgentId)> {
        let now = self.clock.time;
        let window = f64::from(self.config.emotion.recent_interaction_window);
        let radius = self.config.emotion.contagion_radius;

        let mut candidates = Vec::new();
        for id in self.agents.sorted_ids() {
            let Some(agent) = self.agents.get(id) else { continue };
            for (peer, rel) in agent.relationships.range(id..) {
                if *peer == id || rel.recent_positive(now, window).is_none() {
                    continue;
                }
                let co_present = self
                    .positions
                    .distance(id, *peer)
                    .map_or(false, |d| d <= radius);
                if co_present {
                    candidates.push((id, *peer));
                }
            }
        }
        candidates
    }

    /// Per-tick contagion pass
    pub(crate) fn spread_emotions(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let sync_rate = self.config.emotion.sync_rate;
        let overwrite = self.config.emotion.overwrite_probability;

        for (a, b) in self.contagion_candidates() {
            let (Some(agent_a), Some(agent_b)) = (self.agents.get(a), self.agents.get(b)) else {
                continue;
            };
            let probability = (agent_a.empathy + agent_b.empathy) / 2.0 * sync_rate;
            let (state_a, state_b) = (agent_a.emotional_state, agent_b.emotional_state);

            if self.rng.gen::<f32>() >= probability || self.rng.gen::<f32>() >= overwrite {
                continue;
            }
            let (source, target, state) = if self.rng.gen::<bool>() {
                (a, b, state_a)
            } else {
                (b, a, state_b)
            };
            let target_state = if target == a { state_a } else { state_b };
            if target_state == state {
                continue;
            }

            if let Some(agent) = self.agents.get_mut(target) {
                agent.emotional_state = state;
            }
            debug!(%source, %target, %state, "emotional contagion");
            self.emit(SocialEvent::EmotionalContagion { source, target, state });
        }
    }
}

/// System: emotion pass
pub fn spread_emotions(delta: Res<TickDelta>, mut world: ResMut<SocialWorld>) {
    world.spread_emotions(delta.seconds());
}
