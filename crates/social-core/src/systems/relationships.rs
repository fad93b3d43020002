//! Relationship Decay
//!
//! Without interaction, every relationship drifts back toward neutral.

use bevy_ecs::prelude::*;

use social_events::AgentId;

use crate::systems::schedule::TickDelta;
use crate::world::SocialWorld;

impl SocialWorld {
    /// Move every relationship's strength toward zero by
    /// `relationship_decay_rate * dt`. Both records of a pair start equal
    /// and receive the same step, so they stay mirrored.
    pub(crate) fn decay_relationships(&mut self, dt: f32) {
        let amount = self.config.network.relationship_decay_rate * dt;
        if amount <= 0.0 {
            return;
        }

        let mut edges: Vec<(AgentId, AgentId, f32)> = Vec::new();
        for agent in self.agents.iter_mut() {
            let id = agent.id;
            for (peer, rel) in agent.relationships.iter_mut() {
                if rel.decay_toward_neutral(amount) && id < *peer {
                    edges.push((id, *peer, rel.strength));
                }
            }
        }

        for (a, b, strength) in edges {
            self.network.update_edge(a, b, strength);
        }
    }
}

/// System: decay relationships
pub fn decay_relationships(delta: Res<TickDelta>, mut world: ResMut<SocialWorld>) {
    world.decay_relationships(delta.seconds());
}

#[cfg(test)]
mod tests {
    use crate::components::agent::{Personality, SocialTraits};
    use crate::components::relationship::InteractionType;
    use crate::config::SocialConfig;
    use crate::world::SocialWorld;
    use social_events::{AgentId, RelationshipType};

    fn bonded_world() -> SocialWorld {
        let mut config = SocialConfig::default();
        config.network.relationship_decay_rate = 0.1;
        let mut world = SocialWorld::new(config, 3).unwrap();
        for n in 1..=2 {
            world
                .register_agent(AgentId(n), Personality::new(), SocialTraits::new())
                .unwrap();
        }
        for _ in 0..3 {
            world
                .resolve_interaction(AgentId(1), AgentId(2), InteractionType::Cooperation, None, 0.9)
                .unwrap();
        }
        world
    }

    #[test]
    fn test_decay_is_mirrored_and_demotes_bond() {
        let mut world = bonded_world();
        assert_eq!(
            world.get_relationship(AgentId(1), AgentId(2)).unwrap().relationship_type,
            RelationshipType::Bond
        );

        world.decay_relationships(4.0);
        let ab = world.get_relationship(AgentId(1), AgentId(2)).unwrap();
        let ba = world.get_relationship(AgentId(2), AgentId(1)).unwrap();
        assert_eq!(ab.strength, ba.strength);
        assert!((ab.strength - 0.6).abs() < 1e-5);
        assert_eq!(ab.relationship_type, RelationshipType::Friendly);
        assert_eq!(world.network().weight(AgentId(1), AgentId(2)), Some(ab.strength));
    }

    #[test]
    fn test_decay_removes_weak_edges() {
        let mut world = bonded_world();
        world.decay_relationships(20.0);
        assert_eq!(world.get_relationship(AgentId(1), AgentId(2)).unwrap().strength, 0.0);
        assert_eq!(world.network().weight(AgentId(1), AgentId(2)), None);
    }

    #[test]
    fn test_zero_delta_is_a_no_op() {
        let mut world = bonded_world();
        let before = world.get_relationship(AgentId(1), AgentId(2)).unwrap().strength;
        world.decay_relationships(0.0);
        assert_eq!(world.get_relationship(AgentId(1), AgentId(2)).unwrap().strength, before);
    }
}
