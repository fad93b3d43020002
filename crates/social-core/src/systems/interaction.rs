//! Interaction Evaluator
//!
//! Scores a pairwise interaction, rolls its outcome and applies the effects:
//! mirrored relationship change, empathy gain, communication gain and
//! cultural exchange.

use bevy_ecs::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use social_events::{AgentId, CulturalTrait, RelationshipType, SocialEvent};

use crate::components::agent::{trait_names, Personality, SocialAgent};
use crate::components::relationship::{
    InteractionOutcome, InteractionRecord, InteractionType, SocialRelationship,
};
use crate::components::world::Position;
use crate::error::Result;
use crate::systems::schedule::TickDelta;
use crate::world::SocialWorld;

/// Success is always kept within this range
pub const MIN_SUCCESS: f32 = 0.1;
pub const MAX_SUCCESS: f32 = 0.9;

/// Empathy gain multiplier for nurturing interaction types
const NURTURING_EMPATHY_BOOST: f32 = 1.5;

/// Communication gain multiplier for talk-heavy interaction types
const VERBAL_COMMUNICATION_BOOST: f32 = 2.0;

/// An interaction submitted by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRequest {
    pub a: AgentId,
    pub b: AgentId,
    pub interaction_type: InteractionType,
    pub location: Option<Position>,
}

impl InteractionRequest {
    pub fn new(a: AgentId, b: AgentId, interaction_type: InteractionType) -> Self {
        Self {
            a,
            b,
            interaction_type,
            location: None,
        }
    }

    pub fn at(mut self, location: Position) -> Self {
        self.location = Some(location);
        self
    }
}

/// What an interaction did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionResult {
    pub success: f32,
    pub outcome: InteractionOutcome,
    /// Strength change applied to both records
    pub delta: f32,
    /// Mirrored strength after the interaction
    pub strength: f32,
    pub empathy_gain: f32,
    /// Social skill gained by both agents
    pub communication_gain: f32,
    /// Cultural traits that flowed from b to a
    pub traits_exchanged: usize,
}

/// Scales both the success score and the relationship delta
pub fn type_modifier(interaction_type: InteractionType) -> f32 {
    match interaction_type {
        InteractionType::Cooperation => 1.2,
        InteractionType::Grooming => 1.1,
        InteractionType::Play => 1.1,
        InteractionType::Teaching => 1.0,
        InteractionType::Communication => 1.0,
        InteractionType::Competition => 0.8,
        InteractionType::Conflict => 0.6,
    }
}

/// Personality fit in -1.0..=1.0.
///
/// Agreeableness, conscientiousness and neuroticism reward similarity;
/// extraversion scores best at a moderate gap of 0.3; openness rewards mild
/// similarity. Each rule scores 0..=1 and the mean is mapped onto -1..=1.
pub fn personality_compatibility(a: &Personality, b: &Personality) -> f32 {
    let gap = |name: &str| (a.get(name) - b.get(name)).abs();

    let scores = [
        1.0 - gap(trait_names::AGREEABLENESS),
        1.0 - gap(trait_names::CONSCIENTIOUSNESS),
        1.0 - gap(trait_names::NEUROTICISM),
        (1.0 - (gap(trait_names::EXTRAVERSION) - 0.3).abs() / 0.7).clamp(0.0, 1.0),
        1.0 - 0.5 * gap(trait_names::OPENNESS),
    ];
    let mean = scores.iter().sum::<f32>() / scores.len() as f32;
    (2.0 * mean - 1.0).clamp(-1.0, 1.0)
}

/// Success score for an interaction between two agents
pub fn interaction_success(a: &SocialAgent, b: &SocialAgent, interaction_type: InteractionType) -> f32 {
    let compatibility = personality_compatibility(&a.personality, &b.personality);
    let base = 0.5
        + 0.3 * compatibility
        + 0.1 * (a.social_skill() + b.social_skill())
        + 0.2 * a.relationship_strength(b.id);
    (base * type_modifier(interaction_type)).clamp(MIN_SUCCESS, MAX_SUCCESS)
}

/// Roll an outcome. `roll` is a uniform draw in 0..1 that jitters the
/// type's threshold between half and one and a half times its base value.
pub fn determine_outcome(interaction_type: InteractionType, success: f32, roll: f32) -> InteractionOutcome {
    let jitter = 0.5 + roll;
    let positive_base = match interaction_type {
        InteractionType::Cooperation => Some(0.3),
        InteractionType::Grooming => Some(0.25),
        InteractionType::Play => Some(0.3),
        InteractionType::Teaching => Some(0.4),
        InteractionType::Communication => Some(0.35),
        InteractionType::Competition | InteractionType::Conflict => None,
    };

    if let Some(base) = positive_base {
        let threshold = base * jitter;
        return if success > threshold {
            InteractionOutcome::Positive
        } else if success > threshold * 0.5 {
            InteractionOutcome::Neutral
        } else {
            InteractionOutcome::Negative
        };
    }

    let negative_base = if interaction_type == InteractionType::Conflict {
        0.7
    } else {
        0.5
    };
    let threshold = negative_base * jitter;
    if success < threshold {
        InteractionOutcome::Negative
    } else if success < threshold + 0.2 {
        InteractionOutcome::Neutral
    } else {
        InteractionOutcome::Positive
    }
}

/// Relationship strength change for an outcome
pub fn relationship_delta(outcome: InteractionOutcome, success: f32, interaction_type: InteractionType) -> f32 {
    let raw = match outcome {
        InteractionOutcome::Positive => 0.1 + 0.2 * success,
        InteractionOutcome::Neutral => 0.02,
        InteractionOutcome::Negative => -0.05 - 0.1 * (1.0 - success),
    };
    raw * type_modifier(interaction_type)
}

/// Empathy gained by both agents (positive outcomes only)
pub fn empathy_gain(
    outcome: InteractionOutcome,
    interaction_type: InteractionType,
    empathy_a: f32,
    base_gain: f32,
) -> f32 {
    if outcome != InteractionOutcome::Positive {
        return 0.0;
    }
    let gain = base_gain * (empathy_a + 0.5);
    match interaction_type {
        InteractionType::Grooming | InteractionType::Teaching | InteractionType::Cooperation => {
            gain * NURTURING_EMPATHY_BOOST
        }
        _ => gain,
    }
}

/// Social skill gained by both agents. Positive outcomes teach the most,
/// neutral ones half as much, and negative ones nothing.
pub fn communication_gain(
    outcome: InteractionOutcome,
    interaction_type: InteractionType,
    success: f32,
    base_gain: f32,
) -> f32 {
    let gain = match outcome {
        InteractionOutcome::Positive => base_gain * success,
        InteractionOutcome::Neutral => 0.5 * base_gain * success,
        InteractionOutcome::Negative => return 0.0,
    };
    match interaction_type {
        InteractionType::Communication | InteractionType::Teaching => gain * VERBAL_COMMUNICATION_BOOST,
        _ => gain,
    }
}

impl SocialWorld {
    /// Evaluate and apply an interaction right away
    pub fn process_interaction(
        &mut self,
        a: AgentId,
        b: AgentId,
        interaction_type: InteractionType,
        location: Option<Position>,
    ) -> Result<InteractionResult> {
        let success = {
            let (agent_a, agent_b) = self.agents.get_pair_mut(a, b).map_err(|e| {
                warn!(%a, %b, error = %e, "interaction skipped");
                e
            })?;
            interaction_success(agent_a, agent_b, interaction_type)
        };
        self.resolve_interaction(a, b, interaction_type, location, success)
    }

    /// Apply an interaction whose success score is already known
    pub fn resolve_interaction(
        &mut self,
        a: AgentId,
        b: AgentId,
        interaction_type: InteractionType,
        location: Option<Position>,
        success: f32,
    ) -> Result<InteractionResult> {
        let success = success.clamp(MIN_SUCCESS, MAX_SUCCESS);
        let now = self.clock.time;
        let history_capacity = self.config.interaction.history_capacity;
        let global_rate = self.config.interaction.global_transmission_rate;
        let exchange_min = self.config.interaction.cultural_exchange_min_success;
        let adopted_factor = self.config.interaction.adopted_trait_factor;
        let base_gain = self.config.interaction.empathy_base_gain;
        let communication_base = self.config.interaction.communication_base_gain;

        let (agent_a, agent_b) = self.agents.get_pair_mut(a, b).map_err(|e| {
            warn!(%a, %b, error = %e, "interaction skipped");
            e
        })?;

        let outcome = determine_outcome(interaction_type, success, self.rng.gen::<f32>());
        let delta = relationship_delta(outcome, success, interaction_type);
        let gain = empathy_gain(outcome, interaction_type, agent_a.empathy, base_gain);
        let skill_gain = communication_gain(outcome, interaction_type, success, communication_base);

        let mut traits_exchanged = 0;
        if success >= exchange_min {
            let offered: Vec<CulturalTrait> = agent_b.cultural_traits.clone();
            for offered_trait in offered {
                if self.rng.gen::<f32>() >= offered_trait.transmission_rate * global_rate {
                    continue;
                }
                match agent_a.cultural_trait_mut(&offered_trait.name) {
                    Some(existing) => {
                        existing.value = ((existing.value + offered_trait.value) / 2.0).clamp(0.0, 1.0);
                    }
                    None => {
                        let mut adopted = offered_trait.clone();
                        adopted.value = (offered_trait.value * adopted_factor).clamp(0.0, 1.0);
                        agent_a.cultural_traits.push(adopted);
                    }
                }
                traits_exchanged += 1;
            }
        }

        let strength = (agent_a.relationship_strength(b) + delta).clamp(-1.0, 1.0);
        let record = InteractionRecord {
            time: now,
            interaction_type,
            outcome,
            success,
            delta,
            location,
        };

        let rel_a = agent_a
            .relationships
            .entry(b)
            .or_insert_with(|| SocialRelationship::new(b, now, history_capacity));
        rel_a.record_interaction(record.clone(), strength);
        let newly_bonded = rel_a.relationship_type == RelationshipType::Bond && !rel_a.bond_announced;
        if newly_bonded {
            rel_a.bond_announced = true;
        }

        let rel_b = agent_b
            .relationships
            .entry(a)
            .or_insert_with(|| SocialRelationship::new(a, now, history_capacity));
        rel_b.record_interaction(record, strength);
        if newly_bonded {
            rel_b.bond_announced = true;
        }

        agent_a.adjust_empathy(gain);
        agent_b.adjust_empathy(gain);
        agent_a.adjust_social_skill(skill_gain);
        agent_b.adjust_social_skill(skill_gain);
        agent_a.social_experience += 1;
        agent_b.social_experience += 1;

        self.network.update_edge(a, b, strength);

        debug!(
            %a, %b, ?interaction_type, ?outcome, success, delta, strength,
            "interaction resolved"
        );

        if newly_bonded {
            let (first, second) = AgentId::ordered_pair(a, b);
            self.emit(SocialEvent::RelationshipFormed {
                a: first,
                b: second,
                relationship_type: RelationshipType::Bond,
            });
        }

        Ok(InteractionResult {
            success,
            outcome,
            delta,
            strength,
            empathy_gain: gain,
            communication_gain: skill_gain,
            traits_exchanged,
        })
    }

    /// Defer an interaction to the next tick
    pub fn queue_interaction(&mut self, request: InteractionRequest) {
        self.pending.push_back(request);
    }

    pub fn pending_interactions(&self) -> usize {
        self.pending.len()
    }

    /// Resolve every queued interaction in submission order. Requests whose
    /// agents are gone are logged and dropped. A zero-length tick leaves the
    /// queue for the next one so that it changes no strength.
    pub(crate) fn run_pending_interactions(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        while let Some(request) = self.pending.pop_front() {
            // Failures are already logged by process_interaction
            let _ = self.process_interaction(
                request.a,
                request.b,
                request.interaction_type,
                request.location,
            );
        }
    }
}

/// System: resolve queued interactions
pub fn run_interactions(delta: Res<TickDelta>, mut world: ResMut<SocialWorld>) {
    world.run_pending_interactions(delta.seconds());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::SocialTraits;
    use crate::config::SocialConfig;

    fn personality(values: [f32; 5]) -> Personality {
        [
            (trait_names::OPENNESS, values[0]),
            (trait_names::CONSCIENTIOUSNESS, values[1]),
            (trait_names::EXTRAVERSION, values[2]),
            (trait_names::AGREEABLENESS, values[3]),
            (trait_names::NEUROTICISM, values[4]),
        ]
        .into_iter()
        .collect()
    }

    fn world_with_pair() -> SocialWorld {
        let mut world = SocialWorld::new(SocialConfig::default(), 11).unwrap();
        let p = personality([0.6, 0.6, 0.5, 0.7, 0.3]);
        world
            .register_agent(AgentId(1), p.clone(), SocialTraits::new())
            .unwrap();
        world.register_agent(AgentId(2), p, SocialTraits::new()).unwrap();
        world
    }

    #[test]
    fn test_compatibility_range() {
        let same = personality([0.5; 5]);
        let c = personality_compatibility(&same, &same);
        assert!(c > 0.8 && c <= 1.0);

        let a = personality([0.0, 0.0, 0.0, 0.0, 0.0]);
        let b = personality([1.0, 1.0, 1.0, 1.0, 1.0]);
        let c = personality_compatibility(&a, &b);
        assert!(c >= -1.0 && c < 0.0);
    }

    #[test]
    fn test_success_is_clamped() {
        let mut agent_a = SocialAgent::new(AgentId(1), personality([0.5; 5]), SocialTraits::new());
        let agent_b = SocialAgent::new(AgentId(2), personality([0.5; 5]), SocialTraits::new());
        let mut rel = SocialRelationship::new(AgentId(2), 0.0, 20);
        rel.set_strength(1.0);
        agent_a.relationships.insert(AgentId(2), rel);
        assert_eq!(interaction_success(&agent_a, &agent_b, InteractionType::Cooperation), MAX_SUCCESS);

        let lone_a = SocialAgent::new(AgentId(1), personality([0.0; 5]), SocialTraits::new());
        let lone_b = SocialAgent::new(AgentId(2), personality([1.0; 5]), SocialTraits::new());
        let s = interaction_success(&lone_a, &lone_b, InteractionType::Conflict);
        assert!((MIN_SUCCESS..=MAX_SUCCESS).contains(&s));
    }

    #[test]
    fn test_outcome_thresholds() {
        assert_eq!(
            determine_outcome(InteractionType::Cooperation, 0.9, 0.99),
            InteractionOutcome::Positive
        );
        assert_eq!(
            determine_outcome(InteractionType::Teaching, 0.1, 0.9),
            InteractionOutcome::Negative
        );
        assert_eq!(
            determine_outcome(InteractionType::Conflict, 0.2, 0.5),
            InteractionOutcome::Negative
        );
        assert_eq!(
            determine_outcome(InteractionType::Competition, 0.9, 0.0),
            InteractionOutcome::Positive
        );
    }

    #[test]
    fn test_delta_values() {
        let d = relationship_delta(InteractionOutcome::Positive, 0.9, InteractionType::Cooperation);
        assert!((d - 0.336).abs() < 1e-5);
        let d = relationship_delta(InteractionOutcome::Neutral, 0.5, InteractionType::Communication);
        assert!((d - 0.02).abs() < 1e-6);
        let d = relationship_delta(InteractionOutcome::Negative, 0.5, InteractionType::Conflict);
        assert!((d + 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_empathy_gain_only_on_positive() {
        let g = empathy_gain(InteractionOutcome::Positive, InteractionType::Grooming, 0.5, 0.01);
        assert!((g - 0.015).abs() < 1e-6);
        let g = empathy_gain(InteractionOutcome::Positive, InteractionType::Play, 0.5, 0.01);
        assert!((g - 0.01).abs() < 1e-6);
        assert_eq!(
            empathy_gain(InteractionOutcome::Neutral, InteractionType::Grooming, 0.5, 0.01),
            0.0
        );
    }

    #[test]
    fn test_communication_gain_by_outcome() {
        let g = communication_gain(InteractionOutcome::Positive, InteractionType::Communication, 0.8, 0.005);
        assert!((g - 0.008).abs() < 1e-6);
        let g = communication_gain(InteractionOutcome::Positive, InteractionType::Play, 0.8, 0.005);
        assert!((g - 0.004).abs() < 1e-6);
        let g = communication_gain(InteractionOutcome::Neutral, InteractionType::Play, 0.8, 0.005);
        assert!((g - 0.002).abs() < 1e-6);
        assert_eq!(
            communication_gain(InteractionOutcome::Negative, InteractionType::Teaching, 0.9, 0.005),
            0.0
        );
    }

    #[test]
    fn test_communication_gain_raises_social_skill() {
        let mut world = world_with_pair();
        let before = world.agent(AgentId(2)).unwrap().social_skill();
        let result = world
            .resolve_interaction(AgentId(1), AgentId(2), InteractionType::Communication, None, 0.9)
            .unwrap();
        assert_eq!(result.outcome, InteractionOutcome::Positive);
        assert!(result.communication_gain > 0.0);
        let after_a = world.agent(AgentId(1)).unwrap().social_skill();
        let after_b = world.agent(AgentId(2)).unwrap().social_skill();
        assert!((after_b - before - result.communication_gain).abs() < 1e-6);
        assert_eq!(after_a, after_b);
    }

    #[test]
    fn test_relationship_is_mirrored() {
        let mut world = world_with_pair();
        for _ in 0..5 {
            world
                .process_interaction(AgentId(1), AgentId(2), InteractionType::Play, None)
                .unwrap();
        }
        let ab = world.get_relationship(AgentId(1), AgentId(2)).unwrap();
        let ba = world.get_relationship(AgentId(2), AgentId(1)).unwrap();
        assert_eq!(ab.strength, ba.strength);
        assert_eq!(ab.interaction_count, 5);
        assert_eq!(world.agent(AgentId(1)).unwrap().social_experience, 5);
    }

    #[test]
    fn test_unregistered_agent_is_an_error() {
        let mut world = world_with_pair();
        assert!(world
            .process_interaction(AgentId(1), AgentId(9), InteractionType::Play, None)
            .is_err());
        assert!(world.get_relationship(AgentId(1), AgentId(9)).is_none());
    }

    #[test]
    fn test_bond_announced_once() {
        let mut world = world_with_pair();
        for _ in 0..6 {
            world
                .resolve_interaction(AgentId(1), AgentId(2), InteractionType::Cooperation, None, 0.9)
                .unwrap();
        }
        let formed = world
            .drain_events()
            .into_iter()
            .filter(|r| matches!(r.event, SocialEvent::RelationshipFormed { .. }))
            .count();
        assert_eq!(formed, 1);
        assert_eq!(
            world.get_relationship(AgentId(2), AgentId(1)).unwrap().relationship_type,
            RelationshipType::Bond
        );
    }

    #[test]
    fn test_queued_interactions_run_on_tick() {
        let mut world = world_with_pair();
        world.queue_interaction(InteractionRequest::new(AgentId(1), AgentId(2), InteractionType::Grooming));
        world.queue_interaction(InteractionRequest::new(AgentId(1), AgentId(7), InteractionType::Grooming));
        assert_eq!(world.pending_interactions(), 2);
        world.update_tick(0.0);
        assert_eq!(world.pending_interactions(), 2);
        world.update_tick(1.0);
        assert_eq!(world.pending_interactions(), 0);
        assert_eq!(
            world.get_relationship(AgentId(1), AgentId(2)).unwrap().interaction_count,
            1
        );
    }
}
