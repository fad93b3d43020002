//! Cultural Evolution
//!
//! Random drift of existing traits plus occasional innovations that seed a
//! brand-new trait in one agent.

use bevy_ecs::prelude::*;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info};

use social_events::{CulturalTrait, InnovationRecord, SocialEvent};

use crate::output::report::CultureTraitSummary;
use crate::systems::schedule::TickDelta;
use crate::world::SocialWorld;

/// Stability of a freshly innovated trait
const INNOVATION_STABILITY: f32 = 0.2;
/// Transmission rate of a freshly innovated trait
const INNOVATION_TRANSMISSION: f32 = 0.5;

/// Innovation log
#[derive(Debug, Default)]
pub struct CultureState {
    innovations: Vec<InnovationRecord>,
    next_innovation_id: u32,
}

impl CultureState {
    pub fn new() -> Self {
        Self {
            innovations: Vec::new(),
            next_innovation_id: 1,
        }
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_innovation_id.max(1);
        self.next_innovation_id = id + 1;
        id
    }

    pub fn innovations(&self) -> &[InnovationRecord] {
        &self.innovations
    }
}

/// Population variance of a set of values
fn variance(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32
}

impl SocialWorld {
    /// Per-tick culture pass: mutate, then maybe innovate
    pub(crate) fn evolve_culture(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let mutation_chance = self.config.culture.mutation_rate * dt;
        let magnitude = self.config.culture.mutation_magnitude;

        for agent in self.agents.iter_mut() {
            for cultural_trait in agent.cultural_traits.iter_mut() {
                if self.rng.gen::<f32>() >= mutation_chance {
                    continue;
                }
                let step = self.rng.gen_range(-magnitude..=magnitude) * (1.0 - cultural_trait.stability);
                cultural_trait.value = (cultural_trait.value + step).clamp(0.0, 1.0);
            }
        }

        if self.agents.is_empty() || self.rng.gen::<f32>() >= self.config.culture.innovation_rate * dt {
            return;
        }
        self.innovate();
    }

    /// Give a random agent a brand-new trait and announce it
    fn innovate(&mut self) {
        let ids = self.agents.sorted_ids();
        let originator = ids[self.rng.gen_range(0..ids.len())];
        let innovation_id = self.culture.allocate_id();
        let cultural_trait = CulturalTrait::new(
            format!("innovation_{}", innovation_id),
            self.rng.gen_range(0.3..=0.8),
            INNOVATION_STABILITY,
            INNOVATION_TRANSMISSION,
        );

        if let Some(agent) = self.agents.get_mut(originator) {
            agent.cultural_traits.push(cultural_trait.clone());
        }
        let innovation = InnovationRecord {
            innovation_id,
            originator,
            cultural_trait: cultural_trait.clone(),
            time: self.clock.time,
        };
        self.culture.innovations.push(innovation.clone());

        info!(innovation_id, originator = %originator, name = %cultural_trait.name, "cultural innovation");
        self.emit(SocialEvent::CulturalInnovation {
            cultural_trait,
            innovation,
        });
    }

    /// Every innovation so far, oldest first
    pub fn innovations(&self) -> &[InnovationRecord] {
        self.culture.innovations()
    }

    /// One summary per trait name across all agents, ordered by name
    pub fn get_global_culture(&self) -> Vec<CultureTraitSummary> {
        let mut values: BTreeMap<&str, Vec<f32>> = BTreeMap::new();
        for agent in self.agents.iter() {
            for cultural_trait in &agent.cultural_traits {
                values
                    .entry(cultural_trait.name.as_str())
                    .or_default()
                    .push(cultural_trait.value);
            }
        }

        let population = self.agents.len().max(1) as f32;
        values
            .into_iter()
            .map(|(name, vals)| CultureTraitSummary {
                name: name.to_string(),
                mean_value: vals.iter().sum::<f32>() / vals.len() as f32,
                prevalence: vals.len() as f32 / population,
                carriers: vals.len(),
                variance: variance(&vals),
            })
            .collect()
    }

    /// Mean per-trait-name variance (0.0 with no traits)
    pub fn cultural_diversity(&self) -> f32 {
        let summaries = self.get_global_culture();
        if summaries.is_empty() {
            return 0.0;
        }
        let diversity = summaries.iter().map(|s| s.variance).sum::<f32>() / summaries.len() as f32;
        debug!(diversity, traits = summaries.len(), "cultural diversity");
        diversity
    }
}

/// System: culture pass
pub fn evolve_culture(delta: Res<TickDelta>, mut world: ResMut<SocialWorld>) {
    world.evolve_culture(delta.seconds());
}
