//! Demo Population
//!
//! Seeded random creatures, positions and families for the CLI, plus a
//! small driver that keeps them interacting.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use social_events::AgentId;

use crate::components::agent::{trait_names, Personality, SocialTraits};
use crate::components::bond::{CreatureProfile, FamilyLineage};
use crate::components::relationship::InteractionType;
use crate::components::world::Position;
use crate::error::Result;
use crate::systems::interaction::InteractionRequest;
use crate::world::SocialWorld;

/// Species the demo draws from, with their family
const SPECIES: &[(&str, &str)] = &[("wolf", "canid"), ("fox", "canid"), ("lynx", "felid")];

/// Side length of the square the demo scatters creatures over
const PLANE_SIZE: f32 = 40.0;

/// Genes per creature signature
const GENE_COUNT: usize = 6;

/// Configuration for population spawning
pub struct SpawnConfig {
    pub agents: usize,
    /// Every third creature after the first two parents is born into a family
    pub with_families: bool,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            agents: 24,
            with_families: true,
        }
    }
}

/// Summary of a spawned population
#[derive(Debug, Clone, Default)]
pub struct PopulationSummary {
    pub agents: Vec<AgentId>,
    pub lineages: usize,
}

/// Average of two uniform draws, so traits cluster around the middle
fn rand_trait(rng: &mut SmallRng) -> f32 {
    let a: f32 = rng.gen();
    let b: f32 = rng.gen();
    ((a + b) / 2.0).clamp(0.05, 0.95)
}

fn generate_personality(rng: &mut SmallRng) -> Personality {
    [
        trait_names::OPENNESS,
        trait_names::CONSCIENTIOUSNESS,
        trait_names::EXTRAVERSION,
        trait_names::AGREEABLENESS,
        trait_names::NEUROTICISM,
    ]
    .into_iter()
    .map(|name| (name, rand_trait(rng)))
    .collect()
}

fn generate_social_traits(rng: &mut SmallRng) -> SocialTraits {
    [
        trait_names::EMPATHY,
        trait_names::SOCIAL_SKILL,
        trait_names::LEADERSHIP,
    ]
    .into_iter()
    .map(|name| (name, rand_trait(rng)))
    .collect()
}

fn random_position(rng: &mut SmallRng) -> Position {
    Position::planar(rng.gen_range(0.0..PLANE_SIZE), rng.gen_range(0.0..PLANE_SIZE))
}

/// Register `config.agents` creatures with ids starting at 1. With families
/// enabled, agents are spawned in triples where the third is the child of
/// the first two and shares their species.
pub fn spawn_population(
    world: &mut SocialWorld,
    config: &SpawnConfig,
    rng: &mut SmallRng,
) -> Result<PopulationSummary> {
    let mut summary = PopulationSummary::default();
    let mut species = SPECIES[0];

    for i in 0..config.agents {
        let id = AgentId(i as u32 + 1);
        let slot = i % 3;
        if slot == 0 || !config.with_families {
            if let Some(choice) = SPECIES.choose(rng) {
                species = *choice;
            }
        }

        world.register_agent(id, generate_personality(rng), generate_social_traits(rng))?;
        world.set_position(id, random_position(rng))?;

        let age = if config.with_families && slot == 2 {
            rng.gen_range(0.1..1.0)
        } else {
            rng.gen_range(1.0..8.0)
        };
        let genes = (0..GENE_COUNT).map(|_| rng.gen::<f32>()).collect();
        world.set_creature_profile(id, CreatureProfile::new(species.0, species.1, age).with_genes(genes))?;
        summary.agents.push(id);

        if config.with_families && slot == 2 {
            let lineage = FamilyLineage::new(AgentId(id.0 - 2), Some(AgentId(id.0 - 1)), 1).with_offspring(id);
            world.register_lineage(lineage)?;
            summary.lineages += 1;
        }
    }

    Ok(summary)
}

/// Queue `count` random interactions between distinct agents
pub fn queue_random_interactions(world: &mut SocialWorld, rng: &mut SmallRng, count: usize) {
    let ids: Vec<AgentId> = world.agents().map(|a| a.id).collect();
    if ids.len() < 2 {
        return;
    }
    for _ in 0..count {
        let pair: Vec<AgentId> = ids.choose_multiple(rng, 2).copied().collect();
        let Some(interaction_type) = InteractionType::all().choose(rng).copied() else {
            continue;
        };
        let mut request = InteractionRequest::new(pair[0], pair[1], interaction_type);
        if let Some(position) = world.position(pair[0]) {
            request = request.at(position);
        }
        world.queue_interaction(request);
    }
}

/// Nudge every creature a small random step, keeping it on the plane
pub fn wander(world: &mut SocialWorld, rng: &mut SmallRng, step: f32) {
    let ids: Vec<AgentId> = world.agents().map(|a| a.id).collect();
    for id in ids {
        let Some(mut position) = world.position(id) else { continue };
        position.x = (position.x + rng.gen_range(-step..=step)).clamp(0.0, PLANE_SIZE);
        position.y = (position.y + rng.gen_range(-step..=step)).clamp(0.0, PLANE_SIZE);
        if let Err(e) = world.set_position(id, position) {
            warn!(agent = %id, error = %e, "wander skipped");
        }
    }
}

/// Try to bond every pair of creatures standing within `range` of each
/// other. Returns the number of bonds formed.
pub fn propose_bonds(world: &mut SocialWorld, range: f32) -> usize {
    let mut ids: Vec<AgentId> = world.agents().map(|a| a.id).collect();
    ids.sort();
    let mut formed = 0;
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            let close = match (world.position(*a), world.position(*b)) {
                (Some(pa), Some(pb)) => pa.distance(&pb) <= range,
                _ => false,
            };
            if close && matches!(world.try_form_bond(*a, *b), Ok(Some(_))) {
                formed += 1;
            }
        }
    }
    formed
}

/// Form a group around each ungrouped creature from its friendliest
/// ungrouped peers. Returns the number of groups formed.
pub fn propose_groups(world: &mut SocialWorld, purpose: &str) -> usize {
    let max = world.config().groups.max_group_size;
    let mut ids: Vec<AgentId> = world
        .agents()
        .filter(|a| a.groups.is_empty())
        .map(|a| a.id)
        .collect();
    ids.sort();

    let mut formed = 0;
    let mut taken: Vec<AgentId> = Vec::new();
    for id in ids {
        if taken.contains(&id) {
            continue;
        }
        let Some(agent) = world.agent(id) else { continue };
        let mut friends: Vec<(AgentId, f32)> = agent
            .relationships
            .values()
            .filter(|r| r.relationship_type.is_positive() && !taken.contains(&r.peer))
            .filter(|r| world.agent(r.peer).map_or(false, |p| p.groups.is_empty()))
            .map(|r| (r.peer, r.strength))
            .collect();
        friends.sort_by(|x, y| y.1.total_cmp(&x.1).then(x.0.cmp(&y.0)));
        friends.truncate(max - 1);
        if friends.is_empty() {
            continue;
        }

        let mut members = vec![id];
        members.extend(friends.iter().map(|(peer, _)| *peer));
        if world.form_group(&members, purpose).is_ok() {
            taken.extend(members);
            formed += 1;
        }
    }
    formed
}
