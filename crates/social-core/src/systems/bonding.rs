//! Generational Bonding Memory
//!
//! Typed bonds between creatures grow with proximity and fade with
//! separation. Strong or lost bonds leave generational memories, which feed
//! back into bond growth and are inherited, weakened, by offspring.
//!
//! The per-tick bond update is two-phase: every new strength is computed
//! from a read-only view first, then all updates are applied in key order.

use bevy_ecs::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, trace, warn};

use social_events::{AgentId, BondMilestone, BondType, SocialEvent};

use crate::components::bond::{
    growth_multiplier, ActiveBond, BondState, CreatureProfile, FamilyLineage, GenerationalMemory,
    MemoryLog,
};
use crate::config::BondingConfig;
use crate::error::{Result, SocialError};
use crate::systems::interaction::personality_compatibility;
use crate::systems::schedule::TickDelta;
use crate::world::SocialWorld;

/// Strength movement that triggers a strength-changed event
const STRENGTH_REPORT_STEP: f32 = 0.05;

/// Peak strength a bond needs to leave a memory behind when it breaks
const MEMORABLE_PEAK: f32 = 0.5;

/// Emotional weight given to memories written by the bonding engine
const BOND_MEMORY_WEIGHT: f32 = 0.8;

/// All bond, memory, lineage and profile state
#[derive(Debug, Default)]
pub struct BondingState {
    /// Keyed by (source, target)
    bonds: BTreeMap<(AgentId, AgentId), ActiveBond>,
    memories: BTreeMap<AgentId, MemoryLog>,
    lineages: Vec<FamilyLineage>,
    profiles: HashMap<AgentId, CreatureProfile>,
    /// Parent memories already copied into a child
    inherited: BTreeSet<InheritedKey>,
}

/// A parent memory as seen by one child: (child, parent, target, bond type)
type InheritedKey = (AgentId, AgentId, AgentId, BondType);

impl BondingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bond(&self, source: AgentId, target: AgentId) -> Option<&ActiveBond> {
        self.bonds.get(&(source, target))
    }

    fn has_bond_between(&self, a: AgentId, b: AgentId) -> bool {
        self.bonds.contains_key(&(a, b)) || self.bonds.contains_key(&(b, a))
    }

    fn has_mate(&self, agent: AgentId) -> bool {
        self.bonds
            .range((agent, AgentId(0))..=(agent, AgentId(u32::MAX)))
            .any(|(_, bond)| bond.bond_type == BondType::Mate)
    }

    fn is_parent_of(&self, parent: AgentId, child: AgentId) -> bool {
        self.lineages
            .iter()
            .any(|l| l.is_parent(parent) && l.offspring.contains(&child))
    }

    fn are_siblings(&self, a: AgentId, b: AgentId) -> bool {
        self.lineages
            .iter()
            .any(|l| l.offspring.contains(&a) && l.offspring.contains(&b))
    }

    fn memory_log(&mut self, agent: AgentId, capacity: usize) -> &mut MemoryLog {
        self.memories
            .entry(agent)
            .or_insert_with(|| MemoryLog::new(capacity))
    }

    /// Drop every bond touching an agent along with its memories and profile
    pub(crate) fn forget_agent(&mut self, agent: AgentId) {
        self.bonds
            .retain(|(source, target), _| *source != agent && *target != agent);
        self.memories.remove(&agent);
        self.profiles.remove(&agent);
        self.inherited
            .retain(|(child, parent, _, _)| *child != agent && *parent != agent);
    }
}

/// Computed in the read phase, applied in the write phase
struct BondUpdate {
    key: (AgentId, AgentId),
    strength: f32,
}

impl SocialWorld {
    /// Supply genetics-side facts about a creature
    pub fn set_creature_profile(&mut self, id: AgentId, profile: CreatureProfile) -> Result<()> {
        if !self.agents.contains(id) {
            return Err(SocialError::AgentNotFound(id));
        }
        self.bonding.profiles.insert(id, profile);
        Ok(())
    }

    pub fn creature_profile(&self, id: AgentId) -> Option<&CreatureProfile> {
        self.bonding.profiles.get(&id)
    }

    /// Record a family. From the next bonding pass on, each parent memory
    /// is copied into each child once.
    pub fn register_lineage(&mut self, lineage: FamilyLineage) -> Result<()> {
        for id in lineage.parents().chain(lineage.offspring.iter().copied()) {
            if !self.agents.contains(id) {
                warn!(agent = %id, "lineage rejected: agent not registered");
                return Err(SocialError::AgentNotFound(id));
            }
        }
        debug!(parent = %lineage.parent1, children = lineage.offspring.len(), "lineage registered");
        self.bonding.lineages.push(lineage);
        Ok(())
    }

    pub fn lineages(&self) -> &[FamilyLineage] {
        &self.bonding.lineages
    }

    /// Add a memory directly, returning any memory it evicted
    pub fn add_memory(&mut self, agent: AgentId, memory: GenerationalMemory) -> Result<Option<GenerationalMemory>> {
        if !self.agents.contains(agent) {
            return Err(SocialError::AgentNotFound(agent));
        }
        let capacity = self.config.bonding.memory_capacity;
        Ok(self.bonding.memory_log(agent, capacity).push(memory))
    }

    /// An agent's memories (unordered)
    pub fn memories(&self, agent: AgentId) -> Vec<&GenerationalMemory> {
        self.bonding
            .memories
            .get(&agent)
            .map(|log| log.iter().collect())
            .unwrap_or_default()
    }

    pub fn bond(&self, source: AgentId, target: AgentId) -> Option<&ActiveBond> {
        self.bonding.bond(source, target)
    }

    /// Bonds where `agent` is the source
    pub fn bonds_of(&self, agent: AgentId) -> Vec<&ActiveBond> {
        self.bonding
            .bonds
            .values()
            .filter(|b| b.source == agent)
            .collect()
    }

    pub fn bond_count(&self) -> usize {
        self.bonding.bonds.len()
    }

    pub fn memory_count(&self) -> usize {
        self.bonding.memories.values().map(|log| log.len()).sum()
    }

    /// Bond type `a` would hold toward `b`
    pub fn classify_bond(&self, a: AgentId, b: AgentId) -> BondType {
        if self.bonding.is_parent_of(a, b) {
            return BondType::Parent;
        }
        if self.bonding.is_parent_of(b, a) {
            return BondType::Offspring;
        }
        if self.mate_compatible(a, b) {
            return BondType::Mate;
        }
        BondType::Companion
    }

    fn mate_compatible(&self, a: AgentId, b: AgentId) -> bool {
        let (Some(pa), Some(pb)) = (self.bonding.profiles.get(&a), self.bonding.profiles.get(&b)) else {
            return false;
        };
        let maturity = self.config.bonding.maturity_age;
        pa.species == pb.species
            && pa.age >= maturity
            && pb.age >= maturity
            && !self.bonding.are_siblings(a, b)
            && !self.bonding.has_mate(a)
            && !self.bonding.has_mate(b)
    }

    /// Bond compatibility in 0..=1 for a prospective bond of `bond_type`
    pub fn bond_compatibility(&self, a: AgentId, b: AgentId, bond_type: BondType) -> Result<f32> {
        let agent_a = self.agents.require(a)?;
        let agent_b = self.agents.require(b)?;
        let profiles = (self.bonding.profiles.get(&a), self.bonding.profiles.get(&b));

        let species = match profiles {
            (Some(pa), Some(pb)) if pa.species == pb.species => 0.3,
            (Some(pa), Some(pb)) if pa.family == pb.family => 0.1,
            _ => 0.0,
        };
        let personality = 0.2 * personality_compatibility(&agent_a.personality, &agent_b.personality);

        let type_bonus = if bond_type.is_family() {
            0.4
        } else if bond_type == BondType::Mate {
            match profiles {
                (Some(pa), Some(pb)) => {
                    let age_gap = (pa.age - pb.age).abs();
                    let age_fit = (1.0 - age_gap / self.config.bonding.max_mate_age_gap).clamp(0.0, 1.0);
                    0.2 * pa.genetic_diversity(pb) + 0.1 * age_fit
                }
                _ => 0.0,
            }
        } else {
            0.0
        };

        Ok((0.5 + species + personality + type_bonus).clamp(0.0, 1.0))
    }

    /// Try to bond two creatures. Returns the bond type `a` holds toward
    /// `b`, or `None` if a bond already exists or they are not compatible
    /// enough.
    pub fn try_form_bond(&mut self, a: AgentId, b: AgentId) -> Result<Option<BondType>> {
        if a == b {
            return Err(SocialError::SelfInteraction(a));
        }
        self.agents.require(a)?;
        self.agents.require(b)?;
        if self.bonding.has_bond_between(a, b) {
            return Ok(None);
        }

        let bond_type = self.classify_bond(a, b);
        let compatibility = self.bond_compatibility(a, b, bond_type)?;
        if compatibility < self.config.bonding.minimum_bond_compatibility {
            debug!(%a, %b, ?bond_type, compatibility, "bond not formed: low compatibility");
            return Ok(None);
        }

        let strength = compatibility * self.config.bonding.initial_bond_strength;
        let now = self.clock.time;
        self.bonding
            .bonds
            .insert((a, b), ActiveBond::new(a, b, bond_type, strength, now));
        self.bonding
            .bonds
            .insert((b, a), ActiveBond::new(b, a, bond_type.reciprocal(), strength, now));

        info!(%a, %b, ?bond_type, strength, "bond formed");
        self.emit(SocialEvent::BondFormed {
            a,
            b,
            bond_type,
            strength,
        });
        Ok(Some(bond_type))
    }

    /// Read phase: new strength for every bond
    fn compute_bond_updates(&self, dt: f32) -> Vec<BondUpdate> {
        let cfg = &self.config.bonding;
        self.bonding
            .bonds
            .iter()
            .map(|(key, bond)| {
                let mut strength = bond.strength;
                match self.positions.distance(bond.source, bond.target) {
                    Some(d) if d <= cfg.proximity_range => {
                        strength += cfg.base_growth_rate * dt * growth_multiplier(bond.bond_type);
                    }
                    Some(d) if d > cfg.separation_threshold => {
                        strength -= cfg.separation_decay_rate * dt;
                    }
                    _ => {}
                }
                if let Some(log) = self.bonding.memories.get(&bond.source) {
                    let recalled: f32 = log
                        .matching(bond.target, bond.bond_type)
                        .map(|m| m.strength)
                        .sum();
                    strength += recalled * cfg.memory_influence * dt;
                }
                BondUpdate {
                    key: *key,
                    strength: strength.clamp(0.0, 1.0),
                }
            })
            .collect()
    }

    /// Write a memory of a bond for its source, keeping the stronger copy
    /// if one already exists
    fn remember_bond(&mut self, source: AgentId, target: AgentId, bond_type: BondType, strength: f32) {
        let capacity = self.config.bonding.memory_capacity;
        let generations = self.config.bonding.max_generations;
        let now = self.clock.time;
        let log = self.bonding.memory_log(source, capacity);
        if let Some(existing) = log.find_mut(target, bond_type) {
            existing.strength = existing.strength.max(strength);
            existing.generations_remaining = generations;
            return;
        }
        log.push(GenerationalMemory {
            target,
            bond_type,
            strength,
            emotional_weight: BOND_MEMORY_WEIGHT,
            created_at: now,
            generations_remaining: generations,
        });
    }

    /// Write phase for one bond
    fn apply_bond_update(&mut self, update: BondUpdate, dt: f32, cfg: &BondingConfig) {
        let Some(bond) = self.bonding.bonds.get_mut(&update.key) else {
            return;
        };

        let previous = bond.strength;
        bond.strength = update.strength;
        bond.elapsed += dt;
        bond.peak_strength = bond.peak_strength.max(bond.strength);
        bond.state = if bond.strength <= cfg.minimum_bond_strength {
            BondState::Removed
        } else if bond.strength < previous {
            BondState::Decaying
        } else if bond.strength >= cfg.active_bond_threshold {
            BondState::Active
        } else {
            BondState::Forming
        };

        let (source, target, bond_type) = (bond.source, bond.target, bond.bond_type);
        let mut events = Vec::new();

        if bond.state == BondState::Removed {
            let peak = bond.peak_strength;
            let contribution = bond.memory_contribution;
            self.bonding.bonds.remove(&update.key);
            info!(%source, %target, ?bond_type, "bond broken");
            if peak >= MEMORABLE_PEAK {
                self.remember_bond(source, target, bond_type, peak * contribution);
            }
            self.emit(SocialEvent::BondBroken {
                a: source,
                b: target,
                bond_type,
            });
            return;
        }

        if (bond.strength - bond.last_reported_strength).abs() >= STRENGTH_REPORT_STEP {
            bond.last_reported_strength = bond.strength;
            events.push(SocialEvent::BondStrengthChanged {
                a: source,
                b: target,
                strength: bond.strength,
            });
        }

        let reached = [
            (BondMilestone::DeepBond, bond.strength >= cfg.deep_bond_strength),
            (BondMilestone::LifelongBond, bond.elapsed >= cfg.lifelong_bond_time),
            (
                BondMilestone::Soulmate,
                bond_type == BondType::Mate && bond.strength >= cfg.soulmate_strength,
            ),
        ];
        let mut deep_memory = None;
        for (milestone, hit) in reached {
            if hit && !bond.milestones.has(milestone) {
                bond.milestones.mark(milestone);
                if milestone == BondMilestone::DeepBond {
                    deep_memory = Some(bond.strength * bond.memory_contribution);
                }
                info!(agent = %source, %target, ?milestone, "bonding milestone");
                events.push(SocialEvent::BondingMilestone {
                    agent: source,
                    target,
                    milestone,
                });
            }
        }

        if let Some(strength) = deep_memory {
            self.remember_bond(source, target, bond_type, strength);
        }
        for event in events {
            self.emit(event);
        }
    }

    /// Copy every parent memory a child has not inherited yet
    fn inherit_memories(&mut self, cfg: &BondingConfig) {
        let now = self.clock.time;

        let mut inherited = Vec::new();
        for lineage in &self.bonding.lineages {
            for child in lineage.offspring.iter().copied() {
                if !self.agents.contains(child) {
                    continue;
                }
                for parent in lineage.parents() {
                    let Some(log) = self.bonding.memories.get(&parent) else { continue };
                    for memory in log.iter().filter(|m| m.generations_remaining > 0) {
                        let key = (child, parent, memory.target, memory.bond_type);
                        if self.bonding.inherited.contains(&key) {
                            continue;
                        }
                        let strength = memory.strength * cfg.inheritance_rate;
                        if strength < cfg.minimum_inherited_memory_strength {
                            trace!(%parent, %child, strength, "memory too faint to inherit");
                            continue;
                        }
                        inherited.push((
                            key,
                            GenerationalMemory {
                                target: memory.target,
                                bond_type: memory.bond_type,
                                strength,
                                emotional_weight: memory.emotional_weight,
                                created_at: now,
                                generations_remaining: memory.generations_remaining - 1,
                            },
                        ));
                    }
                }
            }
        }

        for (key, memory) in inherited {
            // Two lineages may list the same parent and child
            if !self.bonding.inherited.insert(key) {
                continue;
            }
            let child = key.0;
            debug!(%child, parent = %key.1, strength = memory.strength, "memory inherited");
            let summary = memory.summary();
            self.bonding.memory_log(child, cfg.memory_capacity).push(memory);
            self.emit(SocialEvent::MemoryActivated {
                agent: child,
                memory: summary,
            });
        }
    }

    /// Per-tick bonding pass: bond growth and decay, memory decay, then
    /// inheritance
    pub(crate) fn update_bonds(&mut self, dt: f32) {
        let cfg = self.config.bonding.clone();
        if dt > 0.0 {
            for update in self.compute_bond_updates(dt) {
                self.apply_bond_update(update, dt, &cfg);
            }

            let fade = cfg.memory_decay_rate * dt;
            let mut pruned = 0;
            for log in self.bonding.memories.values_mut() {
                pruned += log.decay(fade);
            }
            if pruned > 0 {
                debug!(pruned, "faded memories pruned");
            }
        }
        self.inherit_memories(&cfg);
    }
}

/// System: bonding pass
pub fn update_bonds(delta: Res<TickDelta>, mut world: ResMut<SocialWorld>) {
    world.update_bonds(delta.seconds());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::{Personality, SocialTraits};
    use crate::components::world::Position;
    use crate::config::SocialConfig;

    fn world_with(n: u32) -> SocialWorld {
        let mut world = SocialWorld::new(SocialConfig::default(), 13).unwrap();
        for i in 1..=n {
            world
                .register_agent(AgentId(i), Personality::new(), SocialTraits::new())
                .unwrap();
        }
        world
    }

    fn wolf(age: f32) -> CreatureProfile {
        CreatureProfile::new("wolf", "canid", age).with_genes(vec![0.2, 0.8, 0.5])
    }

    #[test]
    fn test_reciprocal_records() {
        let mut world = world_with(2);
        world
            .register_lineage(FamilyLineage::new(AgentId(1), None, 1).with_offspring(AgentId(2)))
            .unwrap();
        assert_eq!(world.try_form_bond(AgentId(1), AgentId(2)).unwrap(), Some(BondType::Parent));
        assert_eq!(world.bond(AgentId(1), AgentId(2)).unwrap().bond_type, BondType::Parent);
        assert_eq!(world.bond(AgentId(2), AgentId(1)).unwrap().bond_type, BondType::Offspring);
        assert_eq!(world.try_form_bond(AgentId(2), AgentId(1)).unwrap(), None);
        assert_eq!(world.bond_count(), 2);
    }

    #[test]
    fn test_mate_classification() {
        let mut world = world_with(3);
        world.set_creature_profile(AgentId(1), wolf(3.0)).unwrap();
        world.set_creature_profile(AgentId(2), wolf(4.0)).unwrap();
        world.set_creature_profile(AgentId(3), wolf(0.5)).unwrap();
        assert_eq!(world.classify_bond(AgentId(1), AgentId(2)), BondType::Mate);
        assert_eq!(world.classify_bond(AgentId(1), AgentId(3)), BondType::Companion);

        world.try_form_bond(AgentId(1), AgentId(2)).unwrap();
        world.set_creature_profile(AgentId(3), wolf(5.0)).unwrap();
        // Agent 1 already has a mate
        assert_eq!(world.classify_bond(AgentId(1), AgentId(3)), BondType::Companion);
    }

    #[test]
    fn test_low_compatibility_is_none() {
        let mut config = SocialConfig::default();
        config.bonding.minimum_bond_compatibility = 1.0;
        let mut world = SocialWorld::new(config, 1).unwrap();
        for i in 1..=2 {
            world
                .register_agent(AgentId(i), Personality::new(), SocialTraits::new())
                .unwrap();
        }
        assert_eq!(world.try_form_bond(AgentId(1), AgentId(2)).unwrap(), None);
        assert_eq!(world.bond_count(), 0);
        assert!(world.try_form_bond(AgentId(1), AgentId(1)).is_err());
    }

    #[test]
    fn test_separation_breaks_bond_and_leaves_memory() {
        let mut world = world_with(2);
        world.try_form_bond(AgentId(1), AgentId(2)).unwrap();
        world.set_position(AgentId(1), Position::planar(0.0, 0.0)).unwrap();
        world.set_position(AgentId(2), Position::planar(1.0, 0.0)).unwrap();
        for _ in 0..20 {
            world.update_bonds(1.0);
        }
        assert!(world.bond(AgentId(1), AgentId(2)).unwrap().peak_strength >= 0.5);

        world.set_position(AgentId(2), Position::planar(500.0, 0.0)).unwrap();
        for _ in 0..300 {
            world.update_bonds(1.0);
        }
        assert!(world.bond(AgentId(1), AgentId(2)).is_none());
        let broken = world
            .drain_events()
            .into_iter()
            .filter(|r| matches!(r.event, SocialEvent::BondBroken { .. }))
            .count();
        assert_eq!(broken, 2);
        assert!(world
            .memories(AgentId(1))
            .iter()
            .any(|m| m.target == AgentId(2) && m.bond_type == BondType::Companion));
    }

    #[test]
    fn test_each_memory_inherited_once() {
        let mut world = world_with(3);
        world
            .add_memory(
                AgentId(1),
                GenerationalMemory {
                    target: AgentId(3),
                    bond_type: BondType::Mate,
                    strength: 0.8,
                    emotional_weight: 0.9,
                    created_at: 0.0,
                    generations_remaining: 2,
                },
            )
            .unwrap();
        world
            .register_lineage(FamilyLineage::new(AgentId(1), None, 1).with_offspring(AgentId(2)))
            .unwrap();

        world.update_bonds(0.0);
        world.update_bonds(0.0);
        let inherited = world.memories(AgentId(2));
        assert_eq!(inherited.len(), 1);
        assert!((inherited[0].strength - 0.4).abs() < 1e-6);
        assert_eq!(inherited[0].generations_remaining, 1);

        let activated = world
            .drain_events()
            .into_iter()
            .filter(|r| matches!(r.event, SocialEvent::MemoryActivated { .. }))
            .count();
        assert_eq!(activated, 1);
    }

    #[test]
    fn test_exhausted_memories_are_not_inherited() {
        let mut world = world_with(2);
        world
            .add_memory(
                AgentId(1),
                GenerationalMemory {
                    target: AgentId(2),
                    bond_type: BondType::Companion,
                    strength: 1.0,
                    emotional_weight: 0.5,
                    created_at: 0.0,
                    generations_remaining: 0,
                },
            )
            .unwrap();
        world
            .register_lineage(FamilyLineage::new(AgentId(1), None, 1).with_offspring(AgentId(2)))
            .unwrap();
        world.update_bonds(1.0);
        assert!(world.memories(AgentId(2)).is_empty());
    }
}
