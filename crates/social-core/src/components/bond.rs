//! Bond Components
//!
//! Typed directional bonds, generational memories and family lineage.

use serde::{Deserialize, Serialize};

use social_events::{AgentId, BondMilestone, BondType, MemorySummary};

/// Lifecycle of a bond record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondState {
    /// Below the active threshold
    Forming,
    Active,
    /// Lost strength during the last update
    Decaying,
    /// Fell to the minimum strength; the record is deleted
    Removed,
}

/// Milestones a single bond record has already announced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneFlags {
    pub deep_bond: bool,
    pub lifelong_bond: bool,
    pub soulmate: bool,
}

impl MilestoneFlags {
    pub fn has(&self, milestone: BondMilestone) -> bool {
        match milestone {
            BondMilestone::DeepBond => self.deep_bond,
            BondMilestone::LifelongBond => self.lifelong_bond,
            BondMilestone::Soulmate => self.soulmate,
        }
    }

    pub fn mark(&mut self, milestone: BondMilestone) {
        match milestone {
            BondMilestone::DeepBond => self.deep_bond = true,
            BondMilestone::LifelongBond => self.lifelong_bond = true,
            BondMilestone::Soulmate => self.soulmate = true,
        }
    }
}

/// One directed bond (source -> target)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveBond {
    pub source: AgentId,
    pub target: AgentId,
    pub bond_type: BondType,
    /// Strength (0.0 to 1.0)
    pub strength: f32,
    pub state: BondState,
    /// Time since the bond formed
    pub elapsed: f32,
    pub last_interaction: f64,
    /// How much of this bond survives into a generational memory
    pub memory_contribution: f32,
    pub peak_strength: f32,
    /// Strength last announced through a strength-changed event
    pub last_reported_strength: f32,
    pub milestones: MilestoneFlags,
}

impl ActiveBond {
    pub fn new(source: AgentId, target: AgentId, bond_type: BondType, strength: f32, now: f64) -> Self {
        let strength = strength.clamp(0.0, 1.0);
        Self {
            source,
            target,
            bond_type,
            strength,
            state: BondState::Forming,
            elapsed: 0.0,
            last_interaction: now,
            memory_contribution: memory_contribution(bond_type),
            peak_strength: strength,
            last_reported_strength: strength,
            milestones: MilestoneFlags::default(),
        }
    }
}

/// Default memory-contribution weight per bond type
pub fn memory_contribution(bond_type: BondType) -> f32 {
    match bond_type {
        BondType::Parent => 1.0,
        BondType::Offspring => 0.9,
        BondType::Mate => 0.8,
        BondType::Mentor | BondType::Student => 0.6,
        BondType::Companion => 0.5,
        BondType::Rival => 0.3,
    }
}

/// Growth multiplier applied while two bonded creatures are close
pub fn growth_multiplier(bond_type: BondType) -> f32 {
    match bond_type {
        BondType::Parent => 2.5,
        BondType::Offspring => 2.2,
        BondType::Mate => 1.8,
        BondType::Companion => 1.0,
        BondType::Mentor | BondType::Student => 1.2,
        BondType::Rival => 0.5,
    }
}

/// An inheritable record of a past bond
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationalMemory {
    pub target: AgentId,
    pub bond_type: BondType,
    pub strength: f32,
    pub emotional_weight: f32,
    pub created_at: f64,
    pub generations_remaining: u32,
}

impl GenerationalMemory {
    pub fn summary(&self) -> MemorySummary {
        MemorySummary {
            target: self.target,
            bond_type: self.bond_type,
            strength: self.strength,
            emotional_weight: self.emotional_weight,
            generations_remaining: self.generations_remaining,
        }
    }
}

/// Bounded per-agent memory store.
///
/// When full, a push evicts the entry with the earliest `created_at` (the
/// first such entry on ties). Pruning uses swap-remove, so entry order is
/// not preserved; nothing may depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryLog {
    entries: Vec<GenerationalMemory>,
    capacity: usize,
}

impl MemoryLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a memory, returning the evicted oldest memory if the log was full
    pub fn push(&mut self, memory: GenerationalMemory) -> Option<GenerationalMemory> {
        let evicted = if self.entries.len() >= self.capacity {
            self.oldest_index().map(|i| self.entries.swap_remove(i))
        } else {
            None
        };
        self.entries.push(memory);
        evicted
    }

    fn oldest_index(&self) -> Option<usize> {
        let mut oldest: Option<(usize, f64)> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            if oldest.map_or(true, |(_, t)| entry.created_at < t) {
                oldest = Some((i, entry.created_at));
            }
        }
        oldest.map(|(i, _)| i)
    }

    /// Reduce every memory's strength by `amount`, then prune the ones that
    /// reached zero. Returns the number pruned.
    pub fn decay(&mut self, amount: f32) -> usize {
        if amount > 0.0 {
            for entry in &mut self.entries {
                entry.strength = (entry.strength - amount).max(0.0);
            }
        }
        self.prune()
    }

    /// Swap-remove every entry with strength <= 0
    pub fn prune(&mut self) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].strength <= 0.0 {
                self.entries.swap_remove(i);
                removed += 1;
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Memories about `target` or of the given bond type
    pub fn matching(&self, target: AgentId, bond_type: BondType) -> impl Iterator<Item = &GenerationalMemory> {
        self.entries
            .iter()
            .filter(move |m| m.target == target || m.bond_type == bond_type)
    }

    pub fn find_mut(&mut self, target: AgentId, bond_type: BondType) -> Option<&mut GenerationalMemory> {
        self.entries
            .iter_mut()
            .find(|m| m.target == target && m.bond_type == bond_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenerationalMemory> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parents and offspring of one family; drives memory inheritance only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyLineage {
    pub parent1: AgentId,
    pub parent2: Option<AgentId>,
    pub offspring: Vec<AgentId>,
    /// Generation index of the offspring
    pub generation: u32,
}

impl FamilyLineage {
    pub fn new(parent1: AgentId, parent2: Option<AgentId>, generation: u32) -> Self {
        Self {
            parent1,
            parent2,
            offspring: Vec::new(),
            generation,
        }
    }

    pub fn with_offspring(mut self, child: AgentId) -> Self {
        if !self.offspring.contains(&child) {
            self.offspring.push(child);
        }
        self
    }

    pub fn parents(&self) -> impl Iterator<Item = AgentId> {
        std::iter::once(self.parent1).chain(self.parent2)
    }

    pub fn is_parent(&self, agent: AgentId) -> bool {
        self.parent1 == agent || self.parent2 == Some(agent)
    }
}

/// Genetics-side facts about a creature, consumed as input
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreatureProfile {
    pub species: String,
    /// Broader family the species belongs to
    pub family: String,
    pub age: f32,
    /// Normalized gene values (0.0 to 1.0)
    pub genetic_signature: Vec<f32>,
}

impl CreatureProfile {
    pub fn new(species: impl Into<String>, family: impl Into<String>, age: f32) -> Self {
        Self {
            species: species.into(),
            family: family.into(),
            age,
            genetic_signature: Vec::new(),
        }
    }

    pub fn with_genes(mut self, genes: Vec<f32>) -> Self {
        self.genetic_signature = genes;
        self
    }

    /// Mean absolute gene difference (0.0 identical, 1.0 opposite).
    /// Unknown signatures count as moderately diverse.
    pub fn genetic_diversity(&self, other: &CreatureProfile) -> f32 {
        let n = self.genetic_signature.len().min(other.genetic_signature.len());
        if n == 0 {
            return 0.5;
        }
        let total: f32 = self
            .genetic_signature
            .iter()
            .zip(&other.genetic_signature)
            .map(|(a, b)| (a - b).abs())
            .sum();
        (total / n as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(target: u32, strength: f32, created_at: f64) -> GenerationalMemory {
        GenerationalMemory {
            target: AgentId(target),
            bond_type: BondType::Companion,
            strength,
            emotional_weight: 0.5,
            created_at,
            generations_remaining: 2,
        }
    }

    #[test]
    fn test_memory_log_evicts_oldest() {
        let mut log = MemoryLog::new(3);
        log.push(memory(1, 0.5, 5.0));
        log.push(memory(2, 0.5, 1.0));
        log.push(memory(3, 0.5, 3.0));
        let evicted = log.push(memory(4, 0.5, 9.0)).unwrap();
        assert_eq!(evicted.target, AgentId(2));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_memory_decay_prunes_zeroed() {
        let mut log = MemoryLog::new(5);
        log.push(memory(1, 0.05, 0.0));
        log.push(memory(2, 0.5, 0.0));
        log.push(memory(3, 0.02, 0.0));
        let pruned = log.decay(0.1);
        assert_eq!(pruned, 2);
        assert_eq!(log.len(), 1);
        assert!((log.iter().next().unwrap().strength - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_zero_decay_keeps_strength() {
        let mut log = MemoryLog::new(5);
        log.push(memory(1, 0.3, 0.0));
        assert_eq!(log.decay(0.0), 0);
        assert_eq!(log.iter().next().unwrap().strength, 0.3);
    }

    #[test]
    fn test_genetic_diversity() {
        let a = CreatureProfile::new("wolf", "canid", 3.0).with_genes(vec![0.0, 1.0]);
        let b = CreatureProfile::new("wolf", "canid", 4.0).with_genes(vec![1.0, 1.0]);
        assert!((a.genetic_diversity(&b) - 0.5).abs() < 1e-6);
        assert_eq!(a.genetic_diversity(&a), 0.0);
        assert_eq!(CreatureProfile::default().genetic_diversity(&a), 0.5);
    }

    #[test]
    fn test_lineage_parents() {
        let lineage = FamilyLineage::new(AgentId(1), Some(AgentId(2)), 1).with_offspring(AgentId(3));
        assert!(lineage.is_parent(AgentId(2)));
        assert!(!lineage.is_parent(AgentId(3)));
        assert_eq!(lineage.parents().count(), 2);
    }
}
