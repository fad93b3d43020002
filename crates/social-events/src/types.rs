//! Shared Value Types
//!
//! Enums and records that appear both in simulation state and in the event
//! stream.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::ids::{AgentId, GroupId};

/// Classification of a relationship edge, derived from its strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Hostile,
    Antagonistic,
    Neutral,
    Friendly,
    Bond,
}

impl RelationshipType {
    /// Classifies a strength in [-1, 1] using the fixed thresholds
    /// (>0.7 Bond, >0.3 Friendly, >-0.3 Neutral, >-0.7 Antagonistic).
    pub fn from_strength(strength: f32) -> Self {
        if strength > 0.7 {
            RelationshipType::Bond
        } else if strength > 0.3 {
            RelationshipType::Friendly
        } else if strength > -0.3 {
            RelationshipType::Neutral
        } else if strength > -0.7 {
            RelationshipType::Antagonistic
        } else {
            RelationshipType::Hostile
        }
    }

    /// Returns true for the two positive classifications.
    pub fn is_positive(self) -> bool {
        matches!(self, RelationshipType::Friendly | RelationshipType::Bond)
    }
}

/// Discrete emotional state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalState {
    #[default]
    Neutral,
    Happy,
    Excited,
    Calm,
    Sad,
    Angry,
    Fearful,
    Anxious,
}

impl EmotionalState {
    /// Returns all emotional state variants.
    pub fn all() -> &'static [EmotionalState] {
        &[
            EmotionalState::Neutral,
            EmotionalState::Happy,
            EmotionalState::Excited,
            EmotionalState::Calm,
            EmotionalState::Sad,
            EmotionalState::Angry,
            EmotionalState::Fearful,
            EmotionalState::Anxious,
        ]
    }

    /// Positive emotional valence
    pub fn is_positive(self) -> bool {
        matches!(
            self,
            EmotionalState::Happy | EmotionalState::Excited | EmotionalState::Calm
        )
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmotionalState::Neutral => "neutral",
            EmotionalState::Happy => "happy",
            EmotionalState::Excited => "excited",
            EmotionalState::Calm => "calm",
            EmotionalState::Sad => "sad",
            EmotionalState::Angry => "angry",
            EmotionalState::Fearful => "fearful",
            EmotionalState::Anxious => "anxious",
        };
        write!(f, "{}", name)
    }
}

/// Type of a directed bond from one creature to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondType {
    /// Source is the parent of the target
    Parent,
    Mate,
    /// Source is the offspring of the target
    Offspring,
    Companion,
    Rival,
    Mentor,
    Student,
}

impl BondType {
    /// Bond type recorded on the reciprocal (target → source) record.
    pub fn reciprocal(self) -> Self {
        match self {
            BondType::Parent => BondType::Offspring,
            BondType::Offspring => BondType::Parent,
            BondType::Mentor => BondType::Student,
            BondType::Student => BondType::Mentor,
            other => other,
        }
    }

    /// Parent and offspring bonds
    pub fn is_family(self) -> bool {
        matches!(self, BondType::Parent | BondType::Offspring)
    }
}

/// One-shot achievements of a bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondMilestone {
    DeepBond,
    LifelongBond,
    Soulmate,
}

/// Leadership style, classified from agreeableness and conscientiousness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadershipStyle {
    Democratic,
    Autocratic,
    Collaborative,
    LaissezFaire,
}

impl LeadershipStyle {
    /// Quadrant classification around the 0.5 midpoint of each trait.
    pub fn classify(agreeableness: f32, conscientiousness: f32) -> Self {
        match (agreeableness > 0.5, conscientiousness > 0.5) {
            (true, true) => LeadershipStyle::Democratic,
            (false, true) => LeadershipStyle::Autocratic,
            (true, false) => LeadershipStyle::Collaborative,
            (false, false) => LeadershipStyle::LaissezFaire,
        }
    }
}

/// A named, propagating cultural value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalTrait {
    pub name: String,
    /// Trait value (0.0 to 1.0)
    pub value: f32,
    /// Resistance to change (0.0 to 1.0)
    pub stability: f32,
    /// Likelihood of being passed on (0.0 to 1.0)
    pub transmission_rate: f32,
}

impl CulturalTrait {
    pub fn new(name: impl Into<String>, value: f32, stability: f32, transmission_rate: f32) -> Self {
        Self {
            name: name.into(),
            value: value.clamp(0.0, 1.0),
            stability: stability.clamp(0.0, 1.0),
            transmission_rate: transmission_rate.clamp(0.0, 1.0),
        }
    }
}

/// Snapshot of a group carried by group events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group_id: GroupId,
    pub purpose: String,
    pub members: Vec<AgentId>,
    pub cohesion: f32,
    pub leader: Option<AgentId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub norms: BTreeMap<String, f32>,
}

/// Snapshot of a generational memory carried by memory events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySummary {
    pub target: AgentId,
    pub bond_type: BondType,
    pub strength: f32,
    pub emotional_weight: f32,
    pub generations_remaining: u32,
}

/// A novel cultural trait and the agent credited with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InnovationRecord {
    pub innovation_id: u32,
    pub originator: AgentId,
    pub cultural_trait: CulturalTrait,
    pub time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_thresholds() {
        assert_eq!(RelationshipType::from_strength(0.71), RelationshipType::Bond);
        assert_eq!(RelationshipType::from_strength(0.7), RelationshipType::Friendly);
        assert_eq!(RelationshipType::from_strength(0.31), RelationshipType::Friendly);
        assert_eq!(RelationshipType::from_strength(0.0), RelationshipType::Neutral);
        assert_eq!(RelationshipType::from_strength(-0.3), RelationshipType::Antagonistic);
        assert_eq!(RelationshipType::from_strength(-0.7), RelationshipType::Hostile);
        assert_eq!(RelationshipType::from_strength(-1.0), RelationshipType::Hostile);
    }

    #[test]
    fn test_bond_reciprocal() {
        assert_eq!(BondType::Parent.reciprocal(), BondType::Offspring);
        assert_eq!(BondType::Offspring.reciprocal(), BondType::Parent);
        assert_eq!(BondType::Mate.reciprocal(), BondType::Mate);
        assert_eq!(BondType::Companion.reciprocal(), BondType::Companion);
        assert_eq!(BondType::Mentor.reciprocal(), BondType::Student);
    }

    #[test]
    fn test_leadership_quadrants() {
        assert_eq!(LeadershipStyle::classify(0.8, 0.8), LeadershipStyle::Democratic);
        assert_eq!(LeadershipStyle::classify(0.2, 0.8), LeadershipStyle::Autocratic);
        assert_eq!(LeadershipStyle::classify(0.8, 0.2), LeadershipStyle::Collaborative);
        assert_eq!(LeadershipStyle::classify(0.2, 0.2), LeadershipStyle::LaissezFaire);
    }

    #[test]
    fn test_cultural_trait_clamps() {
        let t = CulturalTrait::new("tool_use", 1.4, -0.2, 0.5);
        assert_eq!(t.value, 1.0);
        assert_eq!(t.stability, 0.0);
    }
}
