//! Agent Components
//!
//! Per-agent social state: personality, social traits, empathy, emotion,
//! culture, relationships and group memberships.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use social_events::{AgentId, CulturalTrait, EmotionalState, GroupId};

use super::relationship::SocialRelationship;

/// Value assumed for any trait an agent was registered without
pub const DEFAULT_TRAIT_VALUE: f32 = 0.5;

/// Well-known personality and social trait names
pub mod trait_names {
    pub const OPENNESS: &str = "Openness";
    pub const CONSCIENTIOUSNESS: &str = "Conscientiousness";
    pub const EXTRAVERSION: &str = "Extraversion";
    pub const AGREEABLENESS: &str = "Agreeableness";
    pub const NEUROTICISM: &str = "Neuroticism";

    pub const EMPATHY: &str = "Empathy";
    pub const SOCIAL_SKILL: &str = "SocialSkill";
    pub const LEADERSHIP: &str = "Leadership";
}

/// Baseline cultural traits every agent starts with
pub mod culture_names {
    /// Seeded from agreeableness
    pub const COOPERATION_TENDENCY: &str = "cooperation_tendency";
    /// Seeded from conscientiousness
    pub const HIERARCHY_RESPECT: &str = "hierarchy_respect";
    /// Seeded from openness
    pub const INNOVATION_OPENNESS: &str = "innovation_openness";
}

/// Stability given to the baseline cultural traits
const BASELINE_TRAIT_STABILITY: f32 = 0.5;
/// Transmission rate given to the baseline cultural traits
const BASELINE_TRAIT_TRANSMISSION: f32 = 0.3;

/// Named trait values, each clamped to 0.0..=1.0
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitMap(BTreeMap<String, f32>);

impl TraitMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: f32) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: f32) {
        self.0.insert(name.into(), value.clamp(0.0, 1.0));
    }

    /// Get a trait, falling back to [`DEFAULT_TRAIT_VALUE`]
    pub fn get(&self, name: &str) -> f32 {
        self.get_or(name, DEFAULT_TRAIT_VALUE)
    }

    pub fn get_or(&self, name: &str, default: f32) -> f32 {
        self.0.get(name).copied().unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f32)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f32)> for TraitMap {
    fn from_iter<I: IntoIterator<Item = (K, f32)>>(iter: I) -> Self {
        let mut map = TraitMap::new();
        for (name, value) in iter {
            map.set(name, value);
        }
        map
    }
}

/// Personality trait name -> value
pub type Personality = TraitMap;

/// Social trait name -> value
pub type SocialTraits = TraitMap;

/// Social standing, recomputed by the group pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialStatus {
    /// Not a member of any group
    #[default]
    Unaffiliated,
    Member,
    Respected,
    Leader,
}

/// All social state owned by one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialAgent {
    pub id: AgentId,
    pub personality: Personality,
    pub social_traits: SocialTraits,
    /// Empathy level (0.0 to 1.0)
    pub empathy: f32,
    pub emotional_state: EmotionalState,
    pub status: SocialStatus,
    pub cultural_traits: Vec<CulturalTrait>,
    /// Relationship records keyed by peer, mirrored on the peer
    pub relationships: BTreeMap<AgentId, SocialRelationship>,
    pub groups: BTreeSet<GroupId>,
    /// Count of interactions this agent took part in
    pub social_experience: u64,
}

impl SocialAgent {
    /// Create an agent with empathy seeded from the "Empathy" social trait
    /// and three baseline cultural traits derived from personality.
    pub fn new(id: AgentId, personality: Personality, social_traits: SocialTraits) -> Self {
        let empathy = social_traits.get_or(trait_names::EMPATHY, DEFAULT_TRAIT_VALUE);
        let cultural_traits = vec![
            CulturalTrait::new(
                culture_names::COOPERATION_TENDENCY,
                personality.get(trait_names::AGREEABLENESS),
                BASELINE_TRAIT_STABILITY,
                BASELINE_TRAIT_TRANSMISSION,
            ),
            CulturalTrait::new(
                culture_names::HIERARCHY_RESPECT,
                personality.get(trait_names::CONSCIENTIOUSNESS),
                BASELINE_TRAIT_STABILITY,
                BASELINE_TRAIT_TRANSMISSION,
            ),
            CulturalTrait::new(
                culture_names::INNOVATION_OPENNESS,
                personality.get(trait_names::OPENNESS),
                BASELINE_TRAIT_STABILITY,
                BASELINE_TRAIT_TRANSMISSION,
            ),
        ];

        Self {
            id,
            personality,
            social_traits,
            empathy: empathy.clamp(0.0, 1.0),
            emotional_state: EmotionalState::default(),
            status: SocialStatus::default(),
            cultural_traits,
            relationships: BTreeMap::new(),
            groups: BTreeSet::new(),
            social_experience: 0,
        }
    }

    pub fn social_skill(&self) -> f32 {
        self.social_traits.get(trait_names::SOCIAL_SKILL)
    }

    pub fn leadership_trait(&self) -> f32 {
        self.social_traits.get(trait_names::LEADERSHIP)
    }

    pub fn cultural_trait(&self, name: &str) -> Option<&CulturalTrait> {
        self.cultural_traits.iter().find(|t| t.name == name)
    }

    pub fn cultural_trait_mut(&mut self, name: &str) -> Option<&mut CulturalTrait> {
        self.cultural_traits.iter_mut().find(|t| t.name == name)
    }

    pub fn relationship(&self, peer: AgentId) -> Option<&SocialRelationship> {
        self.relationships.get(&peer)
    }

    /// Relationship strength toward a peer (0.0 if none)
    pub fn relationship_strength(&self, peer: AgentId) -> f32 {
        self.relationships.get(&peer).map_or(0.0, |r| r.strength)
    }

    /// Add empathy, keeping it within 0.0..=1.0
    pub fn adjust_empathy(&mut self, delta: f32) {
        self.empathy = (self.empathy + delta).clamp(0.0, 1.0);
    }

    /// Grow the "SocialSkill" trait; the trait map clamps it
    pub fn adjust_social_skill(&mut self, delta: f32) {
        if delta != 0.0 {
            let skill = self.social_skill() + delta;
            self.social_traits.set(trait_names::SOCIAL_SKILL, skill);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_map_defaults_and_clamps() {
        let traits = TraitMap::new()
            .with(trait_names::OPENNESS, 1.7)
            .with(trait_names::NEUROTICISM, -0.2);
        assert_eq!(traits.get(trait_names::OPENNESS), 1.0);
        assert_eq!(traits.get(trait_names::NEUROTICISM), 0.0);
        assert_eq!(traits.get(trait_names::EXTRAVERSION), DEFAULT_TRAIT_VALUE);
        assert_eq!(traits.get_or("Unknown", 0.2), 0.2);
    }

    #[test]
    fn test_new_agent_seeds_empathy_and_culture() {
        let personality: Personality = [
            (trait_names::AGREEABLENESS, 0.9),
            (trait_names::CONSCIENTIOUSNESS, 0.2),
            (trait_names::OPENNESS, 0.6),
        ]
        .into_iter()
        .collect();
        let social = SocialTraits::new().with(trait_names::EMPATHY, 0.8);

        let agent = SocialAgent::new(AgentId(1), personality, social);
        assert_eq!(agent.empathy, 0.8);
        assert_eq!(agent.cultural_traits.len(), 3);
        assert_eq!(
            agent.cultural_trait(culture_names::COOPERATION_TENDENCY).unwrap().value,
            0.9
        );
        assert_eq!(
            agent.cultural_trait(culture_names::HIERARCHY_RESPECT).unwrap().value,
            0.2
        );
        assert_eq!(
            agent.cultural_trait(culture_names::INNOVATION_OPENNESS).unwrap().value,
            0.6
        );
    }

    #[test]
    fn test_empathy_defaults_to_half() {
        let agent = SocialAgent::new(AgentId(2), Personality::new(), SocialTraits::new());
        assert_eq!(agent.empathy, 0.5);
        assert_eq!(agent.status, SocialStatus::Unaffiliated);
    }

    #[test]
    fn test_adjust_empathy_clamps() {
        let mut agent = SocialAgent::new(AgentId(3), Personality::new(), SocialTraits::new());
        agent.adjust_empathy(2.0);
        assert_eq!(agent.empathy, 1.0);
        agent.adjust_empathy(-5.0);
        assert_eq!(agent.empathy, 0.0);
    }

    #[test]
    fn test_adjust_social_skill_clamps() {
        let mut agent = SocialAgent::new(AgentId(4), Personality::new(), SocialTraits::new());
        agent.adjust_social_skill(0.1);
        assert!((agent.social_skill() - 0.6).abs() < 1e-6);
        agent.adjust_social_skill(3.0);
        assert_eq!(agent.social_skill(), 1.0);
    }
}
