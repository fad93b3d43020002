//! Relationship Components
//!
//! The per-agent relationship record. Each unordered pair owns two mirrored
//! records, one on each endpoint, that always carry the same strength.

use serde::{Deserialize, Serialize};

use social_events::{AgentId, RelationshipType};

use crate::bounded::BoundedLog;
use crate::components::world::Position;

/// Kinds of pairwise interaction the evaluator understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Cooperation,
    Grooming,
    Teaching,
    Play,
    Communication,
    Competition,
    Conflict,
}

impl InteractionType {
    /// Returns all interaction type variants.
    pub fn all() -> &'static [InteractionType] {
        &[
            InteractionType::Cooperation,
            InteractionType::Grooming,
            InteractionType::Teaching,
            InteractionType::Play,
            InteractionType::Communication,
            InteractionType::Competition,
            InteractionType::Conflict,
        ]
    }
}

/// Result class of an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionOutcome {
    Positive,
    Neutral,
    Negative,
}

/// One entry in a relationship's interaction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub time: f64,
    pub interaction_type: InteractionType,
    pub outcome: InteractionOutcome,
    pub success: f32,
    /// Strength change applied by this interaction
    pub delta: f32,
    pub location: Option<Position>,
}

/// A relationship as seen from one endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialRelationship {
    pub peer: AgentId,
    /// Strength (-1.0 to 1.0)
    pub strength: f32,
    pub relationship_type: RelationshipType,
    pub formed_at: f64,
    pub last_interaction: f64,
    pub interaction_count: u32,
    pub history: BoundedLog<InteractionRecord>,
    /// Set once the pair has been announced as a Bond
    pub bond_announced: bool,
}

impl SocialRelationship {
    pub fn new(peer: AgentId, formed_at: f64, history_capacity: usize) -> Self {
        Self {
            peer,
            strength: 0.0,
            relationship_type: RelationshipType::Neutral,
            formed_at,
            last_interaction: formed_at,
            interaction_count: 0,
            history: BoundedLog::new(history_capacity),
            bond_announced: false,
        }
    }

    /// Set strength (clamped) and reclassify
    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength.clamp(-1.0, 1.0);
        self.relationship_type = RelationshipType::from_strength(self.strength);
    }

    /// Record an interaction that moved the strength to `new_strength`
    pub fn record_interaction(&mut self, record: InteractionRecord, new_strength: f32) {
        self.last_interaction = record.time;
        self.interaction_count += 1;
        self.history.push(record);
        self.set_strength(new_strength);
    }

    /// Move strength toward zero by `amount`, never crossing it.
    /// Returns true if the strength changed.
    pub fn decay_toward_neutral(&mut self, amount: f32) -> bool {
        if amount <= 0.0 || self.strength == 0.0 {
            return false;
        }
        let decayed = if self.strength > 0.0 {
            (self.strength - amount).max(0.0)
        } else {
            (self.strength + amount).min(0.0)
        };
        self.set_strength(decayed);
        true
    }

    /// Most recent interaction, if it was positive and no older than `window`
    pub fn recent_positive(&self, now: f64, window: f64) -> Option<&InteractionRecord> {
        self.history.latest().filter(|r| {
            r.outcome == InteractionOutcome::Positive && now - r.time <= window
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time: f64, outcome: InteractionOutcome) -> InteractionRecord {
        InteractionRecord {
            time,
            interaction_type: InteractionType::Play,
            outcome,
            success: 0.5,
            delta: 0.1,
            location: None,
        }
    }

    #[test]
    fn test_set_strength_reclassifies() {
        let mut rel = SocialRelationship::new(AgentId(2), 0.0, 20);
        rel.set_strength(0.8);
        assert_eq!(rel.relationship_type, RelationshipType::Bond);
        rel.set_strength(0.5);
        assert_eq!(rel.relationship_type, RelationshipType::Friendly);
        rel.set_strength(-3.0);
        assert_eq!(rel.strength, -1.0);
        assert_eq!(rel.relationship_type, RelationshipType::Hostile);
    }

    #[test]
    fn test_decay_never_crosses_zero() {
        let mut rel = SocialRelationship::new(AgentId(2), 0.0, 20);
        rel.set_strength(0.05);
        assert!(rel.decay_toward_neutral(0.1));
        assert_eq!(rel.strength, 0.0);
        assert!(!rel.decay_toward_neutral(0.1));

        rel.set_strength(-0.5);
        rel.decay_toward_neutral(0.2);
        assert!((rel.strength + 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut rel = SocialRelationship::new(AgentId(2), 0.0, 20);
        for i in 0..25 {
            rel.record_interaction(record(i as f64, InteractionOutcome::Neutral), 0.1);
        }
        assert_eq!(rel.history.len(), 20);
        assert_eq!(rel.interaction_count, 25);
        assert_eq!(rel.history.oldest().unwrap().time, 5.0);
    }

    #[test]
    fn test_recent_positive_window() {
        let mut rel = SocialRelationship::new(AgentId(2), 0.0, 20);
        rel.record_interaction(record(10.0, InteractionOutcome::Positive), 0.2);
        assert!(rel.recent_positive(12.0, 5.0).is_some());
        assert!(rel.recent_positive(16.0, 5.0).is_none());

        rel.record_interaction(record(13.0, InteractionOutcome::Negative), 0.1);
        assert!(rel.recent_positive(13.0, 5.0).is_none());
    }
}
