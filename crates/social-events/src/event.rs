//! Event Types
//!
//! The outbound domain event stream. Engines push events into a queue that
//! the host drains after each tick; presentation layers consume them.

use serde::{Deserialize, Serialize};

use crate::ids::{AgentId, GroupId};
use crate::time::SimTime;
use crate::types::{
    BondMilestone, BondType, CulturalTrait, EmotionalState, GroupSummary, InnovationRecord,
    MemorySummary, RelationshipType,
};

/// Coarse event category used for filtering and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Relationship,
    Group,
    Leadership,
    Culture,
    Emotion,
    Bond,
    Memory,
}

/// A domain event emitted by one of the engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SocialEvent {
    /// A pair crossed into a relationship classification for the first time
    RelationshipFormed {
        a: AgentId,
        b: AgentId,
        relationship_type: RelationshipType,
    },
    GroupFormed {
        group_id: GroupId,
        group: GroupSummary,
    },
    GroupDissolved {
        group_id: GroupId,
        cohesion: f32,
    },
    LeadershipEmergence {
        group_id: GroupId,
        leader_id: AgentId,
    },
    CulturalInnovation {
        cultural_trait: CulturalTrait,
        innovation: InnovationRecord,
    },
    EmotionalContagion {
        source: AgentId,
        target: AgentId,
        state: EmotionalState,
    },
    BondFormed {
        a: AgentId,
        b: AgentId,
        bond_type: BondType,
        strength: f32,
    },
    BondingMilestone {
        agent: AgentId,
        target: AgentId,
        milestone: BondMilestone,
    },
    BondStrengthChanged {
        a: AgentId,
        b: AgentId,
        strength: f32,
    },
    BondBroken {
        a: AgentId,
        b: AgentId,
        bond_type: BondType,
    },
    MemoryActivated {
        agent: AgentId,
        memory: MemorySummary,
    },
}

impl SocialEvent {
    /// Returns the category of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            SocialEvent::RelationshipFormed { .. } => EventKind::Relationship,
            SocialEvent::GroupFormed { .. } | SocialEvent::GroupDissolved { .. } => {
                EventKind::Group
            }
            SocialEvent::LeadershipEmergence { .. } => EventKind::Leadership,
            SocialEvent::CulturalInnovation { .. } => EventKind::Culture,
            SocialEvent::EmotionalContagion { .. } => EventKind::Emotion,
            SocialEvent::BondFormed { .. }
            | SocialEvent::BondingMilestone { .. }
            | SocialEvent::BondStrengthChanged { .. }
            | SocialEvent::BondBroken { .. } => EventKind::Bond,
            SocialEvent::MemoryActivated { .. } => EventKind::Memory,
        }
    }

    /// Checks if a specific agent is involved in this event.
    pub fn involves_agent(&self, agent: AgentId) -> bool {
        match self {
            SocialEvent::RelationshipFormed { a, b, .. }
            | SocialEvent::BondFormed { a, b, .. }
            | SocialEvent::BondStrengthChanged { a, b, .. }
            | SocialEvent::BondBroken { a, b, .. } => *a == agent || *b == agent,
            SocialEvent::GroupFormed { group, .. } => group.members.contains(&agent),
            SocialEvent::GroupDissolved { .. } => false,
            SocialEvent::LeadershipEmergence { leader_id, .. } => *leader_id == agent,
            SocialEvent::CulturalInnovation { innovation, .. } => innovation.originator == agent,
            SocialEvent::EmotionalContagion { source, target, .. } => {
                *source == agent || *target == agent
            }
            SocialEvent::BondingMilestone { agent: a, target, .. } => *a == agent || *target == agent,
            SocialEvent::MemoryActivated { agent: a, .. } => *a == agent,
        }
    }
}

/// Envelope written to the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier (e.g., "evt_00000042")
    pub event_id: String,
    /// Tick during which the event was emitted
    pub tick: u64,
    /// Simulation time at emission
    pub time: f64,
    #[serde(flatten)]
    pub event: SocialEvent,
}

impl EventRecord {
    /// Wraps an event with its id and timestamp.
    pub fn new(event_id: impl Into<String>, at: SimTime, event: SocialEvent) -> Self {
        Self {
            event_id: event_id.into(),
            tick: at.tick,
            time: at.time,
            event,
        }
    }

    /// Serializes the record to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a record from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_format() {
        assert_eq!(generate_event_id(42), "evt_00000042");
    }

    #[test]
    fn test_record_jsonl_shape() {
        let record = EventRecord::new(
            generate_event_id(1),
            SimTime::new(3, 1.5),
            SocialEvent::RelationshipFormed {
                a: AgentId(1),
                b: AgentId(2),
                relationship_type: RelationshipType::Bond,
            },
        );
        let line = record.to_jsonl().unwrap();
        assert!(line.contains("\"type\":\"relationship_formed\""));
        assert!(line.contains("\"relationship_type\":\"bond\""));
        assert!(line.contains("evt_00000001"));

        let parsed = EventRecord::from_jsonl(&line).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_event_kind_and_involvement() {
        let event = SocialEvent::EmotionalContagion {
            source: AgentId(4),
            target: AgentId(9),
            state: EmotionalState::Happy,
        };
        assert_eq!(event.kind(), EventKind::Emotion);
        assert!(event.involves_agent(AgentId(9)));
        assert!(!event.involves_agent(AgentId(1)));

        let milestone = SocialEvent::BondingMilestone {
            agent: AgentId(2),
            target: AgentId(3),
            milestone: BondMilestone::DeepBond,
        };
        assert_eq!(milestone.kind(), EventKind::Bond);
        assert!(milestone.involves_agent(AgentId(3)));
    }
}
