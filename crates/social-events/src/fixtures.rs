//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // social-events = { path = "../social-events", features = ["test-fixtures"] }
//!
//! use social_events::fixtures;
//!
//! let records = fixtures::sample_records();
//! ```

use crate::{
    generate_event_id, AgentId, BondMilestone, BondType, CulturalTrait, EmotionalState,
    EventRecord, GroupId, GroupSummary, InnovationRecord, MemorySummary, RelationshipType, SimTime,
    SocialEvent,
};

/// Returns a short, ordered event stream touching every event category.
pub fn sample_records() -> Vec<EventRecord> {
    let events = vec![
        SocialEvent::RelationshipFormed {
            a: AgentId(1),
            b: AgentId(2),
            relationship_type: RelationshipType::Bond,
        },
        SocialEvent::GroupFormed {
            group_id: GroupId(1),
            group: GroupSummary {
                group_id: GroupId(1),
                purpose: "foraging".to_string(),
                members: vec![AgentId(1), AgentId(2), AgentId(3)],
                cohesion: 0.6,
                leader: Some(AgentId(1)),
                norms: Default::default(),
            },
        },
        SocialEvent::LeadershipEmergence {
            group_id: GroupId(1),
            leader_id: AgentId(1),
        },
        SocialEvent::CulturalInnovation {
            cultural_trait: CulturalTrait::new("tool_use_1", 0.4, 0.5, 0.3),
            innovation: InnovationRecord {
                innovation_id: 1,
                originator: AgentId(3),
                cultural_trait: CulturalTrait::new("tool_use_1", 0.4, 0.5, 0.3),
                time: 3.0,
            },
        },
        SocialEvent::EmotionalContagion {
            source: AgentId(2),
            target: AgentId(3),
            state: EmotionalState::Excited,
        },
        SocialEvent::BondFormed {
            a: AgentId(1),
            b: AgentId(4),
            bond_type: BondType::Parent,
            strength: 0.19,
        },
        SocialEvent::BondingMilestone {
            agent: AgentId(1),
            target: AgentId(4),
            milestone: BondMilestone::DeepBond,
        },
        SocialEvent::MemoryActivated {
            agent: AgentId(4),
            memory: MemorySummary {
                target: AgentId(2),
                bond_type: BondType::Companion,
                strength: 0.25,
                emotional_weight: 0.8,
                generations_remaining: 2,
            },
        },
    ];

    events
        .into_iter()
        .enumerate()
        .map(|(i, event)| {
            let seq = i as u64 + 1;
            EventRecord::new(generate_event_id(seq), SimTime::new(seq, seq as f64), event)
        })
        .collect()
}
