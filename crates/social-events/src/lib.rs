//! Shared event types and serialization for the creature social simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for the simulation core and for any presentation layer
//! that consumes the event stream.

pub mod event;
pub mod ids;
pub mod time;
pub mod types;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export identifier types
pub use ids::{AgentId, GroupId};

// Re-export time types
pub use time::SimTime;

// Re-export shared value types
pub use types::{
    BondMilestone, BondType, CulturalTrait, EmotionalState, GroupSummary, InnovationRecord,
    LeadershipStyle, MemorySummary, RelationshipType,
};

// Re-export event types
pub use event::{generate_event_id, EventKind, EventRecord, SocialEvent};
