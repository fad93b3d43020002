//! Creature Social Simulation Engine
//!
//! Relationships, groups, culture, emotional contagion and generational
//! bonds for a population of creatures, advanced one tick at a time.
//! Hosts either call `SocialWorld::update_tick` directly or run the
//! `bevy_ecs` schedule from `build_schedule`.

pub mod bounded;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod network;
pub mod output;
pub mod registry;
pub mod setup;
pub mod systems;
pub mod world;

pub use components::*;

pub use config::{ConfigError, SocialConfig};
pub use error::{Result, SocialError};
pub use events::{EventLogger, EventQueue, TickEvents};
pub use network::RelationshipNetwork;
pub use output::{
    count_by_kind, CultureTraitSummary, EmpathyNetworkReport, NetworkStats, SimulationSummary,
};
pub use systems::{build_schedule, InteractionRequest, InteractionResult, TickDelta};
pub use world::SocialWorld;

pub use social_events::{
    AgentId, BondMilestone, BondType, CulturalTrait, EmotionalState, EventRecord, GroupId,
    RelationshipType, SimTime, SocialEvent,
};
