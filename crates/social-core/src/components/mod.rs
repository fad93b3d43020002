//! Simulation Components
//!
//! Plain data owned by the social world: agents, relationships, groups,
//! bonds and positions.

pub mod agent;
pub mod bond;
pub mod group;
pub mod relationship;
pub mod world;

pub use agent::*;
pub use bond::*;
pub use group::*;
pub use relationship::*;
pub use world::*;
