//! Engine Systems
//!
//! One module per engine. Each adds its operations to `SocialWorld` and
//! exposes a thin `bevy_ecs` system that runs its per-tick pass.

pub mod bonding;
pub mod culture;
pub mod emotion;
pub mod groups;
pub mod interaction;
pub mod relationships;
pub mod schedule;

pub use bonding::BondingState;
pub use culture::CultureState;
pub use groups::{compute_cohesion, compute_norms, leadership_rank, MIN_GROUP_SIZE};
pub use interaction::{
    determine_outcome, empathy_gain, interaction_success, personality_compatibility,
    relationship_delta, type_modifier, InteractionRequest, InteractionResult,
};
pub use schedule::{build_schedule, TickDelta};
