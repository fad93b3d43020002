//! Setup
//!
//! Population spawning and the demo driver used by the CLI.

pub mod population;

pub use population::{
    propose_bonds, propose_groups, queue_random_interactions, spawn_population, wander,
    PopulationSummary, SpawnConfig,
};
