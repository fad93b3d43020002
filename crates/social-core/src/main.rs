//! Creature Social Simulation
//!
//! Spawns a seeded demo population, runs the tick schedule and prints a
//! JSON summary of the resulting social world.

use bevy_ecs::prelude::*;
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use social_core::setup::{self, SpawnConfig};
use social_core::{
    build_schedule, count_by_kind, EventLogger, SimulationSummary, SocialConfig, SocialWorld,
    TickDelta, TickEvents,
};

/// Distance within which the demo driver proposes bonds
const BOND_PROPOSAL_RANGE: f32 = 5.0;

/// Ticks between demo group and bond proposals
const PROPOSAL_INTERVAL: u64 = 25;

/// Largest random step a creature takes each tick
const WANDER_STEP: f32 = 0.5;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "social_sim")]
#[command(about = "A creature social dynamics simulation")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Number of creatures to spawn
    #[arg(long, default_value_t = 24)]
    agents: usize,

    /// Time covered by each tick
    #[arg(long, default_value_t = 1.0)]
    delta: f32,

    /// Path to the tuning file
    #[arg(long, conflicts_with = "defaults")]
    config: Option<PathBuf>,

    /// Run with built-in tunables instead of a config file
    #[arg(long)]
    defaults: bool,

    /// Append every event to this JSONL file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Random interactions queued per tick
    #[arg(long, default_value_t = 4)]
    interactions_per_tick: usize,
}

fn load_config(args: &Args) -> Option<SocialConfig> {
    if args.defaults {
        return Some(SocialConfig::default());
    }
    let Some(path) = &args.config else {
        error!("no configuration given: pass --config <path> or --defaults");
        return None;
    };
    match SocialConfig::load(path) {
        Ok(config) => Some(config),
        Err(e) => {
            error!("failed to load {}: {}", path.display(), e);
            None
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let Some(config) = load_config(&args) else {
        return ExitCode::FAILURE;
    };

    let mut social = match SocialWorld::new(config, args.seed) {
        Ok(world) => world,
        Err(e) => {
            error!("cannot build world: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Driver randomness is separate from the engine's own stream
    let mut driver_rng = SmallRng::seed_from_u64(args.seed.wrapping_add(1));
    let spawn = SpawnConfig {
        agents: args.agents,
        with_families: true,
    };
    let population = match setup::spawn_population(&mut social, &spawn, &mut driver_rng) {
        Ok(population) => population,
        Err(e) => {
            error!("failed to spawn population: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        seed = args.seed,
        agents = population.agents.len(),
        lineages = population.lineages,
        "spawned population"
    );

    let logger = match &args.events {
        Some(path) => match EventLogger::new(path) {
            Ok(logger) => logger,
            Err(e) => {
                error!("cannot open event log {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => EventLogger::null(),
    };

    let mut world = World::new();
    world.insert_resource(social);
    world.insert_resource(TickDelta(args.delta));
    world.insert_resource(TickEvents::new());
    world.insert_resource(logger);

    let mut schedule = build_schedule();
    let mut events_by_kind: BTreeMap<String, usize> = BTreeMap::new();

    for tick in 0..args.ticks {
        {
            let mut social = world.resource_mut::<SocialWorld>();
            setup::wander(&mut social, &mut driver_rng, WANDER_STEP);
            setup::queue_random_interactions(&mut social, &mut driver_rng, args.interactions_per_tick);
            if tick % PROPOSAL_INTERVAL == 0 {
                setup::propose_bonds(&mut social, BOND_PROPOSAL_RANGE);
                setup::propose_groups(&mut social, "foraging");
            }
        }

        schedule.run(&mut world);

        let tick_events = world.resource::<TickEvents>();
        for (kind, count) in count_by_kind(&tick_events.records) {
            *events_by_kind.entry(kind).or_insert(0) += count;
        }

        if tick > 0 && tick % 100 == 0 {
            let social = world.resource::<SocialWorld>();
            info!(
                tick,
                groups = social.get_groups().len(),
                bonds = social.bond_count(),
                "progress"
            );
        }
    }

    if let Err(e) = world.resource_mut::<EventLogger>().flush() {
        error!("failed to flush event log: {}", e);
    }

    let summary = SimulationSummary::collect(world.resource::<SocialWorld>(), events_by_kind);
    match summary.to_json() {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("failed to serialize summary: {}", e);
            ExitCode::FAILURE
        }
    }
}
