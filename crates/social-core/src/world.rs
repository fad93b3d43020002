//! Social World
//!
//! The explicit context every engine runs against. It owns the agent
//! registry, the relationship network, groups, culture and bonding state,
//! the host-supplied positions, the seeded random source and the outbound
//! event queue. All mutation goes through `&mut SocialWorld`, so there is a
//! single writer per tick.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

use social_events::{AgentId, EmotionalState, EventRecord, GroupSummary, SimTime, SocialEvent};

use crate::components::agent::{Personality, SocialAgent, SocialStatus, SocialTraits};
use crate::components::group::GroupRegistry;
use crate::components::relationship::SocialRelationship;
use crate::components::world::{Position, PositionIndex};
use crate::config::SocialConfig;
use crate::error::{Result, SocialError};
use crate::events::EventQueue;
use crate::network::RelationshipNetwork;
use crate::registry::AgentRegistry;
use crate::systems::bonding::BondingState;
use crate::systems::culture::CultureState;
use crate::systems::interaction::InteractionRequest;

/// Clamp a host-supplied tick delta to a usable value
pub(crate) fn effective_delta(delta: f32) -> f32 {
    if delta.is_finite() && delta > 0.0 {
        delta
    } else {
        0.0
    }
}

/// Resource: the whole social simulation state
#[derive(Resource)]
pub struct SocialWorld {
    pub(crate) config: SocialConfig,
    pub(crate) agents: AgentRegistry,
    pub(crate) network: RelationshipNetwork,
    pub(crate) groups: GroupRegistry,
    pub(crate) culture: CultureState,
    pub(crate) bonding: BondingState,
    pub(crate) positions: PositionIndex,
    pub(crate) rng: SmallRng,
    pub(crate) events: EventQueue,
    pub(crate) pending: VecDeque<InteractionRequest>,
    pub(crate) clock: SimTime,
    seed: u64,
}

impl SocialWorld {
    /// Build a world from a validated configuration and a random seed
    pub fn new(config: SocialConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        info!(seed, "creating social world");
        Ok(Self {
            network: RelationshipNetwork::new(config.network.edge_threshold),
            config,
            agents: AgentRegistry::new(),
            groups: GroupRegistry::new(),
            culture: CultureState::new(),
            bonding: BondingState::new(),
            positions: PositionIndex::new(),
            rng: SmallRng::seed_from_u64(seed),
            events: EventQueue::new(),
            pending: VecDeque::new(),
            clock: SimTime::default(),
            seed,
        })
    }

    pub fn config(&self) -> &SocialConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current simulation time
    pub fn now(&self) -> SimTime {
        self.clock
    }

    pub fn network(&self) -> &RelationshipNetwork {
        &self.network
    }

    pub fn agent(&self, id: AgentId) -> Option<&SocialAgent> {
        self.agents.get(id)
    }

    /// Agents in registry order
    pub fn agents(&self) -> impl Iterator<Item = &SocialAgent> {
        self.agents.iter()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub(crate) fn emit(&mut self, event: SocialEvent) {
        self.events.push(self.clock, event);
    }

    /// Register an agent with its personality and social-trait maps
    pub fn register_agent(
        &mut self,
        id: AgentId,
        personality: Personality,
        social_traits: SocialTraits,
    ) -> Result<()> {
        self.agents
            .insert(SocialAgent::new(id, personality, social_traits))?;
        self.network.add_node(id);
        debug!(agent = %id, "registered agent");
        Ok(())
    }

    /// Remove an agent and every trace of it: edges, mirrored relationship
    /// records, group memberships, bonds, memories and its position.
    pub fn deregister_agent(&mut self, id: AgentId) -> Result<()> {
        let Some(agent) = self.agents.remove(id) else {
            warn!(agent = %id, "deregister skipped: agent not registered");
            return Err(SocialError::AgentNotFound(id));
        };

        self.network.remove_node(id);
        for peer in agent.relationships.keys() {
            if let Some(peer_agent) = self.agents.get_mut(*peer) {
                peer_agent.relationships.remove(&id);
            }
        }

        for group_id in &agent.groups {
            let shrunk = match self.groups.get_mut(*group_id) {
                Some(group) => {
                    group.remove_member(id);
                    group.size() < 2
                }
                None => false,
            };
            if shrunk {
                self.dissolve_group(*group_id);
            }
        }

        self.bonding.forget_agent(id);
        self.positions.remove(id);
        self.refresh_statuses();
        info!(agent = %id, "deregistered agent");
        Ok(())
    }

    /// Record the host's latest position for an agent
    pub fn set_position(&mut self, id: AgentId, position: Position) -> Result<()> {
        if !self.agents.contains(id) {
            return Err(SocialError::AgentNotFound(id));
        }
        self.positions.set(id, position);
        Ok(())
    }

    pub fn position(&self, id: AgentId) -> Option<Position> {
        self.positions.get(id)
    }

    /// The relationship record `a` holds about `b`
    pub fn get_relationship(&self, a: AgentId, b: AgentId) -> Option<&SocialRelationship> {
        self.agents.get(a).and_then(|agent| agent.relationship(b))
    }

    /// Snapshots of every live group, in id order
    pub fn get_groups(&self) -> Vec<GroupSummary> {
        self.groups.all().map(|g| g.summary()).collect()
    }

    pub fn get_emotional_state(&self, id: AgentId) -> Option<EmotionalState> {
        self.agents.get(id).map(|a| a.emotional_state)
    }

    /// Overwrite an agent's emotional state (host-driven stimulus)
    pub fn set_emotional_state(&mut self, id: AgentId, state: EmotionalState) -> Result<()> {
        let agent = self.agents.get_mut(id).ok_or(SocialError::AgentNotFound(id))?;
        agent.emotional_state = state;
        Ok(())
    }

    pub fn get_status(&self, id: AgentId) -> Option<SocialStatus> {
        self.agents.get(id).map(|a| a.status)
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        self.events.drain()
    }

    /// Events waiting to be drained
    pub fn pending_events(&self) -> impl Iterator<Item = &EventRecord> {
        self.events.iter()
    }

    /// Advance the simulation by one tick of `delta` time units.
    ///
    /// Runs queued interactions, relationship decay, groups, culture,
    /// emotion and bonding in that order, then advances the clock. A delta
    /// of zero leaves every strength untouched and keeps queued
    /// interactions for the next tick; a negative one is treated as zero.
    pub fn update_tick(&mut self, delta: f32) {
        let dt = effective_delta(delta);
        if dt != delta {
            warn!(delta, "non-positive tick delta treated as zero");
        }
        self.run_pending_interactions(dt);
        self.decay_relationships(dt);
        self.update_groups(dt);
        self.evolve_culture(dt);
        self.spread_emotions(dt);
        self.update_bonds(dt);
        self.clock.advance(dt);
    }
}
