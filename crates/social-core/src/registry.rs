//! Social Agent Registry
//!
//! Dense arena of agents with an id -> slot index. Removal swaps the last
//! slot into the hole and fixes its index entry, so slots are not stable
//! across deregistration but ids are.

use std::collections::HashMap;

use social_events::AgentId;

use crate::components::agent::SocialAgent;
use crate::error::{Result, SocialError};

/// Owns every registered agent
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: Vec<SocialAgent>,
    index: HashMap<AgentId, usize>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, agent: SocialAgent) -> Result<()> {
        if self.index.contains_key(&agent.id) {
            return Err(SocialError::DuplicateAgent(agent.id));
        }
        self.index.insert(agent.id, self.agents.len());
        self.agents.push(agent);
        Ok(())
    }

    /// Remove an agent, returning its record
    pub fn remove(&mut self, id: AgentId) -> Option<SocialAgent> {
        let slot = self.index.remove(&id)?;
        let removed = self.agents.swap_remove(slot);
        if let Some(moved) = self.agents.get(slot) {
            self.index.insert(moved.id, slot);
        }
        Some(removed)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&SocialAgent> {
        self.index.get(&id).map(|slot| &self.agents[*slot])
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut SocialAgent> {
        match self.index.get(&id) {
            Some(slot) => self.agents.get_mut(*slot),
            None => None,
        }
    }

    /// Like [`get`](Self::get) but reports a missing agent as an error
    pub fn require(&self, id: AgentId) -> Result<&SocialAgent> {
        self.get(id).ok_or(SocialError::AgentNotFound(id))
    }

    /// Mutable access to two distinct agents at once
    pub fn get_pair_mut(&mut self, a: AgentId, b: AgentId) -> Result<(&mut SocialAgent, &mut SocialAgent)> {
        if a == b {
            return Err(SocialError::SelfInteraction(a));
        }
        let ia = *self.index.get(&a).ok_or(SocialError::AgentNotFound(a))?;
        let ib = *self.index.get(&b).ok_or(SocialError::AgentNotFound(b))?;
        if ia < ib {
            let (left, right) = self.agents.split_at_mut(ib);
            Ok((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.agents.split_at_mut(ia);
            Ok((&mut right[0], &mut left[ib]))
        }
    }

    /// Agents in arena order
    pub fn iter(&self) -> impl Iterator<Item = &SocialAgent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SocialAgent> {
        self.agents.iter_mut()
    }

    /// Registered ids in ascending order
    pub fn sorted_ids(&self) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.agents.iter().map(|a| a.id).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
