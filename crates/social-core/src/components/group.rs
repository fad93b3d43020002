//! Group Components
//!
//! Social groups, their hierarchy and leadership. Groups reference members
//! by id only; agent state stays in the registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use social_events::{AgentId, GroupId, GroupSummary, LeadershipStyle};

/// A member's place in the group hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    /// Leadership rank (0.0 to 1.0)
    pub rank: f32,
    /// Share of the group's total rank
    pub influence: f32,
}

/// The current leader of a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leadership {
    pub leader: AgentId,
    pub style: LeadershipStyle,
    /// Rank of the leader when they took over
    pub authority: f32,
    pub emerged_at: f64,
}

/// A group of agents with a shared purpose
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialGroup {
    pub id: GroupId,
    /// Members in formation order
    pub members: Vec<AgentId>,
    pub purpose: String,
    /// Cohesion (0.0 to 1.0)
    pub cohesion: f32,
    pub hierarchy: BTreeMap<AgentId, HierarchyEntry>,
    pub leadership: Option<Leadership>,
    /// Cultural trait name -> mean value across members
    pub norms: BTreeMap<String, f32>,
    /// Who talks to whom; every member is linked to every other
    pub communication: BTreeMap<AgentId, Vec<AgentId>>,
    pub formed_at: f64,
}

impl SocialGroup {
    pub fn new(id: GroupId, members: Vec<AgentId>, purpose: impl Into<String>, formed_at: f64) -> Self {
        let mut group = Self {
            id,
            members,
            purpose: purpose.into(),
            cohesion: 0.0,
            hierarchy: BTreeMap::new(),
            leadership: None,
            norms: BTreeMap::new(),
            communication: BTreeMap::new(),
            formed_at,
        };
        group.rebuild_communication();
        group
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.contains(&agent)
    }

    pub fn leader(&self) -> Option<AgentId> {
        self.leadership.as_ref().map(|l| l.leader)
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Remove a member, dropping leadership if they held it.
    /// Returns true if the agent was a member.
    pub fn remove_member(&mut self, agent: AgentId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != agent);
        if self.members.len() == before {
            return false;
        }
        self.hierarchy.remove(&agent);
        if self.leader() == Some(agent) {
            self.leadership = None;
        }
        self.rebuild_communication();
        true
    }

    /// Link every member to all others
    pub fn rebuild_communication(&mut self) {
        self.communication = self
            .members
            .iter()
            .map(|m| {
                let peers = self.members.iter().copied().filter(|p| p != m).collect();
                (*m, peers)
            })
            .collect();
    }

    /// Highest-ranked member, ties going to the earlier member
    pub fn top_ranked(&self) -> Option<(AgentId, f32)> {
        let mut best: Option<(AgentId, f32)> = None;
        for member in &self.members {
            if let Some(entry) = self.hierarchy.get(member) {
                if best.map_or(true, |(_, rank)| entry.rank > rank) {
                    best = Some((*member, entry.rank));
                }
            }
        }
        best
    }

    /// Highest-ranked member other than the current leader
    pub fn top_challenger(&self) -> Option<(AgentId, f32)> {
        let leader = self.leader();
        let mut best: Option<(AgentId, f32)> = None;
        for member in self.members.iter().filter(|m| Some(**m) != leader) {
            if let Some(entry) = self.hierarchy.get(member) {
                if best.map_or(true, |(_, rank)| entry.rank > rank) {
                    best = Some((*member, entry.rank));
                }
            }
        }
        best
    }

    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            group_id: self.id,
            purpose: self.purpose.clone(),
            members: self.members.clone(),
            cohesion: self.cohesion,
            leader: self.leader(),
            norms: self.norms.clone(),
        }
    }
}

/// Registry of all live groups
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: BTreeMap<GroupId, SocialGroup>,
    next_group_id: u32,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
            next_group_id: 1,
        }
    }

    /// Allocate the next group id
    pub fn allocate_id(&mut self) -> GroupId {
        let id = GroupId(self.next_group_id.max(1));
        self.next_group_id = id.0 + 1;
        id
    }

    pub fn insert(&mut self, group: SocialGroup) {
        self.groups.insert(group.id, group);
    }

    pub fn remove(&mut self, id: GroupId) -> Option<SocialGroup> {
        self.groups.remove(&id)
    }

    pub fn get(&self, id: GroupId) -> Option<&SocialGroup> {
        self.groups.get(&id)
    }

    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut SocialGroup> {
        self.groups.get_mut(&id)
    }

    pub fn all(&self) -> impl Iterator<Item = &SocialGroup> {
        self.groups.values()
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut SocialGroup> {
        self.groups.values_mut()
    }

    /// Group ids in ascending order
    pub fn ids(&self) -> Vec<GroupId> {
        self.groups.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
