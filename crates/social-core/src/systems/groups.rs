//! Group Dynamics
//!
//! Group formation, cohesion, hierarchy and leadership, norm conformity and
//! dissolution.

use bevy_ecs::prelude::*;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use social_events::{AgentId, GroupId, LeadershipStyle, SocialEvent};

use crate::components::agent::{trait_names, SocialAgent, SocialStatus};
use crate::components::group::{HierarchyEntry, Leadership, SocialGroup};
use crate::error::{Result, SocialError};
use crate::registry::AgentRegistry;
use crate::systems::schedule::TickDelta;
use crate::world::SocialWorld;

/// Smallest allowed group
pub const MIN_GROUP_SIZE: usize = 2;

/// Cohesion assumed for a group too small to have pairs
const LONE_MEMBER_COHESION: f32 = 0.3;

/// Fraction of the cohesion threshold below which a group dissolves
const DISSOLUTION_FACTOR: f32 = 0.3;

/// Hierarchy rank at which a member counts as respected
const RESPECTED_RANK: f32 = 0.5;

/// Mean of the positive pairwise relationship strengths among members
pub fn compute_cohesion(agents: &AgentRegistry, members: &[AgentId]) -> f32 {
    if members.len() < 2 {
        return LONE_MEMBER_COHESION;
    }
    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in members.iter().enumerate() {
        let Some(agent) = agents.get(*a) else { continue };
        for b in &members[i + 1..] {
            let strength = agent.relationship_strength(*b);
            if strength > 0.0 {
                total += strength;
                pairs += 1;
            }
        }
    }
    if pairs == 0 {
        0.0
    } else {
        (total / pairs as f32).clamp(0.0, 1.0)
    }
}

/// Leadership rank of one member within a group
pub fn leadership_rank(agent: &SocialAgent, members: &[AgentId]) -> f32 {
    let peers: Vec<f32> = members
        .iter()
        .filter(|m| **m != agent.id)
        .map(|m| agent.relationship_strength(*m))
        .collect();
    let mean_strength = if peers.is_empty() {
        0.0
    } else {
        peers.iter().sum::<f32>() / peers.len() as f32
    };

    let rank = 0.3 * agent.personality.get(trait_names::EXTRAVERSION)
        + 0.2 * agent.personality.get(trait_names::CONSCIENTIOUSNESS)
        + 0.4 * agent.leadership_trait()
        + 0.1 * mean_strength;
    rank.clamp(0.0, 1.0)
}

/// Per-trait mean of every member's cultural traits
pub fn compute_norms(agents: &AgentRegistry, members: &[AgentId]) -> BTreeMap<String, f32> {
    let mut sums: BTreeMap<String, (f32, usize)> = BTreeMap::new();
    for agent in members.iter().filter_map(|m| agents.get(*m)) {
        for cultural_trait in &agent.cultural_traits {
            let entry = sums.entry(cultural_trait.name.clone()).or_insert((0.0, 0));
            entry.0 += cultural_trait.value;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(name, (sum, count))| (name, sum / count as f32))
        .collect()
}

/// Rank every member and spread influence in proportion to rank
fn build_hierarchy(agents: &AgentRegistry, members: &[AgentId]) -> BTreeMap<AgentId, HierarchyEntry> {
    let ranks: Vec<(AgentId, f32)> = members
        .iter()
        .filter_map(|m| agents.get(*m).map(|a| (*m, leadership_rank(a, members))))
        .collect();
    let total: f32 = ranks.iter().map(|(_, r)| r).sum();
    ranks
        .into_iter()
        .map(|(id, rank)| {
            let influence = if total > 0.0 { rank / total } else { 0.0 };
            (id, HierarchyEntry { rank, influence })
        })
        .collect()
}

fn leadership_style(agent: &SocialAgent) -> LeadershipStyle {
    LeadershipStyle::classify(
        agent.personality.get(trait_names::AGREEABLENESS),
        agent.personality.get(trait_names::CONSCIENTIOUSNESS),
    )
}

impl SocialWorld {
    /// Form a group from registered agents. The member list keeps the
    /// given order.
    pub fn form_group(&mut self, members: &[AgentId], purpose: &str) -> Result<GroupId> {
        let max = self.config.groups.max_group_size;
        if members.len() < MIN_GROUP_SIZE || members.len() > max {
            warn!(size = members.len(), "group formation rejected: size out of bounds");
            return Err(SocialError::GroupSizeOutOfBounds {
                size: members.len(),
                min: MIN_GROUP_SIZE,
                max,
            });
        }
        let mut seen = BTreeSet::new();
        for member in members {
            if !seen.insert(*member) {
                return Err(SocialError::DuplicateMember(*member));
            }
            if !self.agents.contains(*member) {
                warn!(agent = %member, "group formation rejected: agent not registered");
                return Err(SocialError::AgentNotFound(*member));
            }
        }

        let id = self.groups.allocate_id();
        let mut group = SocialGroup::new(id, members.to_vec(), purpose, self.clock.time);
        group.cohesion = compute_cohesion(&self.agents, &group.members);
        group.norms = compute_norms(&self.agents, &group.members);

        let mut emerged = None;
        if self.config.groups.enable_hierarchy {
            group.hierarchy = build_hierarchy(&self.agents, &group.members);
            if let Some((leader, rank)) = group.top_ranked() {
                if rank > self.config.groups.leadership_threshold {
                    if let Some(agent) = self.agents.get(leader) {
                        group.leadership = Some(Leadership {
                            leader,
                            style: leadership_style(agent),
                            authority: rank,
                            emerged_at: self.clock.time,
                        });
                        emerged = Some(leader);
                    }
                }
            }
        }

        for member in members {
            if let Some(agent) = self.agents.get_mut(*member) {
                agent.groups.insert(id);
            }
        }

        info!(group = %id, size = members.len(), cohesion = group.cohesion, purpose, "group formed");
        let summary = group.summary();
        self.groups.insert(group);
        self.refresh_statuses();

        self.emit(SocialEvent::GroupFormed { group_id: id, group: summary });
        if let Some(leader_id) = emerged {
            self.emit(SocialEvent::LeadershipEmergence { group_id: id, leader_id });
        }
        Ok(id)
    }

    /// Remove a group and every membership pointing at it
    pub(crate) fn dissolve_group(&mut self, id: GroupId) {
        let Some(group) = self.groups.remove(id) else {
            return;
        };
        for member in &group.members {
            if let Some(agent) = self.agents.get_mut(*member) {
                agent.groups.remove(&id);
            }
        }
        info!(group = %id, cohesion = group.cohesion, "group dissolved");
        self.emit(SocialEvent::GroupDissolved {
            group_id: id,
            cohesion: group.cohesion,
        });
    }

    /// Per-tick group pass: cohesion, dissolution, hierarchy, leadership
    /// challenges, norms and conformity, then social status.
    pub(crate) fn update_groups(&mut self, dt: f32) {
        let threshold = self.config.groups.cohesion_threshold * DISSOLUTION_FACTOR;

        for id in self.groups.ids() {
            let Some(group) = self.groups.get_mut(id) else { continue };
            group.members.retain(|m| self.agents.contains(*m));
            group.cohesion = compute_cohesion(&self.agents, &group.members);
            if group.cohesion < threshold || group.size() < MIN_GROUP_SIZE {
                self.dissolve_group(id);
                continue;
            }

            if self.config.groups.enable_hierarchy {
                self.update_leadership(id, dt);
            }
            self.apply_conformity(id, dt);
        }

        self.refresh_statuses();
    }

    fn update_leadership(&mut self, id: GroupId, dt: f32) {
        let leadership_threshold = self.config.groups.leadership_threshold;
        let margin = self.config.groups.leadership_challenge_margin;
        let change_rate = self.config.groups.leadership_change_rate;
        let now = self.clock.time;

        let Some(group) = self.groups.get_mut(id) else { return };
        group.hierarchy = build_hierarchy(&self.agents, &group.members);

        // Leadership lapses once the leader no longer qualifies
        if let Some(leader) = group.leader() {
            let rank = group.hierarchy.get(&leader).map_or(0.0, |e| e.rank);
            if rank <= leadership_threshold {
                debug!(group = %id, leader = %leader, rank, "leadership lapsed");
                group.leadership = None;
            }
        }

        let mut new_leader = None;
        match group.leadership.as_ref() {
            None => {
                if let Some((candidate, rank)) = group.top_ranked() {
                    if rank > leadership_threshold {
                        new_leader = Some((candidate, rank));
                    }
                }
            }
            Some(current) => {
                if let Some((challenger, rank)) = group.top_challenger() {
                    if rank > current.authority + margin && self.rng.gen::<f32>() < change_rate * dt {
                        new_leader = Some((challenger, rank));
                    }
                }
            }
        }

        if let Some((leader, rank)) = new_leader {
            let style = self
                .agents
                .get(leader)
                .map_or(LeadershipStyle::LaissezFaire, leadership_style);
            group.leadership = Some(Leadership {
                leader,
                style,
                authority: rank,
                emerged_at: now,
            });
            info!(group = %id, leader = %leader, ?style, "leadership emerged");
            self.emit(SocialEvent::LeadershipEmergence { group_id: id, leader_id: leader });
        }
    }

    /// Recompute norms and pull members' traits toward them
    fn apply_conformity(&mut self, id: GroupId, dt: f32) {
        let rate = self.config.groups.conformity_rate * dt;
        let Some(group) = self.groups.get_mut(id) else { return };
        group.norms = compute_norms(&self.agents, &group.members);
        group.rebuild_communication();
        if rate <= 0.0 {
            return;
        }

        for member in &group.members {
            let Some(agent) = self.agents.get_mut(*member) else { continue };
            for cultural_trait in agent.cultural_traits.iter_mut() {
                if let Some(norm) = group.norms.get(&cultural_trait.name) {
                    let pull = (norm - cultural_trait.value) * rate * (1.0 - cultural_trait.stability);
                    cultural_trait.value = (cultural_trait.value + pull).clamp(0.0, 1.0);
                }
            }
        }
    }

    /// Derive every agent's status from current group standing
    pub(crate) fn refresh_statuses(&mut self) {
        let mut standing: BTreeMap<AgentId, SocialStatus> = BTreeMap::new();
        for group in self.groups.all() {
            for member in &group.members {
                let status = if group.leader() == Some(*member) {
                    SocialStatus::Leader
                } else if group.hierarchy.get(member).map_or(false, |e| e.rank >= RESPECTED_RANK) {
                    SocialStatus::Respected
                } else {
                    SocialStatus::Member
                };
                let entry = standing.entry(*member).or_insert(status);
                *entry = (*entry).max(status);
            }
        }
        for agent in self.agents.iter_mut() {
            agent.status = standing
                .get(&agent.id)
                .copied()
                .unwrap_or(SocialStatus::Unaffiliated);
        }
    }

    pub fn group(&self, id: GroupId) -> Option<&SocialGroup> {
        self.groups.get(id)
    }

    /// Take an agent out of a group. A group left with fewer than two
    /// members dissolves.
    pub fn leave_group(&mut self, agent: AgentId, id: GroupId) -> Result<()> {
        let group = self.groups.get_mut(id).ok_or(SocialError::GroupNotFound(id))?;
        if !group.remove_member(agent) {
            return Err(SocialError::AgentNotFound(agent));
        }
        let remaining = group.size();
        if let Some(member) = self.agents.get_mut(agent) {
            member.groups.remove(&id);
        }
        debug!(group = %id, %agent, remaining, "member left group");

        if remaining < MIN_GROUP_SIZE {
            self.dissolve_group(id);
        }
        self.refresh_statuses();
        Ok(())
    }
}

/// System: group pass
pub fn update_groups(delta: Res<TickDelta>, mut world: ResMut<SocialWorld>) {
    world.update_groups(delta.seconds());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::{Personality, SocialTraits};
    use crate::components::relationship::InteractionType;
    use crate::config::SocialConfig;

    fn leader_traits() -> (Personality, SocialTraits) {
        let personality = Personality::new()
            .with(trait_names::EXTRAVERSION, 1.0)
            .with(trait_names::CONSCIENTIOUSNESS, 1.0)
            .with(trait_names::AGREEABLENESS, 0.9);
        let social = SocialTraits::new().with(trait_names::LEADERSHIP, 1.0);
        (personality, social)
    }

    fn world_with(n: u32) -> SocialWorld {
        let mut world = SocialWorld::new(SocialConfig::default(), 5).unwrap();
        for i in 1..=n {
            world
                .register_agent(AgentId(i), Personality::new(), SocialTraits::new())
                .unwrap();
        }
        world
    }

    fn befriend(world: &mut SocialWorld, a: u32, b: u32) {
        for _ in 0..2 {
            world
                .resolve_interaction(AgentId(a), AgentId(b), InteractionType::Cooperation, None, 0.9)
                .unwrap();
        }
    }

    #[test]
    fn test_size_bounds() {
        let mut world = world_with(10);
        assert!(matches!(
            world.form_group(&[AgentId(1)], "solo"),
            Err(SocialError::GroupSizeOutOfBounds { size: 1, .. })
        ));
        let too_many: Vec<AgentId> = (1..=9).map(AgentId).collect();
        assert!(world.form_group(&too_many, "crowd").is_err());
        assert!(matches!(
            world.form_group(&[AgentId(1), AgentId(1)], "echo"),
            Err(SocialError::DuplicateMember(_))
        ));
        assert!(matches!(
            world.form_group(&[AgentId(1), AgentId(42)], "ghost"),
            Err(SocialError::AgentNotFound(AgentId(42)))
        ));
        assert!(world.get_groups().is_empty());
    }

    #[test]
    fn test_cohesion_and_norms() {
        let mut world = world_with(3);
        befriend(&mut world, 1, 2);
        let id = world.form_group(&[AgentId(1), AgentId(2), AgentId(3)], "herd").unwrap();
        let group = world.group(id).unwrap();
        let expected = world.get_relationship(AgentId(1), AgentId(2)).unwrap().strength;
        assert!((group.cohesion - expected).abs() < 1e-6);
        assert_eq!(group.communication[&AgentId(1)].len(), 2);
        assert!(group.norms.contains_key("cooperation_tendency"));
        assert!(world.agent(AgentId(3)).unwrap().groups.contains(&id));
    }

    #[test]
    fn test_leader_emerges_with_style() {
        let mut world = world_with(2);
        let (personality, social) = leader_traits();
        world.register_agent(AgentId(3), personality, social).unwrap();
        befriend(&mut world, 1, 3);
        befriend(&mut world, 2, 3);

        let id = world.form_group(&[AgentId(1), AgentId(2), AgentId(3)], "pack").unwrap();
        let group = world.group(id).unwrap();
        let leadership = group.leadership.as_ref().unwrap();
        assert_eq!(leadership.leader, AgentId(3));
        assert_eq!(leadership.style, LeadershipStyle::Democratic);
        assert_eq!(world.get_status(AgentId(3)), Some(SocialStatus::Leader));
        assert_eq!(world.get_status(AgentId(1)), Some(SocialStatus::Member));

        let influence: f32 = group.hierarchy.values().map(|e| e.influence).sum();
        assert!((influence - 1.0).abs() < 1e-5);

        let events = world.drain_events();
        assert!(events.iter().any(|r| matches!(
            r.event,
            SocialEvent::LeadershipEmergence { leader_id: AgentId(3), .. }
        )));
    }

    #[test]
    fn test_strangers_dissolve_on_tick() {
        let mut world = world_with(3);
        let id = world.form_group(&[AgentId(1), AgentId(2), AgentId(3)], "strangers").unwrap();
        world.update_tick(1.0);
        assert!(world.group(id).is_none());
        for n in 1..=3 {
            let agent = world.agent(AgentId(n)).unwrap();
            assert!(!agent.groups.contains(&id));
            assert_eq!(agent.status, SocialStatus::Unaffiliated);
        }
        assert!(world
            .drain_events()
            .iter()
            .any(|r| matches!(r.event, SocialEvent::GroupDissolved { group_id, .. } if group_id == id)));
    }

    #[test]
    fn test_conformity_pulls_toward_norms() {
        let mut world = world_with(1);
        let open = Personality::new().with(trait_names::OPENNESS, 1.0);
        world.register_agent(AgentId(2), open, SocialTraits::new()).unwrap();
        befriend(&mut world, 1, 2);
        let id = world.form_group(&[AgentId(1), AgentId(2)], "pair").unwrap();

        let before = world
            .agent(AgentId(2))
            .unwrap()
            .cultural_trait("innovation_openness")
            .unwrap()
            .value;
        world.update_groups(1.0);
        let after = world
            .agent(AgentId(2))
            .unwrap()
            .cultural_trait("innovation_openness")
            .unwrap()
            .value;
        assert!(world.group(id).is_some());
        assert!(after < before);
    }

    #[test]
    fn test_leave_group() {
        let mut world = world_with(3);
        befriend(&mut world, 1, 2);
        befriend(&mut world, 2, 3);
        befriend(&mut world, 1, 3);
        let id = world.form_group(&[AgentId(1), AgentId(2), AgentId(3)], "trio").unwrap();

        world.leave_group(AgentId(3), id).unwrap();
        assert_eq!(world.group(id).unwrap().members, vec![AgentId(1), AgentId(2)]);
        assert_eq!(world.get_status(AgentId(3)), Some(SocialStatus::Unaffiliated));
        assert!(matches!(
            world.leave_group(AgentId(3), id),
            Err(SocialError::AgentNotFound(AgentId(3)))
        ));

        world.leave_group(AgentId(2), id).unwrap();
        assert!(world.group(id).is_none());
        assert!(world.agent(AgentId(1)).unwrap().groups.is_empty());
        assert!(matches!(
            world.leave_group(AgentId(1), id),
            Err(SocialError::GroupNotFound(_))
        ));
    }
}
