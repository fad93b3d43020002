//! Reports
//!
//! Read-only summaries of the social world for hosts and the CLI.

use serde::Serialize;
use std::collections::BTreeMap;

use social_events::{AgentId, EmotionalState, EventKind, EventRecord};

use crate::network::RelationshipNetwork;
use crate::world::SocialWorld;

/// Empathy at or above which an agent counts as highly empathic
pub const HIGH_EMPATHY: f32 = 0.7;

/// Both empathies must exceed this for a pair to count as an empathic link
const EMPATHIC_LINK_EMPATHY: f32 = 0.5;

/// Aggregate view of one cultural trait name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CultureTraitSummary {
    pub name: String,
    pub mean_value: f32,
    /// Share of agents carrying the trait
    pub prevalence: f32,
    pub carriers: usize,
    pub variance: f32,
}

/// Shape of the relationship graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkStats {
    pub nodes: usize,
    pub edges: usize,
    pub density: f32,
    pub clustering: f32,
    pub mean_degree: f32,
}

impl NetworkStats {
    pub fn from_network(network: &RelationshipNetwork) -> Self {
        Self {
            nodes: network.node_count(),
            edges: network.edge_count(),
            density: network.network_density(),
            clustering: network.clustering_coefficient(),
            mean_degree: network.mean_degree(),
        }
    }
}

/// Empathy and emotion across the whole population
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmpathyNetworkReport {
    pub agent_count: usize,
    pub mean_empathy: f32,
    pub high_empathy_agents: Vec<AgentId>,
    /// Pairs where both empathies exceed 0.5 and the relationship is positive
    pub empathic_links: usize,
    /// Emotional state -> number of agents in it
    pub emotion_distribution: BTreeMap<String, usize>,
    pub network_density: f32,
    pub clustering_coefficient: f32,
}

/// Count of drained events by kind
pub fn count_by_kind(records: &[EventRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        let kind = match record.event.kind() {
            EventKind::Relationship => "relationship",
            EventKind::Group => "group",
            EventKind::Leadership => "leadership",
            EventKind::Culture => "culture",
            EventKind::Emotion => "emotion",
            EventKind::Bond => "bond",
            EventKind::Memory => "memory",
        };
        *counts.entry(kind.to_string()).or_insert(0) += 1;
    }
    counts
}

impl SocialWorld {
    pub fn network_stats(&self) -> NetworkStats {
        NetworkStats::from_network(&self.network)
    }

    pub fn get_empathy_network_report(&self) -> EmpathyNetworkReport {
        let agent_count = self.agents.len();
        let mean_empathy = if agent_count == 0 {
            0.0
        } else {
            self.agents.iter().map(|a| a.empathy).sum::<f32>() / agent_count as f32
        };

        let mut high_empathy_agents: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|a| a.empathy >= HIGH_EMPATHY)
            .map(|a| a.id)
            .collect();
        high_empathy_agents.sort();

        let mut empathic_links = 0;
        for agent in self.agents.iter().filter(|a| a.empathy > EMPATHIC_LINK_EMPATHY) {
            for (peer, rel) in agent.relationships.range(agent.id..) {
                let peer_empathy = self.agents.get(*peer).map_or(0.0, |p| p.empathy);
                if *peer != agent.id && rel.strength > 0.0 && peer_empathy > EMPATHIC_LINK_EMPATHY {
                    empathic_links += 1;
                }
            }
        }

        let mut emotion_distribution: BTreeMap<String, usize> = EmotionalState::all()
            .iter()
            .map(|s| (s.to_string(), 0))
            .collect();
        for agent in self.agents.iter() {
            *emotion_distribution
                .entry(agent.emotional_state.to_string())
                .or_insert(0) += 1;
        }

        EmpathyNetworkReport {
            agent_count,
            mean_empathy,
            high_empathy_agents,
            empathic_links,
            emotion_distribution,
            network_density: self.network.network_density(),
            clustering_coefficient: self.network.clustering_coefficient(),
        }
    }
}
