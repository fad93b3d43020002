//! Run Summary
//!
//! End-of-run statistics printed by the CLI.

use serde::Serialize;
use std::collections::BTreeMap;

use social_events::GroupSummary;

use super::report::{CultureTraitSummary, EmpathyNetworkReport, NetworkStats};
use crate::world::SocialWorld;

/// Overall simulation statistics
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub ticks: u64,
    pub time: f64,
    pub agents: usize,
    pub bonds: usize,
    pub memories: usize,
    pub innovations: usize,
    pub total_events: usize,
    pub events_by_kind: BTreeMap<String, usize>,
    pub groups: Vec<GroupSummary>,
    pub network: NetworkStats,
    pub cultural_diversity: f32,
    pub culture: Vec<CultureTraitSummary>,
    pub empathy: EmpathyNetworkReport,
}

impl SimulationSummary {
    /// Snapshot the world; `events_by_kind` comes from whoever drained the
    /// event stream
    pub fn collect(world: &SocialWorld, events_by_kind: BTreeMap<String, usize>) -> Self {
        let now = world.now();
        Self {
            seed: world.seed(),
            ticks: now.tick,
            time: now.time,
            agents: world.agent_count(),
            bonds: world.bond_count(),
            memories: world.memory_count(),
            innovations: world.innovations().len(),
            total_events: events_by_kind.values().sum(),
            events_by_kind,
            groups: world.get_groups(),
            network: world.network_stats(),
            cultural_diversity: world.cultural_diversity(),
            culture: world.get_global_culture(),
            empathy: world.get_empathy_network_report(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SocialConfig;

    #[test]
    fn test_summary_serializes() {
        let world = SocialWorld::new(SocialConfig::default(), 77).unwrap();
        let mut counts = BTreeMap::new();
        counts.insert("group".to_string(), 2);
        let summary = SimulationSummary::collect(&world, counts);
        assert_eq!(summary.seed, 77);
        assert_eq!(summary.total_events, 2);

        let json = summary.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["network"]["nodes"], 0);
        assert_eq!(value["events_by_kind"]["group"], 2);
    }
}
