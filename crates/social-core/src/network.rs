//! Relationship Network
//!
//! Weighted undirected graph over agent ids. Holds only adjacency and
//! weights; agent data lives in the registry. Each unordered pair has one
//! weight, stored under both endpoints.

use std::collections::BTreeMap;

use social_events::AgentId;

/// Weighted undirected relationship graph
#[derive(Debug, Clone)]
pub struct RelationshipNetwork {
    adjacency: BTreeMap<AgentId, BTreeMap<AgentId, f32>>,
    /// Edges with weight at or below this are dropped
    edge_threshold: f32,
}

impl Default for RelationshipNetwork {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl RelationshipNetwork {
    pub fn new(edge_threshold: f32) -> Self {
        Self {
            adjacency: BTreeMap::new(),
            edge_threshold,
        }
    }

    /// Add a node with no edges (no-op if present)
    pub fn add_node(&mut self, id: AgentId) {
        self.adjacency.entry(id).or_default();
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, id: AgentId) {
        if let Some(neighbors) = self.adjacency.remove(&id) {
            for peer in neighbors.keys() {
                if let Some(edges) = self.adjacency.get_mut(peer) {
                    edges.remove(&id);
                }
            }
        }
    }

    pub fn contains_node(&self, id: AgentId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Set the weight of an edge, or remove it if the weight does not exceed
    /// the edge threshold. Missing nodes are created.
    pub fn update_edge(&mut self, a: AgentId, b: AgentId, weight: f32) {
        if a == b {
            return;
        }
        if weight <= self.edge_threshold {
            self.remove_edge(a, b);
            return;
        }
        self.adjacency.entry(a).or_default().insert(b, weight);
        self.adjacency.entry(b).or_default().insert(a, weight);
    }

    /// Remove an edge; missing nodes are created
    pub fn remove_edge(&mut self, a: AgentId, b: AgentId) {
        self.adjacency.entry(a).or_default().remove(&b);
        self.adjacency.entry(b).or_default().remove(&a);
    }

    pub fn weight(&self, a: AgentId, b: AgentId) -> Option<f32> {
        self.adjacency.get(&a).and_then(|n| n.get(&b)).copied()
    }

    /// Neighbors of a node in ascending id order
    pub fn neighbors(&self, id: AgentId) -> impl Iterator<Item = (AgentId, f32)> + '_ {
        self.adjacency
            .get(&id)
            .into_iter()
            .flat_map(|n| n.iter().map(|(peer, w)| (*peer, *w)))
    }

    pub fn degree(&self, id: AgentId) -> usize {
        self.adjacency.get(&id).map_or(0, |n| n.len())
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|n| n.len()).sum::<usize>() / 2
    }

    /// Actual edges over possible edges (0.0 with fewer than two nodes)
    pub fn network_density(&self) -> f32 {
        let n = self.node_count();
        if n < 2 {
            return 0.0;
        }
        let possible = (n * (n - 1)) as f32 / 2.0;
        self.edge_count() as f32 / possible
    }

    /// Mean local clustering over nodes with at least two neighbors
    pub fn clustering_coefficient(&self) -> f32 {
        let mut total = 0.0;
        let mut counted = 0usize;

        for neighbors in self.adjacency.values() {
            let k = neighbors.len();
            if k < 2 {
                continue;
            }
            let peers: Vec<AgentId> = neighbors.keys().copied().collect();
            let mut triangles = 0usize;
            for (i, a) in peers.iter().enumerate() {
                for b in &peers[i + 1..] {
                    if self.weight(*a, *b).is_some() {
                        triangles += 1;
                    }
                }
            }
            let possible = (k * (k - 1)) as f32 / 2.0;
            total += triangles as f32 / possible;
            counted += 1;
        }

        if counted == 0 {
            0.0
        } else {
            total / counted as f32
        }
    }

    /// Mean number of neighbors per node
    pub fn mean_degree(&self) -> f32 {
        if self.adjacency.is_empty() {
            return 0.0;
        }
        (self.edge_count() * 2) as f32 / self.node_count() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> AgentId {
        AgentId(n)
    }

    #[test]
    fn test_weak_edges_are_removed() {
        let mut net = RelationshipNetwork::new(0.1);
        net.update_edge(id(1), id(2), 0.5);
        assert_eq!(net.weight(id(2), id(1)), Some(0.5));
        net.update_edge(id(1), id(2), 0.1);
        assert_eq!(net.weight(id(1), id(2)), None);
        assert_eq!(net.edge_count(), 0);
        assert_eq!(net.node_count(), 2);
    }

    #[test]
    fn test_missing_nodes_are_created() {
        let mut net = RelationshipNetwork::default();
        net.remove_edge(id(7), id(8));
        assert!(net.contains_node(id(7)));
        assert!(net.contains_node(id(8)));
    }

    #[test]
    fn test_density() {
        let mut net = RelationshipNetwork::default();
        assert_eq!(net.network_density(), 0.0);
        for n in 1..=4 {
            net.add_node(id(n));
        }
        net.update_edge(id(1), id(2), 0.5);
        net.update_edge(id(3), id(4), 0.5);
        net.update_edge(id(1), id(3), 0.5);
        assert!((net.network_density() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clustering_triangle_and_star() {
        let mut net = RelationshipNetwork::default();
        net.update_edge(id(1), id(2), 0.5);
        net.update_edge(id(2), id(3), 0.5);
        net.update_edge(id(1), id(3), 0.5);
        assert!((net.clustering_coefficient() - 1.0).abs() < 1e-6);

        let mut star = RelationshipNetwork::default();
        star.update_edge(id(1), id(2), 0.5);
        star.update_edge(id(1), id(3), 0.5);
        star.update_edge(id(1), id(4), 0.5);
        assert_eq!(star.clustering_coefficient(), 0.0);
    }

    #[test]
    fn test_remove_node_drops_edges() {
        let mut net = RelationshipNetwork::default();
        net.update_edge(id(1), id(2), 0.5);
        net.update_edge(id(1), id(3), 0.5);
        net.remove_node(id(1));
        assert_eq!(net.edge_count(), 0);
        assert_eq!(net.degree(id(2)), 0);
        assert!(!net.contains_node(id(1)));
    }
}
