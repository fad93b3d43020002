//! World Components
//!
//! Positions supplied by the host for proximity queries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use social_events::AgentId;

/// A point in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Position on the ground plane
    pub fn planar(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Latest known position of each agent
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    positions: HashMap<AgentId, Position>,
}

impl PositionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, agent: AgentId, position: Position) {
        self.positions.insert(agent, position);
    }

    pub fn get(&self, agent: AgentId) -> Option<Position> {
        self.positions.get(&agent).copied()
    }

    pub fn remove(&mut self, agent: AgentId) {
        self.positions.remove(&agent);
    }

    /// Distance between two agents, if both positions are known
    pub fn distance(&self, a: AgentId, b: AgentId) -> Option<f32> {
        let pa = self.positions.get(&a)?;
        let pb = self.positions.get(&b)?;
        Some(pa.distance(pb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Position::planar(0.0, 0.0);
        let b = Position::planar(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_index_requires_both_positions() {
        let mut index = PositionIndex::new();
        index.set(AgentId(1), Position::planar(0.0, 0.0));
        assert_eq!(index.distance(AgentId(1), AgentId(2)), None);
        index.set(AgentId(2), Position::planar(0.0, 2.0));
        assert_eq!(index.distance(AgentId(1), AgentId(2)), Some(2.0));
        index.remove(AgentId(2));
        assert_eq!(index.get(AgentId(2)), None);
    }
}
