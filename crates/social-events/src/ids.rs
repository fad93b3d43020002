//! Identifier Types
//!
//! Stable integer handles for agents and groups.
//!
//! # Example
//!
//! ```
//! use social_events::{AgentId, GroupId};
//!
//! assert_eq!(AgentId(7).to_string(), "agent_0007");
//! assert_eq!(GroupId(3).to_string(), "group_0003");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a simulated creature.
///
/// Assigned by the host; the registry never invents agent ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl AgentId {
    /// Returns the ordered pair `(low, high)` for an unordered agent pair.
    pub fn ordered_pair(a: AgentId, b: AgentId) -> (AgentId, AgentId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent_{:04}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(value: u32) -> Self {
        AgentId(value)
    }
}

/// Identifier of a social group, allocated by the group engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group_{:04}", self.0)
    }
}
