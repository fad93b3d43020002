//! Error types for the social simulation core.

use social_events::{AgentId, GroupId};
use thiserror::Error;

use crate::config::ConfigError;

/// Top-level error type for social simulation operations.
#[derive(Debug, Error)]
pub enum SocialError {
    /// An operation referenced an agent that is not registered.
    #[error("agent not registered: {0}")]
    AgentNotFound(AgentId),

    /// An operation referenced a group that does not exist.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// `register_agent` was called twice for the same id.
    #[error("agent already registered: {0}")]
    DuplicateAgent(AgentId),

    /// An interaction or bond was requested between an agent and itself.
    #[error("agent {0} cannot interact with itself")]
    SelfInteraction(AgentId),

    /// Group formation with too few or too many members.
    #[error("group size {size} outside allowed range {min}..={max}")]
    GroupSizeOutOfBounds { size: usize, min: usize, max: usize },

    /// The same agent was listed twice in a group formation request.
    #[error("agent {0} listed more than once")]
    DuplicateMember(AgentId),

    /// The world was built from an unusable configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, SocialError>;
