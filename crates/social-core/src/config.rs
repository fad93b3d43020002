//! Configuration System
//!
//! Loads tuning parameters from a TOML file (see `social.toml` at the
//! workspace root). Every field is required: a missing tunable is a load
//! error, never a silent default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default tuning file path
pub const DEFAULT_CONFIG_PATH: &str = "social.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialConfig {
    pub network: NetworkConfig,
    pub interaction: InteractionConfig,
    pub groups: GroupConfig,
    pub culture: CultureConfig,
    pub emotion: EmotionConfig,
    pub bonding: BondingConfig,
}

/// Relationship network parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Edges at or below this weight are removed from the graph
    pub edge_threshold: f32,
    /// Strength lost per unit time by every relationship (toward 0)
    pub relationship_decay_rate: f32,
}

/// Interaction evaluator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Multiplied with each trait's own transmission rate
    pub global_transmission_rate: f32,
    /// Empathy gained per positive interaction before modifiers
    pub empathy_base_gain: f32,
    /// Social skill gained per successful interaction before modifiers
    pub communication_base_gain: f32,
    /// Minimum success for culture to flow during an interaction
    pub cultural_exchange_min_success: f32,
    /// Fraction of the source value kept when a trait is newly adopted
    pub adopted_trait_factor: f32,
    /// Interaction records kept per relationship
    pub history_capacity: usize,
}

/// Group dynamics parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub max_group_size: usize,
    /// Groups dissolve below `cohesion_threshold * 0.3`
    pub cohesion_threshold: f32,
    pub enable_hierarchy: bool,
    /// Rank a member needs to become leader
    pub leadership_threshold: f32,
    /// How far a challenger's rank must exceed the leader's authority
    pub leadership_challenge_margin: f32,
    /// Per-unit-time probability of a qualifying challenge succeeding
    pub leadership_change_rate: f32,
    /// Rate at which members drift toward group norms
    pub conformity_rate: f32,
}

/// Cultural evolution parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureConfig {
    /// Per-unit-time probability of a new innovation
    pub innovation_rate: f32,
    /// Per-unit-time probability of each trait mutating
    pub mutation_rate: f32,
    /// Maximum mutation step before stability scaling
    pub mutation_magnitude: f32,
}

/// Emotional contagion parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionConfig {
    pub sync_rate: f32,
    /// Maximum distance for two agents to count as co-present
    pub contagion_radius: f32,
    /// How long a positive interaction counts as recent
    pub recent_interaction_window: f32,
    /// Chance a successful contagion actually overwrites the target state
    pub overwrite_probability: f32,
}

/// Generational bonding parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondingConfig {
    pub proximity_range: f32,
    pub separation_threshold: f32,
    pub base_growth_rate: f32,
    pub separation_decay_rate: f32,
    /// Bonds at or below this strength are removed
    pub minimum_bond_strength: f32,
    pub minimum_bond_compatibility: f32,
    /// New bonds start at `compatibility * initial_bond_strength`
    pub initial_bond_strength: f32,
    /// Strength at which a forming bond becomes active
    pub active_bond_threshold: f32,
    pub memory_decay_rate: f32,
    /// Scales memory strength into bond growth
    pub memory_influence: f32,
    pub inheritance_rate: f32,
    pub minimum_inherited_memory_strength: f32,
    pub max_generations: u32,
    pub memory_capacity: usize,
    /// Elapsed bond time needed for the lifelong milestone
    pub lifelong_bond_time: f32,
    pub deep_bond_strength: f32,
    pub soulmate_strength: f32,
    /// Minimum age for mate bonds
    pub maturity_age: f32,
    /// Age gap at which age compatibility reaches zero
    pub max_mate_age_gap: f32,
}

impl SocialConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SocialConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a pretty TOML document
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject tunables that would make the simulation meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = [
            ("network.edge_threshold", self.network.edge_threshold),
            ("network.relationship_decay_rate", self.network.relationship_decay_rate),
            ("interaction.global_transmission_rate", self.interaction.global_transmission_rate),
            ("interaction.empathy_base_gain", self.interaction.empathy_base_gain),
            ("interaction.communication_base_gain", self.interaction.communication_base_gain),
            (
                "interaction.cultural_exchange_min_success",
                self.interaction.cultural_exchange_min_success,
            ),
            ("interaction.adopted_trait_factor", self.interaction.adopted_trait_factor),
            ("groups.cohesion_threshold", self.groups.cohesion_threshold),
            ("groups.leadership_threshold", self.groups.leadership_threshold),
            ("groups.leadership_challenge_margin", self.groups.leadership_challenge_margin),
            ("groups.leadership_change_rate", self.groups.leadership_change_rate),
            ("groups.conformity_rate", self.groups.conformity_rate),
            ("culture.innovation_rate", self.culture.innovation_rate),
            ("culture.mutation_rate", self.culture.mutation_rate),
            ("culture.mutation_magnitude", self.culture.mutation_magnitude),
            ("emotion.sync_rate", self.emotion.sync_rate),
            ("emotion.overwrite_probability", self.emotion.overwrite_probability),
            ("bonding.minimum_bond_strength", self.bonding.minimum_bond_strength),
            ("bonding.minimum_bond_compatibility", self.bonding.minimum_bond_compatibility),
            ("bonding.initial_bond_strength", self.bonding.initial_bond_strength),
            ("bonding.active_bond_threshold", self.bonding.active_bond_threshold),
            ("bonding.inheritance_rate", self.bonding.inheritance_rate),
            (
                "bonding.minimum_inherited_memory_strength",
                self.bonding.minimum_inherited_memory_strength,
            ),
            ("bonding.deep_bond_strength", self.bonding.deep_bond_strength),
            ("bonding.soulmate_strength", self.bonding.soulmate_strength),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{} is outside [0, 1]", value),
                });
            }
        }

        let non_negative = [
            ("emotion.contagion_radius", self.emotion.contagion_radius),
            ("emotion.recent_interaction_window", self.emotion.recent_interaction_window),
            ("bonding.proximity_range", self.bonding.proximity_range),
            ("bonding.base_growth_rate", self.bonding.base_growth_rate),
            ("bonding.separation_decay_rate", self.bonding.separation_decay_rate),
            ("bonding.memory_decay_rate", self.bonding.memory_decay_rate),
            ("bonding.memory_influence", self.bonding.memory_influence),
            ("bonding.lifelong_bond_time", self.bonding.lifelong_bond_time),
            ("bonding.maturity_age", self.bonding.maturity_age),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{} must be non-negative", value),
                });
            }
        }

        if self.groups.max_group_size < 2 {
            return Err(ConfigError::Invalid {
                field: "groups.max_group_size",
                reason: "a group needs room for at least 2 members".to_string(),
            });
        }
        if self.interaction.history_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "interaction.history_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.bonding.memory_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "bonding.memory_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.bonding.separation_threshold < self.bonding.proximity_range {
            return Err(ConfigError::Invalid {
                field: "bonding.separation_threshold",
                reason: "must not be smaller than bonding.proximity_range".to_string(),
            });
        }
        if !(self.bonding.max_mate_age_gap > 0.0) {
            return Err(ConfigError::Invalid {
                field: "bonding.max_mate_age_gap",
                reason: "must be positive".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig {
                edge_threshold: 0.1,
                relationship_decay_rate: 0.005,
            },
            interaction: InteractionConfig {
                global_transmission_rate: 0.3,
                empathy_base_gain: 0.01,
                communication_base_gain: 0.005,
                cultural_exchange_min_success: 0.6,
                adopted_trait_factor: 0.7,
                history_capacity: 20,
            },
            groups: GroupConfig {
                max_group_size: 8,
                cohesion_threshold: 0.5,
                enable_hierarchy: true,
                leadership_threshold: 0.7,
                leadership_challenge_margin: 0.2,
                leadership_change_rate: 0.05,
                conformity_rate: 0.05,
            },
            culture: CultureConfig {
                innovation_rate: 0.01,
                mutation_rate: 0.02,
                mutation_magnitude: 0.1,
            },
            emotion: EmotionConfig {
                sync_rate: 0.5,
                contagion_radius: 10.0,
                recent_interaction_window: 5.0,
                overwrite_probability: 0.3,
            },
            bonding: BondingConfig {
                proximity_range: 5.0,
                separation_threshold: 20.0,
                base_growth_rate: 0.05,
                separation_decay_rate: 0.02,
                minimum_bond_strength: 0.01,
                minimum_bond_compatibility: 0.6,
                initial_bond_strength: 0.2,
                active_bond_threshold: 0.3,
                memory_decay_rate: 0.001,
                memory_influence: 0.02,
                inheritance_rate: 0.5,
                minimum_inherited_memory_strength: 0.1,
                max_generations: 3,
                memory_capacity: 20,
                lifelong_bond_time: 1000.0,
                deep_bond_strength: 0.9,
                soulmate_strength: 0.8,
                maturity_age: 1.0,
                max_mate_age_gap: 10.0,
            },
        }
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
