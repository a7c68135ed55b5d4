//! Error types for configuration loading and player actions.

use thiserror::Error;

use crate::sim::player::PlacementKind;

/// Errors that can occur when loading or validating a [`crate::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing failed.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range.
    #[error("Invalid config value '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Why a player ability was rejected.
///
/// Rejections are ordinary outcomes, not faults: the caller simply does not
/// get the action this tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AbilityError {
    /// The ability's cooldown gate is still closed.
    #[error("Ability on cooldown ({remaining:.2}s remaining)")]
    OnCooldown { remaining: f32 },

    /// The per-player cap for a placed hazard is reached.
    #[error("Maximum {kind} count reached ({max})")]
    CapReached { kind: PlacementKind, max: usize },

    /// The session is paused or over.
    #[error("Game is not running")]
    GameNotRunning,
}
