use serde::{Deserialize, Serialize};

use super::piece_generator::{PieceSeed, Randomizer};

/// Tunable parameters of a game session.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use blockfall_engine::{EngineConfig, Randomizer};
///
/// let config = EngineConfig::from_json(r#"{ "randomizer": "bag", "history_capacity": 3 }"#).unwrap();
/// assert_eq!(config.randomizer, Randomizer::Bag);
/// assert_eq!(config.history_capacity, 3);
/// assert_eq!(config.initial_interval_ms, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum number of undo snapshots kept. `0` disables undo.
    pub history_capacity: usize,
    /// Fall interval at level 1, in milliseconds.
    pub initial_interval_ms: u64,
    /// Interval reduction per level, in milliseconds. Must be positive so
    /// every level-up above the floor speeds the game up.
    pub interval_step_ms: u64,
    /// Lower bound of the fall interval, in milliseconds.
    pub min_interval_ms: u64,
    pub randomizer: Randomizer,
    /// Fixed seed for reproducible piece sequences; random when absent.
    pub seed: Option<PieceSeed>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            initial_interval_ms: 1000,
            interval_step_ms: 100,
            min_interval_ms: 100,
            randomizer: Randomizer::Uniform,
            seed: None,
        }
    }
}

/// Error returned when an [`EngineConfig`] cannot be used.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigError {
    #[display("failed to parse engine config")]
    Parse(#[error(source)] serde_json::Error),
    #[display("min_interval_ms must be positive")]
    #[from(ignore)]
    ZeroMinInterval,
    #[display("interval_step_ms must be positive")]
    #[from(ignore)]
    ZeroIntervalStep,
    #[display("min_interval_ms ({min}) exceeds initial_interval_ms ({initial})")]
    #[from(ignore)]
    MinAboveInitial { min: u64, initial: u64 },
}

impl EngineConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the interval settings describe a speed curve that
    /// shrinks with every level down to a positive floor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_interval_ms == 0 {
            return Err(ConfigError::ZeroMinInterval);
        }
        if self.interval_step_ms == 0 {
            return Err(ConfigError::ZeroIntervalStep);
        }
        if self.min_interval_ms > self.initial_interval_ms {
            return Err(ConfigError::MinAboveInitial {
                min: self.min_interval_ms,
                initial: self.initial_interval_ms,
            });
        }
        Ok(())
    }
}
