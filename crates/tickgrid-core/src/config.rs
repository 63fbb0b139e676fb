//! Configuration loading and typed config structures for the tickgrid simulation.
//!
//! The canonical configuration lives in `tickgrid-config.yaml` at the project
//! root. Every section is optional and falls back to the defaults below, so
//! an empty file (or no file at all) yields a runnable empty world.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tickgrid_agents::ActionDurations;
use tickgrid_types::{ActionRequest, GridShape};

use crate::factory::{AgentSpec, DoorSpec, ObjectSpec, RoomSpec};

/// Environment variable that overrides `world.seed`.
pub const SEED_ENV: &str = "TICKGRID_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The seed override is not an unsigned integer.
    #[error("{SEED_ENV} must be an unsigned integer, got {value:?}")]
    InvalidSeed {
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `tickgrid-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, grid shape, pacing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Action tuning.
    #[serde(default)]
    pub actions: ActionConfig,

    /// Agents to place in the world.
    #[serde(default)]
    pub agents: Vec<AgentSpec>,

    /// Plain objects to place in the world.
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,

    /// Doors to place in the world.
    #[serde(default)]
    pub doors: Vec<DoorSpec>,

    /// Walled rooms, laid out after the plain objects and doors.
    #[serde(default)]
    pub rooms: Vec<RoomSpec>,

    /// Scripted requests per agent name, consumed one per idle tick.
    #[serde(default)]
    pub scripts: BTreeMap<String, Vec<ActionRequest>>,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `TICKGRID_SEED`, when set, overrides `world.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, and
    /// [`ConfigError::InvalidSeed`] for a malformed seed override.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_seed_override(std::env::var(SEED_ENV).ok().as_deref())?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Replace the seed with `value` when one is given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeed`] if `value` does not parse.
    pub fn apply_seed_override(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
        if let Some(raw) = value {
            self.world.seed = raw.trim().parse().map_err(|_| ConfigError::InvalidSeed {
                value: raw.to_owned(),
            })?;
        }
        Ok(())
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Master random seed.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Grid dimensions.
    #[serde(default = "default_shape")]
    pub shape: GridShape,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            shape: default_shape(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

fn default_world_name() -> String {
    String::from("tickgrid")
}

const fn default_seed() -> u64 {
    1
}

const fn default_shape() -> GridShape {
    GridShape {
        width: 20,
        height: 20,
    }
}

const fn default_tick_interval_ms() -> u64 {
    500
}

/// Simulation boundary parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Ticks to run before stopping. 0 runs until stopped.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
        }
    }
}

const fn default_max_ticks() -> u64 {
    1000
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Subscriber output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Where to write the per-tick action log as CSV, if anywhere.
    #[serde(default)]
    pub action_log_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            action_log_path: None,
        }
    }
}

fn default_log_level() -> String {
    String::from("info")
}

/// Action tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ActionConfig {
    /// Default busy window per action.
    #[serde(default)]
    pub durations: ActionDurations,
}
