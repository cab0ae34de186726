//! Configuration loading and typed config structures for Stargazer.
//!
//! The configuration lives in `stargazer-config.yaml`. Every section and
//! field is optional; defaults reproduce the shipped game balance (10
//! energy, one unit every 5 minutes, 100 XP per level, 2 second
//! exploration).

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use crate::sampling::RarityWeights;

/// Environment variable that overrides `storage.data_dir`.
pub const DATA_DIR_ENV: &str = "STARGAZER_DATA_DIR";

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

    /// A value parsed but is unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Which value is wrong and why.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Energy cap and regeneration.
    #[serde(default)]
    pub energy: EnergyConfig,

    /// Leveling curve.
    #[serde(default)]
    pub progression: ProgressionConfig,

    /// Exploration timing and rarity weights.
    #[serde(default)]
    pub exploration: ExplorationConfig,

    /// Where the save slot lives.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `STARGAZER_DATA_DIR` overrides `storage.data_dir`. The result is
    /// validated before it is returned.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.storage.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| {
            Err(ConfigError::Invalid {
                reason: reason.to_owned(),
            })
        };

        if self.energy.max_energy == 0 {
            return invalid("energy.max_energy must be at least 1");
        }
        if self.energy.refill_interval_secs == 0 {
            return invalid("energy.refill_interval_secs must be at least 1");
        }
        if self.energy.poll_interval_secs == 0 {
            return invalid("energy.poll_interval_secs must be at least 1");
        }
        if self.progression.xp_per_level == 0 {
            return invalid("progression.xp_per_level must be at least 1");
        }
        if self.exploration.rarity_weights.total() == 0 {
            return invalid("exploration.rarity_weights must not all be zero");
        }
        if self.storage.slot.is_empty() {
            return invalid("storage.slot must not be empty");
        }
        if i64::try_from(self.energy.refill_interval_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .is_none()
        {
            return invalid("energy.refill_interval_secs is out of range");
        }
        Ok(())
    }
}

/// Energy cap and regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnergyConfig {
    /// Energy cap; new games start full.
    #[serde(default = "default_max_energy")]
    pub max_energy: u32,

    /// Seconds of wall-clock time per regeneration interval.
    #[serde(default = "default_refill_interval_secs")]
    pub refill_interval_secs: u64,

    /// Units granted per elapsed interval.
    #[serde(default = "default_refill_amount")]
    pub refill_amount: u32,

    /// How often a front end should poll `refill_energy`.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl EnergyConfig {
    /// The regeneration interval as a signed duration.
    pub fn refill_interval(&self) -> TimeDelta {
        i64::try_from(self.refill_interval_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    /// The poll cadence.
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            max_energy: default_max_energy(),
            refill_interval_secs: default_refill_interval_secs(),
            refill_amount: default_refill_amount(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

/// Leveling curve: the threshold for level `n` is `xp_per_level * n`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressionConfig {
    /// Experience per level step.
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_level: default_xp_per_level(),
        }
    }
}

/// Exploration timing and selection weights.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExplorationConfig {
    /// Simulated exploration time in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Per-tier selection weights.
    #[serde(default)]
    pub rarity_weights: RarityWeights,
}

impl ExplorationConfig {
    /// The simulated exploration time.
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            rarity_weights: RarityWeights::default(),
        }
    }
}

/// Save slot location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding slot files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Name of the save slot.
    #[serde(default = "default_slot")]
    pub slot: String,
}

impl StorageConfig {
    /// Apply `STARGAZER_DATA_DIR` if it is set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV)
            && !dir.is_empty()
        {
            self.data_dir = PathBuf::from(dir);
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            slot: default_slot(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit one JSON object per event instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_max_energy() -> u32 {
    10
}

const fn default_refill_interval_secs() -> u64 {
    5 * 60
}

const fn default_refill_amount() -> u32 {
    1
}

const fn default_poll_interval_secs() -> u64 {
    60
}

const fn default_xp_per_level() -> u32 {
    100
}

const fn default_delay_ms() -> u64 {
    2_000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".stargazer")
}

fn default_slot() -> String {
    "gameState".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
