//! Runtime configuration, read from TOML.
//!
//! ```toml
//! storage_path = "questions.json"
//!
//! [simulation]
//! min_delay_ms = 1000
//! max_delay_ms = 3000
//! failure_rate = 0.1
//! ```

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid simulation settings: {0}")]
    Simulation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// JSON file holding the persisted question list.
    pub storage_path: PathBuf,

    /// Latency and failure injected around storage and submission.
    pub simulation: SimulationConfig,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("questions.json"),
            simulation: SimulationConfig::default(),
        }
    }
}

impl FormConfig {
    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse config from a TOML string. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.simulation.check()?;
        Ok(config)
    }
}

/// Simulated latency and failure rate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Probability in `0.0..=1.0` that a call fails.
    pub failure_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            failure_rate: 0.1,
        }
    }
}

impl SimulationConfig {
    /// No delay, no failures.
    pub fn instant() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
            failure_rate: 0.0,
        }
    }

    /// No delay, every call fails.
    pub fn always_failing() -> Self {
        Self {
            failure_rate: 1.0,
            ..Self::instant()
        }
    }

    pub fn delay_range(&self) -> RangeInclusive<Duration> {
        Duration::from_millis(self.min_delay_ms)..=Duration::from_millis(self.max_delay_ms)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(ConfigError::Simulation(format!(
                "min_delay_ms ({}) exceeds max_delay_ms ({})",
                self.min_delay_ms, self.max_delay_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(ConfigError::Simulation(format!(
                "failure_rate {} is outside 0.0..=1.0",
                self.failure_rate
            )));
        }
        Ok(())
    }
}
