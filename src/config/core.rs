//! Core configuration structure and builder for colmax runs.

use crate::config::{ConfigFormat, DEFAULT_CONFIG_FILE};
use crate::core::constants::*;
use crate::core::error::{ColmaxError, Result};
use crate::core::types::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Settings shared by every rank of a run.
///
/// Every rank must use the same configuration; nothing here is exchanged
/// over the process group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How partial column maxima are combined
    pub strategy: AllReduceStrategy,
    /// Fill value for unowned slots of a partial vector
    pub sentinel: SentinelPolicy,
    /// Logging verbosity
    pub verbosity: VerbosityLevel,
    /// Group size for the in-process launcher (0 means one rank per CPU)
    pub num_ranks: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            strategy: AllReduceStrategy::default(),
            sentinel: SentinelPolicy::default(),
            verbosity: VerbosityLevel::default(),
            num_ranks: DEFAULT_NUM_RANKS,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.num_ranks > MAX_NUM_RANKS {
            return Err(ColmaxError::invalid_parameter(
                "num_ranks",
                self.num_ranks.to_string(),
                format!("must be at most {}", MAX_NUM_RANKS),
            ));
        }
        Ok(())
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Config = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` when given, otherwise `dir/colmax.toml` when it
    /// exists, otherwise the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        let fallback = dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Self::load_from_file(fallback);
        }
        Ok(Config::default())
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from `COLMAX_*` environment variables on top of
    /// the defaults
    pub fn load_from_environment() -> Result<Self> {
        let mut config = Config::default();
        config.apply_environment_overrides()?;
        Ok(config)
    }

    /// Overwrite every field whose `COLMAX_*` variable is set
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        if let Some(num_ranks) = env_value(ENV_NUM_RANKS)? {
            self.num_ranks = num_ranks;
        }
        if let Some(strategy) = env_value(ENV_STRATEGY)? {
            self.strategy = strategy;
        }
        if let Some(sentinel) = env_value(ENV_SENTINEL)? {
            self.sentinel = sentinel;
        }
        if let Some(verbosity) = env_value(ENV_VERBOSITY)? {
            self.verbosity = verbosity;
        }

        self.validate()
    }

    /// Get the effective number of ranks (0 means use all available cores)
    pub fn effective_num_ranks(&self) -> usize {
        if self.num_ranks == 0 {
            num_cpus::get().clamp(1, MAX_NUM_RANKS)
        } else {
            self.num_ranks
        }
    }
}

fn env_value<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ColmaxError::config(format!("Invalid {}: {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}

/// Configuration builder for fluent configuration creation
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
    validation_errors: Vec<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the all-reduce strategy
    pub fn strategy(mut self, strategy: AllReduceStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Set the sentinel policy
    pub fn sentinel(mut self, sentinel: SentinelPolicy) -> Self {
        self.config.sentinel = sentinel;
        self
    }

    /// Set the logging verbosity
    pub fn verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    /// Set the number of local ranks
    pub fn num_ranks(mut self, num_ranks: usize) -> Self {
        if num_ranks > MAX_NUM_RANKS {
            self.validation_errors
                .push(format!("num_ranks must be at most {}", MAX_NUM_RANKS));
        }
        self.config.num_ranks = num_ranks;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        if !self.validation_errors.is_empty() {
            return Err(ColmaxError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
