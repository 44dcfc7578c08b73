//! Pool configuration via `batch.toml`
//!
//! Budgets for the built-in mutation pool can be tuned per deployment
//! without recompiling. On first start the job writes a commented default
//! file; edit it and restart the job to apply new budgets.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_batch_core::{
    Error, PoolLimits, Result, DEFAULT_MAX_ENTITY_COUNT, DEFAULT_MAX_POOL_SIZE,
};

/// Config file name placed in the job's working directory.
pub const CONFIG_FILE_NAME: &str = "batch.toml";

/// Mutation pool budgets loaded from `batch.toml`.
///
/// # Example
///
/// ```toml
/// # Maximum estimated bytes buffered per batch (default 1 MiB)
/// max_pool_size = 1048576
///
/// # Maximum entities or keys buffered per batch (default 200)
/// max_entity_count = 200
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum estimated bytes per put or delete batch.
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: usize,
    /// Maximum items per put or delete batch.
    #[serde(default = "default_max_entity_count")]
    pub max_entity_count: usize,
}

fn default_max_pool_size() -> usize {
    DEFAULT_MAX_POOL_SIZE
}

fn default_max_entity_count() -> usize {
    DEFAULT_MAX_ENTITY_COUNT
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_pool_size: default_max_pool_size(),
            max_entity_count: default_max_entity_count(),
        }
    }
}

impl PoolConfig {
    /// Budgets described by this config.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if either budget is zero.
    pub fn limits(&self) -> Result<PoolLimits> {
        let limits = PoolLimits::from(self);
        limits.validate()?;
        Ok(limits)
    }

    /// Check the budgets are usable.
    pub fn validate(&self) -> Result<()> {
        self.limits().map(|_| ())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Strata batch configuration
#
# Mutation pool budgets. A pool flushes its buffered puts (or deletes)
# before adding an item that would exceed either limit.

# Maximum estimated bytes buffered per batch (default: 1 MiB)
max_pool_size = 1048576

# Maximum entities or keys buffered per batch (default: 200)
max_entity_count = 200
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the file cannot be read, parsed, or holds
    /// a zero budget.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: PoolConfig = toml::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::configuration(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::configuration(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::configuration(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

impl From<&PoolConfig> for PoolLimits {
    fn from(config: &PoolConfig) -> Self {
        PoolLimits::new(config.max_pool_size, config.max_entity_count)
    }
}

impl From<PoolLimits> for PoolConfig {
    fn from(limits: PoolLimits) -> Self {
        Self {
            max_pool_size: limits.max_pool_size,
            max_entity_count: limits.max_entity_count,
        }
    }
}
