//! Runtime configuration for relmap mapping models.
//!
//! Configuration is read once while the mapping model is built and is treated
//! as immutable afterwards. Every field has a default, so an empty document is
//! a valid configuration.

use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for '{field}': {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

///
/// RelmapConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RelmapConfig {
    pub collections: CollectionConfig,
    pub metrics: MetricsConfig,
}

impl RelmapConfig {
    /// Parse a configuration document from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.collections.default_list_index_base < 0 {
            return Err(ConfigError::Invalid {
                field: "collections.default_list_index_base",
                message: format!(
                    "list index base must be non-negative, found {}",
                    self.collections.default_list_index_base
                ),
            });
        }

        Ok(())
    }
}

///
/// CollectionConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionConfig {
    /// What happens to operations queued against an uninitialized collection.
    pub queued_ops: QueuedOpsPolicy,

    /// Stored value of the first list position when the mapping does not
    /// declare one.
    pub default_list_index_base: i64,

    /// Largest list position a result row may fill. Rows past it are
    /// rejected instead of padding the list up to that position.
    pub max_list_position: u32,
}

/// Default upper bound on list positions filled from result rows.
pub const DEFAULT_MAX_LIST_POSITION: u32 = 1 << 20;

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            queued_ops: QueuedOpsPolicy::Replay,
            default_list_index_base: 0,
            max_list_position: DEFAULT_MAX_LIST_POSITION,
        }
    }
}

///
/// QueuedOpsPolicy
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueuedOpsPolicy {
    /// Apply the pending log, in order, once the collection is initialized.
    #[default]
    Replay,

    /// Leave the pending log untouched; replay is a no-op.
    Ignore,
}

///
/// MetricsConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

///
/// TESTS
///
