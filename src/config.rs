//! Configuration System
//!
//! Layered configuration for tree parameters and logging. Sources, lowest to highest
//! precedence: built-in defaults, the global config file, `blocktree.toml` in the
//! working directory, then `BLOCKTREE_*` environment variables.

use crate::error::{ApiError, TreeError};
use crate::logging::LoggingConfig;
use crate::tree::{HashAlgorithm, RemainderPolicy, DEFAULT_BLOCK_SIZE};
use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge_policy;
mod sources;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlocktreeConfig {
    /// Tree construction parameters
    #[serde(default)]
    pub tree: TreeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tree construction parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Block size in bytes. Signed so that a negative value is reported as invalid
    /// rather than failing to parse.
    #[serde(default = "default_block_size")]
    pub block_size: i64,

    #[serde(default)]
    pub algorithm: HashAlgorithm,

    /// Hex-encoded key for keyed hashing (blake3 only, 32 bytes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default)]
    pub remainder: RemainderPolicy,
}

fn default_block_size() -> i64 {
    DEFAULT_BLOCK_SIZE as i64
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            block_size: default_block_size(),
            algorithm: HashAlgorithm::default(),
            key: None,
            remainder: RemainderPolicy::default(),
        }
    }
}

impl TreeConfig {
    /// Block size as a positive byte count
    pub fn resolved_block_size(&self) -> Result<usize, TreeError> {
        if self.block_size <= 0 {
            return Err(TreeError::InvalidConfiguration(format!(
                "block size must be positive, got {}",
                self.block_size
            )));
        }
        usize::try_from(self.block_size).map_err(|_| {
            TreeError::InvalidConfiguration(format!(
                "block size {} does not fit in memory on this platform",
                self.block_size
            ))
        })
    }

    /// Decoded hashing key, if one is configured
    pub fn key_bytes(&self) -> Result<Option<Vec<u8>>, TreeError> {
        self.key
            .as_deref()
            .map(|key| {
                hex::decode(key.trim()).map_err(|e| {
                    TreeError::InvalidConfiguration(format!("hashing key is not valid hex: {}", e))
                })
            })
            .transpose()
    }

    /// Validate that these parameters can build a tree
    pub fn validate(&self) -> Result<(), TreeError> {
        self.resolved_block_size()?;
        let key = self.key_bytes()?;
        self.algorithm.hasher(key.as_deref())?;
        Ok(())
    }
}

/// Loads [`BlocktreeConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Environment variable prefix; nested keys use `__`, e.g. `BLOCKTREE_TREE__BLOCK_SIZE`
    pub const ENV_PREFIX: &'static str = "BLOCKTREE";

    /// Load configuration using `dir` to locate `blocktree.toml`
    pub fn load(dir: &Path) -> Result<BlocktreeConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::local_file::add_to_builder(builder, dir)?;
        let config = builder.add_source(Self::environment()).build()?;
        Self::finish(config.try_deserialize()?)
    }

    /// Load configuration from one explicit file (plus defaults and environment)
    pub fn load_from_file(path: &Path) -> Result<BlocktreeConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true))
            .add_source(Self::environment())
            .build()?;
        Self::finish(config.try_deserialize()?)
    }

    /// Path of the global config file, if a home directory can be determined
    pub fn global_config_path() -> Option<PathBuf> {
        sources::global_file::global_config_path()
    }

    fn environment() -> Environment {
        Environment::with_prefix(Self::ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    fn finish(config: BlocktreeConfig) -> Result<BlocktreeConfig, ApiError> {
        config
            .tree
            .validate()
            .map_err(|e| ApiError::ConfigError(format!("Invalid [tree] section: {}", e)))?;
        Ok(config)
    }
}
