//! Node configuration for the SolarCoin checkpoint tooling.
//!
//! Provides [`NodeConfig`] with defaults for network, checkpoint enforcement,
//! data directory, and logging. Values are layered: built-in defaults, then
//! an optional TOML file, then `SOLAR_*` environment variables. Command-line
//! flags are applied on top by the binaries.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use solar_consensus::CheckpointConfig;
use solar_core::constants::NetworkType;
use solar_core::error::ConfigError;

/// Environment variable prefix, e.g. `SOLAR_NETWORK=testnet`.
pub const ENV_PREFIX: &str = "SOLAR";

/// Config file name looked up inside the data directory.
pub const CONFIG_FILE_NAME: &str = "solar.toml";

/// Configuration for a node instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Network to run on. Selects the active checkpoint table.
    pub network: NetworkType,
    /// Enforce checkpoints (`-checkpoints`). Defaults to `true`.
    pub checkpoints: bool,
    /// Root directory for all persistent data.
    pub data_dir: PathBuf,
    /// Log level filter string (e.g. "info", "debug", "solar_consensus=trace").
    pub log_level: String,
    /// Log output format ("text" or "json").
    pub log_format: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("solar");

        Self {
            network: NetworkType::Mainnet,
            checkpoints: true,
            data_dir,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl NodeConfig {
    /// Load from `path` (or `<default data dir>/solar.toml` if `None`) and the
    /// process environment. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    /// Like [`load`](Self::load) with an explicit environment source.
    pub fn load_with_env(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default().data_dir.join(CONFIG_FILE_NAME),
        };

        debug!(file = %file.display(), "config: loading");
        let settings = config::Config::builder()
            .add_source(config::File::from(file).required(path.is_some()))
            .add_source(env)
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Checkpoint service settings derived from this config.
    pub fn checkpoint_config(&self) -> CheckpointConfig {
        CheckpointConfig {
            network: self.network,
            enabled: self.checkpoints,
        }
    }
}
