//! Protocol constants and network selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Network type: Mainnet, Testnet, or Regtest.
///
/// Selects the active checkpoint table. Testnet and regtest share the test
/// network table, which carries no enforced checkpoints.
///
/// # Examples
///
/// ```
/// use solar_core::constants::NetworkType;
/// let net = NetworkType::default();
/// assert_eq!(net, NetworkType::Mainnet);
/// assert!(!net.is_test_network());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Production network.
    #[default]
    Mainnet,
    /// Public test network.
    Testnet,
    /// Local regression-test network.
    Regtest,
}

impl NetworkType {
    /// Whether this is one of the low-stakes test networks.
    ///
    /// # Examples
    ///
    /// ```
    /// use solar_core::constants::NetworkType;
    /// assert!(NetworkType::Testnet.is_test_network());
    /// assert!(NetworkType::Regtest.is_test_network());
    /// ```
    pub fn is_test_network(&self) -> bool {
        !matches!(self, Self::Mainnet)
    }

    /// Lowercase network name, also used as the data directory suffix.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Regtest => "regtest",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            "regtest" => Ok(Self::Regtest),
            _ => Err(ConfigError::InvalidNetwork(s.to_string())),
        }
    }
}

pub const MAINNET_GENESIS_HASH: &str =
    "edcf32dbfd327fe7f546d3a175d91b05e955ec1224e087961acc9a2aa8f592ee";

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Relative cost of verifying a transaction after the last checkpoint versus
/// one before it. Transactions below the last checkpoint skip signature checks.
pub const SIGCHECK_VERIFICATION_FACTOR: f64 = 5.0;
