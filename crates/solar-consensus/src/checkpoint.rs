//! Hard-coded checkpoint tables.
//!
//! A checkpoint pins the block hash expected at a given height. Each network
//! has one table, compiled into the binary and built once on first use. The
//! tables also carry the calibration constants used by the verification
//! progress estimate in [`crate::service`].
//!
//! # Attack vectors
//!
//! - **Long-range rewrite:** Without checkpoints an attacker with sufficient
//!   hash power could rewrite arbitrarily deep history. Checkpoints pin known-
//!   good blocks so that chains diverging at a checkpointed height are
//!   rejected outright.
//!
//! - **Checkpoint spoofing:** The checkpoint list is compiled into the binary.
//!   An attacker would need to distribute a modified binary to exploit this,
//!   which is outside our threat model.
//!
//! # What makes a good checkpoint block?
//!
//! - It is surrounded by blocks with reasonable timestamps (no earlier block
//!   with a later timestamp, no later block with an earlier one).
//! - It contains no unusual transactions.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use solar_core::constants::{
    NetworkType, MAINNET_GENESIS_HASH, SIGCHECK_VERIFICATION_FACTOR,
};
use solar_core::error::CheckpointError;
use solar_core::types::Hash256;

/// Mainnet checkpoints: (height, block hash) pairs.
const MAINNET_CHECKPOINTS: &[(u64, &str)] = &[
    (0, MAINNET_GENESIS_HASH),
    (1, "e8666c8715fafbfb095132deb1dd2af63fe14d3d7163715341d48feffab458cc"),
    (25, "e49cfc3e60515965380cbc3a1add5ab007e5bd2f226624cad9ff0f79eef680cc"),
    (50, "0b082428186ab2dc55403b2b3c9bd14f087590b204e05c09a656914285520b4d"),
    (98, "d27e483ae4d334cc65575bcc66d65f7a97913f31188662e2d3fe329675714128"),
    (128, "bce9c463a9e8b0d7b1c6df522fc80468fb47873c00b7b650f6b8046546c95dd0"),
];

const MAINNET_CALIBRATION: Calibration = Calibration {
    last_checkpoint_timestamp: 1_392_922_800,
    transactions_at_last_checkpoint: 746_473,
    transactions_per_day: 2160.0,
};

/// The test network enforces no checkpoints.
const TESTNET_CHECKPOINTS: &[(u64, &str)] = &[];

const TESTNET_CALIBRATION: Calibration = Calibration {
    last_checkpoint_timestamp: 1_392_508_800,
    transactions_at_last_checkpoint: 0,
    transactions_per_day: 300.0,
};

static MAINNET: LazyLock<CheckpointData> =
    LazyLock::new(|| build_table(NetworkType::Mainnet, MAINNET_CHECKPOINTS, MAINNET_CALIBRATION));

static TESTNET: LazyLock<CheckpointData> =
    LazyLock::new(|| build_table(NetworkType::Testnet, TESTNET_CHECKPOINTS, TESTNET_CALIBRATION));

/// A malformed compiled-in table is a release defect. Fail at startup rather
/// than let it surface through query results.
fn build_table(
    network: NetworkType,
    entries: &[(u64, &str)],
    calibration: Calibration,
) -> CheckpointData {
    let data = CheckpointData::from_hex_entries(entries, calibration)
        .and_then(|data| data.validate_for(network).map(|()| data));
    match data {
        Ok(data) => data,
        Err(e) => panic!("hard-coded {network} checkpoint table is malformed: {e}"),
    }
}

/// Calibration constants for the verification progress estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Unix timestamp of the block at the last checkpoint.
    pub last_checkpoint_timestamp: u64,
    /// Total transactions from genesis through the last checkpoint, inclusive.
    pub transactions_at_last_checkpoint: u64,
    /// Estimated transactions per day after the last checkpoint.
    pub transactions_per_day: f64,
}

/// An immutable checkpoint table plus its calibration constants.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointData {
    checkpoints: BTreeMap<u64, Hash256>,
    calibration: Calibration,
    sigcheck_factor: f64,
}

impl CheckpointData {
    /// Build a table from `(height, hash)` pairs given in increasing height
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::NonIncreasingHeight`] when a height is not
    /// strictly greater than the one before it (this includes duplicates).
    pub fn from_entries(
        entries: impl IntoIterator<Item = (u64, Hash256)>,
        calibration: Calibration,
    ) -> Result<Self, CheckpointError> {
        let mut checkpoints = BTreeMap::new();
        let mut previous: Option<u64> = None;
        for (height, hash) in entries {
            if let Some(previous) = previous {
                if height <= previous {
                    return Err(CheckpointError::NonIncreasingHeight { previous, height });
                }
            }
            checkpoints.insert(height, hash);
            previous = Some(height);
        }
        Ok(Self {
            checkpoints,
            calibration,
            sigcheck_factor: SIGCHECK_VERIFICATION_FACTOR,
        })
    }

    /// Like [`from_entries`](Self::from_entries) but with hex-encoded hashes.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::InvalidHash`] for a hash that does not parse,
    /// in addition to the errors of [`from_entries`](Self::from_entries).
    pub fn from_hex_entries(
        entries: &[(u64, &str)],
        calibration: Calibration,
    ) -> Result<Self, CheckpointError> {
        let parsed = entries
            .iter()
            .map(|&(height, hex)| {
                Hash256::from_hex(hex)
                    .map(|hash| (height, hash))
                    .map_err(|source| CheckpointError::InvalidHash { height, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_entries(parsed, calibration)
    }

    /// Check the invariants a table must satisfy for `network`.
    ///
    /// Production tables must be non-empty and start with the mainnet
    /// genesis block. Test-network tables are not checked.
    pub fn validate_for(&self, network: NetworkType) -> Result<(), CheckpointError> {
        if network.is_test_network() {
            return Ok(());
        }
        if self.checkpoints.is_empty() {
            return Err(CheckpointError::Empty);
        }
        let expected = Hash256::from_hex(MAINNET_GENESIS_HASH)
            .map_err(|source| CheckpointError::InvalidHash { height: 0, source })?;
        match self.checkpoints.get(&0) {
            None => Err(CheckpointError::MissingGenesis),
            Some(&got) if got != expected => Err(CheckpointError::GenesisMismatch { expected, got }),
            Some(_) => Ok(()),
        }
    }

    /// The compiled-in mainnet table.
    pub fn mainnet() -> &'static CheckpointData {
        &MAINNET
    }

    /// The compiled-in test-network table.
    pub fn testnet() -> &'static CheckpointData {
        &TESTNET
    }

    /// Select the compiled-in table for `network`.
    pub fn for_network(network: NetworkType) -> &'static CheckpointData {
        if network.is_test_network() {
            Self::testnet()
        } else {
            Self::mainnet()
        }
    }

    /// Expected hash at `height`, if that height is checkpointed.
    pub fn get(&self, height: u64) -> Option<&Hash256> {
        self.checkpoints.get(&height)
    }

    /// Checkpoints in increasing height order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u64, &Hash256)> + '_ {
        self.checkpoints.iter().map(|(h, hash)| (*h, hash))
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Highest checkpointed height, or `None` for an empty table.
    pub fn last_height(&self) -> Option<u64> {
        self.checkpoints.last_key_value().map(|(h, _)| *h)
    }

    pub fn last_checkpoint_timestamp(&self) -> u64 {
        self.calibration.last_checkpoint_timestamp
    }

    pub fn transactions_at_last_checkpoint(&self) -> u64 {
        self.calibration.transactions_at_last_checkpoint
    }

    pub fn transactions_per_day(&self) -> f64 {
        self.calibration.transactions_per_day
    }

    pub fn sigcheck_factor(&self) -> f64 {
        self.sigcheck_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAL: Calibration = Calibration {
        last_checkpoint_timestamp: 1_000,
        transactions_at_last_checkpoint: 100,
        transactions_per_day: 10.0,
    };

    fn genesis() -> Hash256 {
        Hash256::from_hex(MAINNET_GENESIS_HASH).unwrap()
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    #[test]
    fn builds_from_increasing_entries() {
        let data = CheckpointData::from_entries(
            [(0, Hash256([0; 32])), (10, Hash256([0xAA; 32])), (50, Hash256([0xBB; 32]))],
            CAL,
        )
        .unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.last_height(), Some(50));
        assert_eq!(data.get(10), Some(&Hash256([0xAA; 32])));
        assert_eq!(data.get(11), None);
        assert_eq!(data.sigcheck_factor(), SIGCHECK_VERIFICATION_FACTOR);
    }

    #[test]
    fn rejects_duplicate_height() {
        let err = CheckpointData::from_entries(
            [(10, Hash256([0xAA; 32])), (10, Hash256([0xBB; 32]))],
            CAL,
        )
        .unwrap_err();
        assert_eq!(err, CheckpointError::NonIncreasingHeight { previous: 10, height: 10 });
    }

    #[test]
    fn rejects_decreasing_height() {
        let err = CheckpointData::from_entries(
            [(50, Hash256([0xAA; 32])), (10, Hash256([0xBB; 32]))],
            CAL,
        )
        .unwrap_err();
        assert_eq!(err, CheckpointError::NonIncreasingHeight { previous: 50, height: 10 });
    }

    #[test]
    fn rejects_bad_hex() {
        let err = CheckpointData::from_hex_entries(&[(7, "not-a-hash")], CAL).unwrap_err();
        assert!(matches!(err, CheckpointError::InvalidHash { height: 7, .. }));
    }

    #[test]
    fn empty_table_has_no_last_height() {
        let data = CheckpointData::from_entries([], CAL).unwrap();
        assert!(data.is_empty());
        assert_eq!(data.last_height(), None);
    }

    // ------------------------------------------------------------------
    // Network invariants
    // ------------------------------------------------------------------

    #[test]
    fn production_table_requires_genesis() {
        let empty = CheckpointData::from_entries([], CAL).unwrap();
        assert_eq!(empty.validate_for(NetworkType::Mainnet), Err(CheckpointError::Empty));

        let no_genesis = CheckpointData::from_entries([(5, Hash256([1; 32]))], CAL).unwrap();
        assert_eq!(
            no_genesis.validate_for(NetworkType::Mainnet),
            Err(CheckpointError::MissingGenesis)
        );

        let wrong = CheckpointData::from_entries([(0, Hash256([1; 32]))], CAL).unwrap();
        assert_eq!(
            wrong.validate_for(NetworkType::Mainnet),
            Err(CheckpointError::GenesisMismatch { expected: genesis(), got: Hash256([1; 32]) })
        );

        let good = CheckpointData::from_entries([(0, genesis())], CAL).unwrap();
        assert!(good.validate_for(NetworkType::Mainnet).is_ok());
    }

    #[test]
    fn test_network_tables_may_be_empty() {
        let empty = CheckpointData::from_entries([], CAL).unwrap();
        assert!(empty.validate_for(NetworkType::Testnet).is_ok());
        assert!(empty.validate_for(NetworkType::Regtest).is_ok());
    }

    #[test]
    fn test_network_genesis_is_not_pinned() {
        let other = CheckpointData::from_entries([(0, Hash256([7; 32]))], CAL).unwrap();
        assert!(other.validate_for(NetworkType::Testnet).is_ok());
        assert!(matches!(
            other.validate_for(NetworkType::Mainnet),
            Err(CheckpointError::GenesisMismatch { .. })
        ));
    }

    // ------------------------------------------------------------------
    // Compiled-in tables
    // ------------------------------------------------------------------

    #[test]
    fn mainnet_table_is_well_formed() {
        let data = CheckpointData::mainnet();
        assert_eq!(data.len(), MAINNET_CHECKPOINTS.len());
        assert_eq!(data.get(0), Some(&genesis()));
        assert_eq!(data.last_height(), Some(128));
        assert_eq!(data.transactions_at_last_checkpoint(), 746_473);
        assert_eq!(data.transactions_per_day(), 2160.0);
        assert_eq!(data.sigcheck_factor(), 5.0);
    }

    #[test]
    fn mainnet_heights_strictly_increase() {
        let heights: Vec<u64> = CheckpointData::mainnet().iter().map(|(h, _)| h).collect();
        assert!(heights.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn testnet_table_is_empty() {
        assert!(CheckpointData::testnet().is_empty());
    }

    #[test]
    fn for_network_selects_table() {
        assert!(std::ptr::eq(
            CheckpointData::for_network(NetworkType::Mainnet),
            CheckpointData::mainnet()
        ));
        assert!(std::ptr::eq(
            CheckpointData::for_network(NetworkType::Testnet),
            CheckpointData::testnet()
        ));
        assert!(std::ptr::eq(
            CheckpointData::for_network(NetworkType::Regtest),
            CheckpointData::testnet()
        ));
    }

    #[test]
    fn iter_reverses_from_highest() {
        let top = CheckpointData::mainnet().iter().next_back().map(|(h, _)| h);
        assert_eq!(top, Some(128));
    }
}
