//! Checkpoint queries over the active table.
//!
//! [`Checkpoints`] answers the questions chain validation, reorg handling,
//! and progress reporting ask of the checkpoint table:
//!
//! - [`check_block`](Checkpoints::check_block) when connecting a block whose
//!   height is known,
//! - [`last_checkpoint`](Checkpoints::last_checkpoint) and
//!   [`is_below_checkpoint`](Checkpoints::is_below_checkpoint) before
//!   accepting a reorg,
//! - [`total_blocks_estimate`](Checkpoints::total_blocks_estimate) and
//!   [`guess_verification_progress`](Checkpoints::guess_verification_progress)
//!   for sync progress shown to the user.
//!
//! When checkpoints are disabled every query returns its permissive default.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use solar_core::constants::{NetworkType, SECONDS_PER_DAY};
use solar_core::error::CheckpointError;
use solar_core::traits::{BlockIndex, BlockIndexEntry};
use solar_core::types::Hash256;

use crate::checkpoint::CheckpointData;

/// Selects the active table and whether it is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Network whose table is active.
    pub network: NetworkType,
    /// Enforce checkpoints. Defaults to `true`.
    pub enabled: bool,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            network: NetworkType::Mainnet,
            enabled: true,
        }
    }
}

/// Stateless query service over one checkpoint table.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoints<'a> {
    data: &'a CheckpointData,
    network: Option<NetworkType>,
    enabled: bool,
}

impl Checkpoints<'static> {
    /// Service over the compiled-in table for `config.network`.
    pub fn new(config: CheckpointConfig) -> Self {
        debug!(
            network = %config.network,
            enabled = config.enabled,
            "checkpoint: selected table"
        );
        Self {
            data: CheckpointData::for_network(config.network),
            network: Some(config.network),
            enabled: config.enabled,
        }
    }
}

impl<'a> Checkpoints<'a> {
    /// Service over an explicit table.
    ///
    /// Production code uses [`Checkpoints::new`]; tests supply their own table.
    pub fn with_data(data: &'a CheckpointData, enabled: bool) -> Self {
        Self {
            data,
            network: None,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Network whose compiled-in table is active, or `None` for a table
    /// supplied through [`with_data`](Self::with_data).
    pub fn network(&self) -> Option<NetworkType> {
        self.network
    }

    pub fn data(&self) -> &'a CheckpointData {
        self.data
    }

    /// Check a block hash against the checkpoint at `height`, if any.
    ///
    /// Returns `true` when checkpoints are disabled, when `height` is not
    /// checkpointed, or when `hash` matches. A `false` result means the block
    /// contradicts trusted history and the caller must reject it.
    pub fn check_block(&self, height: u64, hash: &Hash256) -> bool {
        if !self.enabled {
            return true;
        }
        match self.data.get(height) {
            None => true,
            Some(expected) if expected == hash => true,
            Some(expected) => {
                warn!(height, %expected, got = %hash, "checkpoint: block hash mismatch");
                false
            }
        }
    }

    /// Like [`check_block`](Self::check_block) but returns an error suitable
    /// for `?` propagation.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::Mismatch`] when the hash does not match the
    /// checkpoint at `height`.
    pub fn verify_block(&self, height: u64, hash: &Hash256) -> Result<(), CheckpointError> {
        if self.check_block(height, hash) {
            return Ok(());
        }
        let expected = self.data.get(height).copied().unwrap_or_default();
        Err(CheckpointError::Mismatch {
            height,
            expected,
            got: *hash,
        })
    }

    /// Expected hash at `height` when checkpoints are enforced.
    pub fn checkpoint_at(&self, height: u64) -> Option<Hash256> {
        if !self.enabled {
            return None;
        }
        self.data.get(height).copied()
    }

    /// Lower bound on the chain height, for progress display.
    ///
    /// Zero when checkpoints are disabled or the table is empty.
    pub fn total_blocks_estimate(&self) -> u64 {
        if !self.enabled {
            return 0;
        }
        self.data.last_height().unwrap_or(0)
    }

    /// Height of the last checkpoint, or `None` if disabled or empty.
    pub fn last_checkpoint_height(&self) -> Option<u64> {
        if !self.enabled {
            return None;
        }
        self.data.last_height()
    }

    /// Returns `true` if `height` is at or below the last checkpoint.
    ///
    /// The node should reject any reorg that would disconnect blocks at or
    /// below this height. A table holding only the genesis block pins nothing
    /// beyond genesis itself, so it never reports a block as protected.
    pub fn is_below_checkpoint(&self, height: u64) -> bool {
        match self.last_checkpoint_height() {
            Some(last) => last > 0 && height <= last,
            None => false,
        }
    }

    /// Highest checkpoint whose block is present in `index`.
    ///
    /// Walks the table from the highest height down and returns the entry for
    /// the first hash the index knows. A failed lookup counts as "not found"
    /// for that checkpoint and the walk continues.
    pub fn last_checkpoint<I>(&self, index: &I) -> Option<I::Entry>
    where
        I: BlockIndex + ?Sized,
    {
        if !self.enabled {
            return None;
        }
        for (height, hash) in self.data.iter().rev() {
            match index.lookup(hash) {
                Ok(Some(entry)) => {
                    debug!(height, %hash, "checkpoint: last checkpoint found in block index");
                    return Some(entry);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(height, %hash, "checkpoint: block index lookup failed: {e}");
                }
            }
        }
        None
    }

    /// Approximate fraction of verification work done at `block`.
    ///
    /// Returns 0.0 when there is no block. See
    /// [`verification_progress`](Self::verification_progress).
    pub fn guess_verification_progress<E>(&self, block: Option<&E>, now: u64) -> f64
    where
        E: BlockIndexEntry + ?Sized,
    {
        match block {
            Some(block) => self.verification_progress(block.chain_tx(), block.timestamp(), now),
            None => 0.0,
        }
    }

    /// Approximate fraction of verification work done after `chain_tx`
    /// transactions, for a block stamped `block_time`, as seen at `now`.
    ///
    /// Work is counted in cost units: one per transaction up to the last
    /// checkpoint and `sigcheck_factor` per transaction after it. Work still
    /// to come is extrapolated from the elapsed time at the calibrated daily
    /// transaction rate, measured from the last checkpoint when the block is
    /// at or before it, and from the block itself otherwise.
    ///
    /// The result is a UI heuristic in `[0, 1]`, never a consensus input.
    pub fn verification_progress(&self, chain_tx: u64, block_time: u64, now: u64) -> f64 {
        let data = self.data;
        let factor = data.sigcheck_factor();
        let at_checkpoint = data.transactions_at_last_checkpoint();

        let (work_before, work_after) = if chain_tx <= at_checkpoint {
            let cheap_after = (at_checkpoint - chain_tx) as f64;
            let expensive_after = self.expected_transactions(data.last_checkpoint_timestamp(), now);
            (chain_tx as f64, cheap_after + expensive_after * factor)
        } else {
            let cheap_before = at_checkpoint as f64;
            let expensive_before = (chain_tx - at_checkpoint) as f64;
            let expensive_after = self.expected_transactions(block_time, now);
            (cheap_before + expensive_before * factor, expensive_after * factor)
        };

        let total = work_before + work_after;
        if !(total.is_finite() && total > 0.0) {
            return 0.0;
        }
        (work_before / total).clamp(0.0, 1.0)
    }

    /// Transactions expected between `since` and `now` at the calibrated rate.
    /// A `since` in the future counts as no elapsed time.
    fn expected_transactions(&self, since: u64, now: u64) -> f64 {
        let elapsed = now.saturating_sub(since) as f64;
        elapsed / SECONDS_PER_DAY as f64 * self.data.transactions_per_day()
    }
}
