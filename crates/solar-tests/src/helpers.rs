//! Shared test helpers for integration and property tests.

use solar_consensus::{Calibration, CheckpointData};
use solar_core::types::Hash256;
use solar_node_lib::{BlockIndexRecord, MemoryBlockIndex};

/// Simple block hash from a seed byte.
pub fn hash(seed: u8) -> Hash256 {
    Hash256([seed; 32])
}

/// Mainnet-like calibration anchored at `timestamp`.
pub fn calibration(timestamp: u64) -> Calibration {
    Calibration {
        last_checkpoint_timestamp: timestamp,
        transactions_at_last_checkpoint: 746_473,
        transactions_per_day: 2160.0,
    }
}

/// Table with checkpoints at the given heights, hashed by `hash(height as u8)`.
pub fn table(heights: &[u64], timestamp: u64) -> CheckpointData {
    CheckpointData::from_entries(
        heights.iter().map(|&h| (h, hash(h as u8))),
        calibration(timestamp),
    )
    .expect("test heights must be strictly increasing")
}

/// Block index record for a block at `height` with one transaction per block
/// and one-minute spacing.
pub fn record(hash: Hash256, height: u64) -> BlockIndexRecord {
    BlockIndexRecord {
        hash,
        height,
        chain_tx: height + 1,
        timestamp: 1_392_000_000 + height * 60,
    }
}

/// Block index holding every checkpoint of `data` up to and including
/// `max_height`.
pub fn index_through(data: &CheckpointData, max_height: u64) -> MemoryBlockIndex {
    MemoryBlockIndex::from_records(
        data.iter()
            .filter(|(h, _)| *h <= max_height)
            .map(|(h, hash)| record(*hash, h)),
    )
}
