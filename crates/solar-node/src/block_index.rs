//! In-memory block index.
//!
//! [`MemoryBlockIndex`] maps block hashes to [`BlockIndexRecord`]s and
//! implements [`BlockIndex`] for the checkpoint service. Lookups take a
//! short read lock; writers (block connection) take the write lock. The
//! production node keeps its index in the chain-state database.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use solar_core::error::BlockIndexError;
use solar_core::traits::{BlockIndex, BlockIndexEntry};
use solar_core::types::Hash256;

/// One block as seen by the block index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockIndexRecord {
    pub hash: Hash256,
    pub height: u64,
    /// Cumulative transactions from genesis through this block.
    pub chain_tx: u64,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
}

impl BlockIndexEntry for BlockIndexRecord {
    fn chain_tx(&self) -> u64 {
        self.chain_tx
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// Thread-safe, cloneable in-memory block index.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlockIndex {
    records: Arc<RwLock<HashMap<Hash256, BlockIndexRecord>>>,
}

impl MemoryBlockIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from records. Later records replace earlier ones with
    /// the same hash.
    pub fn from_records(records: impl IntoIterator<Item = BlockIndexRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.hash, r)).collect();
        Self {
            records: Arc::new(RwLock::new(map)),
        }
    }

    /// Parse a JSON array of [`BlockIndexRecord`]s.
    ///
    /// # Errors
    ///
    /// Returns [`BlockIndexError::Corrupt`] when the input is not a valid
    /// record array.
    pub fn from_json(json: &str) -> Result<Self, BlockIndexError> {
        let records: Vec<BlockIndexRecord> =
            serde_json::from_str(json).map_err(|e| BlockIndexError::Corrupt(e.to_string()))?;
        Ok(Self::from_records(records))
    }

    /// Insert or replace a record. Returns the record previously stored
    /// under the same hash.
    pub fn insert(&self, record: BlockIndexRecord) -> Option<BlockIndexRecord> {
        self.records.write().insert(record.hash, record)
    }

    pub fn remove(&self, hash: &Hash256) -> Option<BlockIndexRecord> {
        self.records.write().remove(hash)
    }

    pub fn get(&self, hash: &Hash256) -> Option<BlockIndexRecord> {
        self.records.read().get(hash).copied()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl BlockIndex for MemoryBlockIndex {
    type Entry = BlockIndexRecord;

    fn lookup(&self, hash: &Hash256) -> Result<Option<BlockIndexRecord>, BlockIndexError> {
        Ok(self.get(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seed: u8, height: u64) -> BlockIndexRecord {
        BlockIndexRecord {
            hash: Hash256([seed; 32]),
            height,
            chain_tx: height + 1,
            timestamp: 1_400_000_000 + height * 60,
        }
    }

    #[test]
    fn insert_get_remove() {
        let index = MemoryBlockIndex::new();
        assert!(index.is_empty());
        assert!(index.insert(record(1, 0)).is_none());
        assert!(index.insert(record(2, 1)).is_none());
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&Hash256([2; 32])), Some(record(2, 1)));

        assert_eq!(index.remove(&Hash256([1; 32])), Some(record(1, 0)));
        assert!(index.get(&Hash256([1; 32])).is_none());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn insert_replaces_same_hash() {
        let index = MemoryBlockIndex::new();
        index.insert(record(1, 0));
        let mut updated = record(1, 0);
        updated.chain_tx = 42;
        assert_eq!(index.insert(updated), Some(record(1, 0)));
        assert_eq!(index.get(&Hash256([1; 32])).map(|r| r.chain_tx), Some(42));
    }

    #[test]
    fn clones_share_storage() {
        let index = MemoryBlockIndex::new();
        let other = index.clone();
        other.insert(record(9, 5));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn lookup_through_trait() {
        let index = MemoryBlockIndex::from_records([record(1, 0), record(2, 1)]);
        let found = index.lookup(&Hash256([2; 32])).unwrap().unwrap();
        assert_eq!(found.chain_tx(), 2);
        assert!(!index.contains(&Hash256([3; 32])).unwrap());
    }

    #[test]
    fn from_json_parses_records() {
        let json = format!(
            r#"[{{"hash":"{}","height":3,"chain_tx":9,"timestamp":100}}]"#,
            "ab".repeat(32)
        );
        let index = MemoryBlockIndex::from_json(&json).unwrap();
        let r = index.get(&Hash256([0xAB; 32])).unwrap();
        assert_eq!((r.height, r.chain_tx, r.timestamp), (3, 9, 100));
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = MemoryBlockIndex::from_json("{not json").unwrap_err();
        assert!(matches!(err, BlockIndexError::Corrupt(_)));

        let bad_hash = r#"[{"hash":"zz","height":0,"chain_tx":0,"timestamp":0}]"#;
        let err = MemoryBlockIndex::from_json(bad_hash).unwrap_err();
        assert!(matches!(err, BlockIndexError::Corrupt(_)));
    }

    #[test]
    fn concurrent_readers() {
        let index = MemoryBlockIndex::from_records((0..100u8).map(|i| record(i, i as u64)));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let index = index.clone();
                std::thread::spawn(move || {
                    (0..100u8).filter(|i| index.get(&Hash256([*i; 32])).is_some()).count()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 100);
        }
    }
}
