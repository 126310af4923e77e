//! Trait interfaces for the block-index collaborator.
//!
//! The checkpoint service never owns block-index entries. It only needs a
//! point lookup from block hash to an entry, and read access to two fields
//! of that entry:
//! - [`BlockIndexEntry`] — cumulative transaction count and timestamp
//! - [`BlockIndex`] — hash lookup (solar-node implements an in-memory one)

use std::collections::HashMap;

use crate::error::BlockIndexError;
use crate::types::Hash256;

/// Read-only view of a single block-index entry.
pub trait BlockIndexEntry {
    /// Cumulative number of transactions from genesis through this block.
    fn chain_tx(&self) -> u64;

    /// Block timestamp in Unix seconds.
    fn timestamp(&self) -> u64;
}

impl<E: BlockIndexEntry + ?Sized> BlockIndexEntry for &E {
    fn chain_tx(&self) -> u64 {
        (**self).chain_tx()
    }

    fn timestamp(&self) -> u64 {
        (**self).timestamp()
    }
}

/// Point lookups into the node's block index.
///
/// Implementations own their concurrency discipline. A lookup must not
/// block indefinitely; report trouble as a [`BlockIndexError`] instead.
pub trait BlockIndex: Send + Sync {
    /// Handle returned for a known block.
    type Entry: BlockIndexEntry;

    /// Look up a block by hash. Returns `None` if the block is unknown.
    fn lookup(&self, hash: &Hash256) -> Result<Option<Self::Entry>, BlockIndexError>;

    /// Check whether a block is present.
    ///
    /// Default implementation delegates to [`lookup`](Self::lookup).
    fn contains(&self, hash: &Hash256) -> Result<bool, BlockIndexError> {
        Ok(self.lookup(hash)?.is_some())
    }
}

impl<E> BlockIndex for HashMap<Hash256, E>
where
    E: BlockIndexEntry + Clone + Send + Sync,
{
    type Entry = E;

    fn lookup(&self, hash: &Hash256) -> Result<Option<E>, BlockIndexError> {
        Ok(self.get(hash).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Entry {
        chain_tx: u64,
        timestamp: u64,
    }

    impl BlockIndexEntry for Entry {
        fn chain_tx(&self) -> u64 {
            self.chain_tx
        }
        fn timestamp(&self) -> u64 {
            self.timestamp
        }
    }

    #[test]
    fn hashmap_is_a_block_index() {
        let mut index = HashMap::new();
        index.insert(Hash256([1; 32]), Entry { chain_tx: 10, timestamp: 99 });

        let found = index.lookup(&Hash256([1; 32])).unwrap().unwrap();
        assert_eq!(found.chain_tx(), 10);
        assert_eq!(found.timestamp(), 99);
        assert!(index.lookup(&Hash256([2; 32])).unwrap().is_none());
    }

    #[test]
    fn contains_delegates_to_lookup() {
        let mut index = HashMap::new();
        index.insert(Hash256([3; 32]), Entry { chain_tx: 1, timestamp: 1 });
        assert!(index.contains(&Hash256([3; 32])).unwrap());
        assert!(!index.contains(&Hash256::ZERO).unwrap());
    }

    #[test]
    fn references_are_entries() {
        let e = Entry { chain_tx: 5, timestamp: 6 };
        let r: &Entry = &e;
        assert_eq!(BlockIndexEntry::chain_tx(&r), 5);
        assert_eq!(BlockIndexEntry::timestamp(&r), 6);
    }
}
