//! Error types for the SolarCoin checkpoint subsystem.
use thiserror::Error;

use crate::types::Hash256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashParseError {
    #[error("expected 64 hex characters, got {0}")] InvalidLength(usize),
    #[error("invalid hex: {0}")] InvalidHex(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("checkpoint table is empty")] Empty,
    #[error("checkpoint table has no genesis entry")] MissingGenesis,
    #[error("genesis checkpoint mismatch: expected {expected}, got {got}")] GenesisMismatch { expected: Hash256, got: Hash256 },
    #[error("checkpoint heights not strictly increasing: {height} after {previous}")] NonIncreasingHeight { previous: u64, height: u64 },
    #[error("invalid checkpoint hash at height {height}: {source}")] InvalidHash { height: u64, source: HashParseError },
    #[error("block at height {height} does not match checkpoint: expected {expected}, got {got}")] Mismatch { height: u64, expected: Hash256, got: Hash256 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockIndexError {
    #[error("block index unavailable: {0}")] Unavailable(String),
    #[error("block index corrupt: {0}")] Corrupt(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config load: {0}")] Load(String),
    #[error("unknown network: {0}")] InvalidNetwork(String),
}
