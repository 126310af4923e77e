//! # solar-consensus — Checkpoint enforcement and sync progress.
//!
//! - [`checkpoint`] — compiled-in checkpoint tables per network
//! - [`service`] — [`Checkpoints`], the query service used by chain
//!   validation, reorg handling, and progress reporting

pub mod checkpoint;
pub mod service;

pub use checkpoint::{Calibration, CheckpointData};
pub use service::{CheckpointConfig, Checkpoints};
