//! # solar-node — Node-side wiring for the checkpoint subsystem.
//!
//! - [`config::NodeConfig`] — layered node configuration
//! - [`block_index::MemoryBlockIndex`] — in-memory block index
//! - [`logging::init_logging`] — tracing subscriber setup

pub mod block_index;
pub mod config;
pub mod logging;

pub use block_index::{BlockIndexRecord, MemoryBlockIndex};
pub use config::NodeConfig;
pub use logging::init_logging;
