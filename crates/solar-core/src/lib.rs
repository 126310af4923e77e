//! # solar-core
//! Foundation types and traits for the SolarCoin checkpoint subsystem.

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
