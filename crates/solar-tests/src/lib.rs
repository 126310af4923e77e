//! Integration and property tests for the SolarCoin checkpoint subsystem.
//!
//! Exercises the checkpoint service end to end against the compiled-in
//! tables and an in-memory block index, and checks the progress model's
//! invariants under randomized inputs.

pub mod helpers;
