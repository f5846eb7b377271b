//! # Property Tests
//!
//! Randomized operation sequences checked against the ledger invariants.

pub mod conservation;
