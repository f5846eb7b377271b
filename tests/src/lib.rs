//! # Micromarket Test Suite
//!
//! Unified test crate.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Shared builders for requests and records
//! ├── flows/            # End-to-end scenarios
//! │   ├── dispatcher.rs # Named operations through LedgerHandler
//! │   ├── persistence.rs# File-backed store across restarts
//! │   └── runtime.rs    # Node worker queue and line protocol
//! └── properties/       # proptest invariants
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mm-tests
//! cargo test -p mm-tests flows::
//! cargo test -p mm-tests properties::
//! ```

pub mod fixtures;
pub mod flows;
pub mod properties;
