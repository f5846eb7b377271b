//! # End-to-End Flows
//!
//! Scenarios that cross the dispatcher, the engine and a store.

pub mod dispatcher;
pub mod persistence;
pub mod runtime;
