//! # Domain Layer
//!
//! Pure ledger logic: entities, value objects, invariants and the
//! stateless computations (id hashing, trade aggregation) the engine uses.
//! Nothing in this module touches storage.

pub mod config;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod services;
pub mod value_objects;

pub use config::{LedgerConfig, MatchingMode};
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use services::*;
pub use value_objects::*;
