//! # Adapters Module
//!
//! Implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `storage`: in-memory and file-backed `KeyValueStore`s
//! - `serializer`: JSON `RecordSerializer`
//! - `identity`: static credential-to-role table
//! - `matcher`: `OfferMatcher` strategies

pub mod identity;
pub mod matcher;
pub mod serializer;
pub mod storage;

pub use identity::StaticIdentityResolver;
pub use matcher::{matcher_for, DisabledMatcher, IssuerCounterpartyMatcher};
pub use serializer::JsonRecordSerializer;
#[cfg(feature = "file-store")]
pub use storage::FileBackedKVStore;
pub use storage::InMemoryKVStore;
