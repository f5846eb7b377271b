//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the ledger engine requires from its host.

use crate::domain::entities::{Account, Offer, Property, Role, Settlement};
use crate::domain::errors::{IdentityError, KVStoreError, LedgerError, SerializationError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key/value pairs returned by a prefix scan, in ascending key order.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Abstract interface for key-value storage.
///
/// Production: `RocksDbStore` (mm-node) or `FileBackedKVStore`.
/// Testing: `InMemoryKVStore`.
///
/// The engine reads through `get` and `prefix_scan` and writes only through
/// `atomic_batch_write`. `put`, `delete` and `exists` are part of the store
/// contract for hosts that seed or inspect a store outside an operation;
/// every backend must keep them consistent with the batch path.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch are applied, or NONE are.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// All pairs whose key starts with `prefix`.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        (**self).delete(key)
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        (**self).atomic_batch_write(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        (**self).exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        (**self).prefix_scan(prefix)
    }
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }

    /// Key this operation touches.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        match self {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key,
        }
    }
}

/// Codec for persisted records and query responses.
pub trait RecordSerializer: Send + Sync {
    /// Encode a record.
    fn serialize<T: Serialize>(&self, record: &T) -> Result<Vec<u8>, SerializationError>;

    /// Decode a record.
    fn deserialize<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, SerializationError>;
}

/// Maps a caller credential to a coarse-grained role.
///
/// Never consulted by money-moving operations.
pub trait IdentityResolver: Send + Sync {
    fn resolve_role(&self, credential: &str) -> Result<Role, IdentityError>;
}

/// Finds the counterparty for an accepted offer.
pub trait OfferMatcher: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Produce the settlement that fills `offer` for `taker`.
    fn match_offer(
        &self,
        offer: &Offer,
        property: &Property,
        taker: &Account,
    ) -> Result<Settlement, LedgerError>;
}
