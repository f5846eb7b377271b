use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use std::collections::BTreeMap;

/// In-memory key-value store.
///
/// Ordered, so prefix scans return keys ascending like RocksDB does.
/// Batches apply in full because nothing in between can fail.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKVStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.data.remove(key);
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        apply_batch(&mut self.data, operations);
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        Ok(scan_prefix(&self.data, prefix))
    }
}

pub(super) fn apply_batch(data: &mut BTreeMap<Vec<u8>, Vec<u8>>, operations: Vec<BatchOperation>) {
    for op in operations {
        match op {
            BatchOperation::Put { key, value } => {
                data.insert(key, value);
            }
            BatchOperation::Delete { key } => {
                data.remove(&key);
            }
        }
    }
}

pub(super) fn scan_prefix(data: &BTreeMap<Vec<u8>, Vec<u8>>, prefix: &[u8]) -> ScanResult {
    data.range(prefix.to_vec()..)
        .take_while(|(k, _)| k.starts_with(prefix))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
