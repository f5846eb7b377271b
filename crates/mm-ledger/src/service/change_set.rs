//! Staged writes of one operation.

use crate::ports::outbound::BatchOperation;
use std::collections::BTreeMap;

/// Writes staged by one engine operation, committed as a single batch.
///
/// Later writes to a key replace earlier ones. Reads through the engine
/// consult the change-set first, so an operation sees its own writes.
#[derive(Debug, Default, Clone)]
pub struct ChangeSet {
    /// `None` marks a staged delete.
    staged: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.staged.insert(key, Some(value));
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        self.staged.insert(key, None);
    }

    /// `Some(Some(v))` staged put, `Some(None)` staged delete, `None` not
    /// touched.
    #[must_use]
    pub fn staged(&self, key: &[u8]) -> Option<Option<&[u8]>> {
        self.staged.get(key).map(|v| v.as_deref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn into_operations(self) -> Vec<BatchOperation> {
        self.staged
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOperation::Put { key, value },
                None => BatchOperation::Delete { key },
            })
            .collect()
    }
}
