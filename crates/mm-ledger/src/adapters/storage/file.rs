use super::memory::{apply_batch, scan_prefix};
use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Snapshot header; bumped if the record layout changes.
const MAGIC: &[u8; 8] = b"MMKV0001";

/// File-backed key-value store.
///
/// Keeps the whole map in memory and rewrites a single snapshot file on
/// every write, via temp file + rename. A batch is therefore durable
/// all-or-nothing, and the in-memory map only changes once the snapshot
/// is on disk.
pub struct FileBackedKVStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open the store at `path`, loading an existing snapshot if present.
    ///
    /// A missing file starts an empty store; a truncated or foreign file is
    /// a `CorruptionError`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        let data = match std::fs::File::open(&path) {
            Ok(mut file) => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes).map_err(io_error)?;
                let data = decode_snapshot(&bytes)?;
                info!(
                    path = %path.display(),
                    keys = data.len(),
                    "loaded ledger snapshot"
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no ledger snapshot, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(io_error(e)),
        };

        Ok(Self { data, path })
    }

    /// Snapshot file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, data: &BTreeMap<Vec<u8>, Vec<u8>>) -> Result<(), KVStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_error)?;
            }
        }

        let bytes = encode_snapshot(data);

        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_error)?;

        debug!(keys = data.len(), bytes = bytes.len(), "ledger snapshot written");
        Ok(())
    }

    /// Apply `operations` to a copy, persist it, then swap it in.
    fn commit(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut next = self.data.clone();
        apply_batch(&mut next, operations);
        self.save(&next)?;
        self.data = next;
        Ok(())
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.commit(vec![BatchOperation::put(key, value)])
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.commit(vec![BatchOperation::delete(key)])
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.commit(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        Ok(scan_prefix(&self.data, prefix))
    }
}

fn io_error(e: std::io::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: e.to_string(),
    }
}

// Layout: MAGIC, then [key_len:u32][key][value_len:u32][value]...
fn encode_snapshot(data: &BTreeMap<Vec<u8>, Vec<u8>>) -> Vec<u8> {
    let mut bytes = Vec::from(&MAGIC[..]);
    for (key, value) in data {
        bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
        bytes.extend_from_slice(key);
        bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
        bytes.extend_from_slice(value);
    }
    bytes
}

fn decode_snapshot(bytes: &[u8]) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, KVStoreError> {
    let corrupt = |message: &str| KVStoreError::CorruptionError {
        message: message.to_string(),
    };

    if bytes.is_empty() {
        return Ok(BTreeMap::new());
    }
    let mut rest = bytes
        .strip_prefix(&MAGIC[..])
        .ok_or_else(|| corrupt("missing snapshot header"))?;

    let mut data = BTreeMap::new();
    while !rest.is_empty() {
        let (key, tail) = read_chunk(rest).ok_or_else(|| corrupt("truncated key"))?;
        let (value, tail) = read_chunk(tail).ok_or_else(|| corrupt("truncated value"))?;
        data.insert(key.to_vec(), value.to_vec());
        rest = tail;
    }
    Ok(data)
}

fn read_chunk(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let (len, rest) = bytes.split_first_chunk::<4>()?;
    let len = u32::from_le_bytes(*len) as usize;
    if rest.len() < len {
        return None;
    }
    Some(rest.split_at(len))
}
