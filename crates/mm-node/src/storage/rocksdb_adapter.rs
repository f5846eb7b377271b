//! # RocksDB Storage Adapter
//!
//! `KeyValueStore` over a single RocksDB default column family.
//!
//! - Ledger batches map onto one `WriteBatch`, so a commit is all-or-nothing
//! - Prefix scans seek to the prefix and stop at the first key outside it
//! - Writes are fsynced unless `sync_writes` is off

use mm_ledger::domain::errors::KVStoreError;
use mm_ledger::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use parking_lot::RwLock;
use rocksdb::{IteratorMode, Options, WriteBatch, WriteOptions, DB};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// RocksDB tuning for the ledger.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    pub path: PathBuf,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// fsync after each write (default: true)
    pub sync_writes: bool,
}

impl RocksDbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }

    /// Small buffers, no fsync.
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            block_cache_size: 4 * 1024 * 1024,
            write_buffer_size: 1024 * 1024,
            sync_writes: false,
            ..Self::new(path)
        }
    }
}

/// RocksDB-backed key-value store.
pub struct RocksDbStore {
    db: Arc<RwLock<DB>>,
    config: RocksDbConfig,
}

impl RocksDbStore {
    /// Open or create the database at `config.path`.
    pub fn open(config: RocksDbConfig) -> Result<Self, KVStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path).map_err(|e| KVStoreError::IOError {
            message: format!("failed to open RocksDB at {}: {e}", config.path.display()),
        })?;
        info!(path = %config.path.display(), "rocksdb store opened");

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            config,
        })
    }

    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        Self::open(RocksDbConfig::new(path.as_ref()))
    }

    fn write_options(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(self.config.sync_writes);
        opts
    }
}

fn io_error(action: &str, e: rocksdb::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: format!("RocksDB {action} failed: {e}"),
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.db.read().get(key).map_err(|e| io_error("get", e))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        let opts = self.write_options();
        self.db
            .write()
            .put_opt(key, value, &opts)
            .map_err(|e| io_error("put", e))
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        let opts = self.write_options();
        self.db
            .write()
            .delete_opt(key, &opts)
            .map_err(|e| io_error("delete", e))
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut batch = WriteBatch::default();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => batch.put(&key, &value),
                BatchOperation::Delete { key } => batch.delete(&key),
            }
        }

        let opts = self.write_options();
        self.db
            .write()
            .write_opt(batch, &opts)
            .map_err(|e| io_error("batch write", e))
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        self.db
            .read()
            .get_pinned(key)
            .map(|v| v.is_some())
            .map_err(|e| io_error("exists check", e))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        let db = self.db.read();
        let mut results = Vec::new();

        for item in db.iterator(IteratorMode::From(prefix, rocksdb::Direction::Forward)) {
            let (key, value) = item.map_err(|e| io_error("scan", e))?;
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_vec(), value.to_vec()));
        }

        Ok(results)
    }
}
