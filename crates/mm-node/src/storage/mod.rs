//! # Storage Backends
//!
//! Opens the `KeyValueStore` chosen by [`NodeConfig::backend`]. The result is
//! boxed so the rest of the node is backend-agnostic.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};

use crate::config::{NodeConfig, StoreBackend};
use mm_ledger::adapters::{FileBackedKVStore, InMemoryKVStore};
use mm_ledger::domain::errors::KVStoreError;
use mm_ledger::ports::outbound::KeyValueStore;
use tracing::info;

/// Store handed to the ledger engine.
pub type DynStore = Box<dyn KeyValueStore>;

/// Open the configured backend, creating the data directory when needed.
pub fn open_store(config: &NodeConfig) -> Result<DynStore, KVStoreError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("using in-memory store; nothing will be persisted");
            Ok(Box::new(InMemoryKVStore::new()))
        }
        StoreBackend::File => {
            ensure_data_dir(config)?;
            let store = FileBackedKVStore::open(config.snapshot_path())?;
            Ok(Box::new(store))
        }
        StoreBackend::RocksDb => open_rocksdb(config),
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(config: &NodeConfig) -> Result<DynStore, KVStoreError> {
    ensure_data_dir(config)?;
    let store = RocksDbStore::open(RocksDbConfig::new(config.rocksdb_path()))?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(_config: &NodeConfig) -> Result<DynStore, KVStoreError> {
    Err(KVStoreError::IOError {
        message: "rocksdb backend not compiled in".to_string(),
    })
}

fn ensure_data_dir(config: &NodeConfig) -> Result<(), KVStoreError> {
    std::fs::create_dir_all(&config.data_dir).map_err(|e| KVStoreError::IOError {
        message: format!(
            "failed to create data directory {}: {e}",
            config.data_dir.display()
        ),
    })
}
