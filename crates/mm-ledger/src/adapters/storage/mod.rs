//! Storage Adapters
//!
//! Implementations of the `KeyValueStore` trait.

mod memory;
#[cfg(feature = "file-store")]
mod file;

pub use memory::InMemoryKVStore;
#[cfg(feature = "file-store")]
pub use file::FileBackedKVStore;
