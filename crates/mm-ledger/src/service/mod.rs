//! # Ledger Service
//!
//! The engine implementing [`LedgerApi`].
//!
//! ## Architecture
//!
//! This service:
//! 1. Re-reads every record it touches on each call (no caching)
//! 2. Stages all writes of one operation in a [`ChangeSet`] with
//!    read-your-writes visibility
//! 3. Commits the change-set as a single `atomic_batch_write`, so a failed
//!    operation leaves no partial state
//! 4. Takes storage, codec and offer matching by dependency injection

mod api;
mod change_set;
mod helpers;
mod settlement;

pub use change_set::ChangeSet;

use crate::adapters::{matcher_for, InMemoryKVStore, JsonRecordSerializer};
use crate::domain::config::LedgerConfig;
use crate::domain::errors::LedgerError;
use crate::ports::outbound::{KeyValueStore, OfferMatcher, RecordSerializer};

/// The ledger engine.
pub struct LedgerService<KV = InMemoryKVStore, RS = JsonRecordSerializer>
where
    KV: KeyValueStore,
    RS: RecordSerializer,
{
    /// Backing store; the only place ledger state lives.
    pub(crate) kv_store: KV,
    /// Record codec.
    pub(crate) serializer: RS,
    /// Counterparty strategy for `accept_offer`.
    pub(crate) matcher: Box<dyn OfferMatcher>,
    /// Engine configuration.
    pub(crate) config: LedgerConfig,
}

/// Dependencies for LedgerService
pub struct LedgerDependencies<KV, RS> {
    pub kv_store: KV,
    pub serializer: RS,
    pub matcher: Box<dyn OfferMatcher>,
}

impl<KV: KeyValueStore> LedgerDependencies<KV, JsonRecordSerializer> {
    /// JSON codec and the matcher named by `config`.
    pub fn with_store(kv_store: KV, config: &LedgerConfig) -> Self {
        Self {
            kv_store,
            serializer: JsonRecordSerializer,
            matcher: matcher_for(config.matching),
        }
    }
}

impl<KV, RS> LedgerService<KV, RS>
where
    KV: KeyValueStore,
    RS: RecordSerializer,
{
    /// Create a ledger over the given dependencies.
    pub fn new(deps: LedgerDependencies<KV, RS>, config: LedgerConfig) -> Self {
        Self {
            kv_store: deps.kv_store,
            serializer: deps.serializer,
            matcher: deps.matcher,
            config,
        }
    }

    /// Like [`LedgerService::new`], rejecting an invalid configuration.
    pub fn try_new(
        deps: LedgerDependencies<KV, RS>,
        config: LedgerConfig,
    ) -> Result<Self, LedgerError> {
        config.validate()?;
        Ok(Self::new(deps, config))
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Read access to the backing store.
    #[must_use]
    pub fn store(&self) -> &KV {
        &self.kv_store
    }

    /// Give up the engine and keep its store.
    pub fn into_store(self) -> KV {
        self.kv_store
    }
}

impl LedgerService<InMemoryKVStore, JsonRecordSerializer> {
    /// Ledger over a fresh in-memory store.
    pub fn new_in_memory(config: LedgerConfig) -> Self {
        let deps = LedgerDependencies::with_store(InMemoryKVStore::new(), &config);
        Self::new(deps, config)
    }
}
