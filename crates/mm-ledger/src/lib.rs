//! # mm-ledger - Property Unit-Holding Ledger
//!
//! Key-value-backed accounting engine that issues tradable property assets,
//! tracks per-account unit holdings and cash balances, and aggregates trade
//! records into a volume-weighted market quote.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Unit conservation per property | `domain/invariants.rs` - `check_unit_conservation_invariant()` |
//! | Holdings never negative | `domain/entities.rs` - `Account::change_holding()` |
//! | One holding per entity | `domain/invariants.rs` - `check_unique_holdings_invariant()` |
//! | Withdrawals never overdraw | `domain/entities.rs` - `Account::withdraw()` |
//! | Multi-record writes are atomic | `service/change_set.rs` + `KeyValueStore::atomic_batch_write()` |
//!
//! ## Storage Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `property:<id>` | `Property` |
//! | `account:<id>` | `Account` (participants and synthetic property accounts) |
//! | `prptytrades:<propertyId>` | `TradeMap` |
//! | `accttrades:<accountId>` | `TradeMap` |
//! | `trdprpty:` | `TradingProperties` |
//! | `offer:<id>` | `Offer` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entities, value objects, invariants, pure services
//! - `ports/` - Inbound API (`LedgerApi`) and outbound SPI (`KeyValueStore`, ...)
//! - `adapters/` - In-memory/file stores, JSON codec, identity, offer matchers
//! - `service/` - `LedgerService`, the engine implementing `LedgerApi`
//! - `dispatch/` - Named-operation routing with positional string arguments
//!
//! ## Usage
//!
//! ```ignore
//! use mm_ledger::prelude::*;
//!
//! let mut ledger = LedgerService::new_in_memory(LedgerConfig::default());
//! ledger.create_account("alice")?;
//! ledger.deposit_cash("alice", parse_amount("1000")?)?;
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod dispatch;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::domain::config::{LedgerConfig, MatchingMode};
    pub use crate::domain::entities::{
        Account, AccountStatus, Holding, Offer, Property, PropertyStatus, ReturnTrade, Role,
        Settlement, Trade, TradeMap, TradingProperties,
    };
    pub use crate::domain::errors::{
        EntityKind, IdentityError, KVStoreError, LedgerError, SerializationError,
    };
    pub use crate::domain::invariants::{InvariantCheckResult, InvariantViolation};
    pub use crate::domain::services::{aggregate_trades, compute_property_id};
    pub use crate::domain::value_objects::{
        parse_amount, AccountId, Amount, Direction, KeyPrefix, OfferId, PropertyId, TradeId,
    };

    pub use crate::ports::inbound::LedgerApi;
    pub use crate::ports::outbound::{
        BatchOperation, IdentityResolver, KeyValueStore, OfferMatcher, RecordSerializer,
    };

    pub use crate::adapters::{
        matcher_for, DisabledMatcher, InMemoryKVStore, IssuerCounterpartyMatcher,
        JsonRecordSerializer, StaticIdentityResolver,
    };
    #[cfg(feature = "file-store")]
    pub use crate::adapters::FileBackedKVStore;

    pub use crate::dispatch::{InvocationKind, LedgerHandler, Operation};
    pub use crate::service::{LedgerDependencies, LedgerService};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component name used in log fields and metric labels.
pub const COMPONENT_NAME: &str = "ledger";
