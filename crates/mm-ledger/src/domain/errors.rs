//! # Error Types
//!
//! All error types for ledger operations.
//!
//! Every failure surfaces synchronously as a typed error. Storage and codec
//! failures convert into [`LedgerError`] through `From`, so the engine can
//! propagate them with `?`.

use crate::domain::value_objects::Amount;
use std::fmt;
use thiserror::Error;

// =============================================================================
// PORT ERRORS
// =============================================================================

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error.
    #[error("I/O error: {message}")]
    IOError { message: String },

    /// Stored bytes could not be read back.
    #[error("storage corruption: {message}")]
    CorruptionError { message: String },
}

/// Codec errors (stored records and input payloads).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("serialization error: {message}")]
pub struct SerializationError {
    pub message: String,
}

impl SerializationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Identity resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The credential is not known to the resolver.
    #[error("unknown credential: {credential}")]
    UnknownCredential { credential: String },

    /// The credential carries a role code outside the known set.
    #[error("unknown role code: {code}")]
    UnknownRole { code: u8 },
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Property,
    Account,
    Trade,
    Offer,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Property => write!(f, "property"),
            EntityKind::Account => write!(f, "account"),
            EntityKind::Trade => write!(f, "trade"),
            EntityKind::Offer => write!(f, "offer"),
        }
    }
}

/// Errors returned by ledger operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No record under the requested key.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A record already exists under the key being created.
    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: EntityKind, id: String },

    /// The entity already carries an id where a fresh one is computed.
    #[error("id already assigned: {id}")]
    AlreadyAssigned { id: String },

    /// A property (or its synthetic account) already exists for this address.
    #[error("duplicate property: {id}")]
    DuplicateProperty { id: String },

    /// The referenced participant account does not exist.
    #[error("unknown account: {id}")]
    UnknownAccount { id: String },

    /// Monetary argument is unparsable or negative.
    #[error("invalid amount: {value:?}")]
    InvalidAmount { value: String },

    /// Cash balance cannot cover the requested debit.
    #[error("insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: String,
        required: Amount,
        available: Amount,
    },

    /// A holding change would drive the position below zero.
    #[error("insufficient units of {entity} in {account}: available {available}, change {requested}")]
    InsufficientUnits {
        account: String,
        entity: String,
        available: u64,
        requested: i64,
    },

    /// A holding change would exceed the representable unit count.
    #[error("unit overflow on {entity}")]
    UnitOverflow { entity: String },

    /// A monetary computation exceeded the decimal range.
    #[error("amount overflow in {context}")]
    AmountOverflow { context: String },

    /// Wrong number of positional arguments for an operation.
    #[error("{operation}: expected {expected} argument(s), got {actual}")]
    InvalidArgumentCount {
        operation: String,
        expected: String,
        actual: usize,
    },

    /// Unknown operation name, or a name used on the wrong side.
    #[error("invalid operation: {name}")]
    InvalidOperation { name: String },

    /// Malformed stored record or input payload.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// Property payload failed validation.
    #[error("invalid property: {reason}")]
    InvalidProperty { reason: String },

    /// Account id or record failed validation.
    #[error("invalid account: {reason}")]
    InvalidAccount { reason: String },

    /// Trade or offer payload failed validation.
    #[error("invalid trade: {reason}")]
    InvalidTrade { reason: String },

    /// The property is reclaimed and no longer accepts trades or offers.
    #[error("property not tradable: {id}")]
    PropertyNotTradable { id: String },

    /// No offer matcher is configured, or it declined the offer.
    #[error("matching unavailable for offer {offer}")]
    MatchingUnavailable { offer: String },

    /// Engine configuration is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Identity resolution failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Backing store failure.
    #[error("storage error: {0}")]
    Storage(#[from] KVStoreError),
}

impl LedgerError {
    /// Stable machine-readable error kind.
    ///
    /// Used in response envelopes and as a metrics label.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::NotFound { .. } => "NotFound",
            LedgerError::AlreadyExists { .. } => "AlreadyExists",
            LedgerError::AlreadyAssigned { .. } => "AlreadyAssigned",
            LedgerError::DuplicateProperty { .. } => "DuplicateProperty",
            LedgerError::UnknownAccount { .. } => "UnknownAccount",
            LedgerError::InvalidAmount { .. } => "InvalidAmount",
            LedgerError::InsufficientFunds { .. } => "InsufficientFunds",
            LedgerError::InsufficientUnits { .. } => "InsufficientUnits",
            LedgerError::UnitOverflow { .. } => "UnitOverflow",
            LedgerError::AmountOverflow { .. } => "AmountOverflow",
            LedgerError::InvalidArgumentCount { .. } => "InvalidArgumentCount",
            LedgerError::InvalidOperation { .. } => "InvalidOperation",
            LedgerError::Serialization(_) => "SerializationError",
            LedgerError::InvalidProperty { .. } => "InvalidProperty",
            LedgerError::InvalidAccount { .. } => "InvalidAccount",
            LedgerError::InvalidTrade { .. } => "InvalidTrade",
            LedgerError::PropertyNotTradable { .. } => "PropertyNotTradable",
            LedgerError::MatchingUnavailable { .. } => "MatchingUnavailable",
            LedgerError::InvalidConfig { .. } => "InvalidConfig",
            LedgerError::Identity(_) => "IdentityError",
            LedgerError::Storage(_) => "StorageError",
        }
    }

    pub(crate) fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            kind,
            id: id.into(),
        }
    }
}
