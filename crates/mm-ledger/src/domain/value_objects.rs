//! # Value Objects
//!
//! Identifier aliases, the money type, trade direction and the storage key
//! namespace.

use crate::domain::errors::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Caller-chosen account identifier.
pub type AccountId = String;

/// Property identifier: lowercase hex of a 128-bit address digest, or
/// caller-supplied.
pub type PropertyId = String;

/// Trade record identifier.
pub type TradeId = String;

/// Offer identifier.
pub type OfferId = String;

/// Monetary amount (cash, per-unit price, escrow).
///
/// A single decimal type is used for every money field so aggregation never
/// drifts the way binary floats do.
pub type Amount = Decimal;

/// Parse a monetary argument.
///
/// Accepts any decimal literal (`"1000"`, `"12.50"`). Rejects unparsable and
/// negative values with [`LedgerError::InvalidAmount`].
pub fn parse_amount(raw: &str) -> Result<Amount, LedgerError> {
    let trimmed = raw.trim();
    let value = Decimal::from_str(trimmed).map_err(|_| LedgerError::InvalidAmount {
        value: raw.to_string(),
    })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(LedgerError::InvalidAmount {
            value: raw.to_string(),
        });
    }

    Ok(value)
}

/// Side of a trade or offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "Buy"),
            Direction::Sell => write!(f, "Sell"),
        }
    }
}

// =============================================================================
// STORAGE KEYS
// =============================================================================

/// Key namespaces in the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// `property:<id>` -> Property
    Property,
    /// `account:<id>` -> Account
    Account,
    /// `prptytrades:<propertyId>` -> TradeMap
    PropertyTrades,
    /// `accttrades:<accountId>` -> TradeMap
    AccountTrades,
    /// `trdprpty:` -> TradingProperties (single record)
    TradingProperties,
    /// `offer:<id>` -> Offer
    Offer,
}

impl KeyPrefix {
    /// Namespace prefix, including the trailing separator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyPrefix::Property => "property:",
            KeyPrefix::Account => "account:",
            KeyPrefix::PropertyTrades => "prptytrades:",
            KeyPrefix::AccountTrades => "accttrades:",
            KeyPrefix::TradingProperties => "trdprpty:",
            KeyPrefix::Offer => "offer:",
        }
    }

    /// Full storage key for `id` under this namespace.
    #[must_use]
    pub fn key(&self, id: &str) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.as_str().len() + id.len());
        key.extend_from_slice(self.as_str().as_bytes());
        key.extend_from_slice(id.as_bytes());
        key
    }

    /// Strip this namespace from a raw key, returning the id part.
    #[must_use]
    pub fn strip<'a>(&self, key: &'a [u8]) -> Option<&'a str> {
        key.strip_prefix(self.as_str().as_bytes())
            .and_then(|rest| std::str::from_utf8(rest).ok())
    }

    pub fn property_key(id: &str) -> Vec<u8> {
        KeyPrefix::Property.key(id)
    }

    pub fn account_key(id: &str) -> Vec<u8> {
        KeyPrefix::Account.key(id)
    }

    pub fn property_trades_key(property_id: &str) -> Vec<u8> {
        KeyPrefix::PropertyTrades.key(property_id)
    }

    pub fn account_trades_key(account_id: &str) -> Vec<u8> {
        KeyPrefix::AccountTrades.key(account_id)
    }

    /// The registry is a single record stored at the bare prefix.
    pub fn trading_properties_key() -> Vec<u8> {
        KeyPrefix::TradingProperties.key("")
    }

    pub fn offer_key(id: &str) -> Vec<u8> {
        KeyPrefix::Offer.key(id)
    }
}
