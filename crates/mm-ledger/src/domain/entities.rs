//! # Core Domain Entities
//!
//! Persisted ledger records and the in-memory values the engine passes
//! around. All records encode with camelCase field names.

use crate::domain::errors::LedgerError;
use crate::domain::value_objects::{AccountId, Amount, Direction, OfferId, PropertyId, TradeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// PROPERTY
// =============================================================================

/// Property lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertyStatus {
    /// Decoded from an issuance payload, not yet committed.
    #[default]
    Proposed,
    /// Issued and open for trading.
    Managed,
    /// Withdrawn from trading.
    Reclaimed,
}

/// A real-world asset issued for fractional trading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Empty until assigned at issuance.
    #[serde(default)]
    pub id: PropertyId,
    pub address_line: String,
    pub suburb: String,
    pub state: String,
    pub post_code: String,
    #[serde(default)]
    pub managed_by: String,
    /// Issuing account id.
    pub issuer: AccountId,
    /// Total unit supply, fixed at issuance.
    pub units: u64,
    #[serde(default)]
    pub status: PropertyStatus,
}

impl Property {
    /// Structural validation of an issuance payload.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let required = [
            ("addressLine", &self.address_line),
            ("suburb", &self.suburb),
            ("state", &self.state),
            ("postCode", &self.post_code),
            ("issuer", &self.issuer),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(LedgerError::InvalidProperty {
                    reason: format!("{field} must not be empty"),
                });
            }
        }

        if self.units == 0 {
            return Err(LedgerError::InvalidProperty {
                reason: "units must be greater than zero".into(),
            });
        }

        // Holding deltas are signed, so supply must fit in i64.
        if i64::try_from(self.units).is_err() {
            return Err(LedgerError::InvalidProperty {
                reason: format!("units exceed {}", i64::MAX),
            });
        }

        Ok(())
    }

    /// Whether new trades and offers may reference this property.
    #[must_use]
    pub fn is_tradable(&self) -> bool {
        self.status != PropertyStatus::Reclaimed
    }
}

// =============================================================================
// ACCOUNT & HOLDINGS
// =============================================================================

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

/// A position against a property or a counter-account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub entity: String,
    pub units: u64,
}

/// A ledger participant, or the synthetic account mirroring a property's
/// unit attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub cash: Amount,
    #[serde(default)]
    pub status: AccountStatus,
    /// One entry per distinct entity, in insertion order.
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl Account {
    /// New active account with zero cash and no holdings.
    pub fn new(id: impl Into<AccountId>) -> Self {
        Self {
            id: id.into(),
            cash: Decimal::ZERO,
            status: AccountStatus::Active,
            holdings: Vec::new(),
        }
    }

    /// Synthetic account keyed by the property id, attributing the whole
    /// supply to the issuer.
    pub fn synthetic(property: &Property) -> Self {
        Self {
            id: property.id.clone(),
            cash: Decimal::ZERO,
            status: AccountStatus::Active,
            holdings: vec![Holding {
                entity: property.issuer.clone(),
                units: property.units,
            }],
        }
    }

    /// Holding against `entity`, if any.
    #[must_use]
    pub fn holding(&self, entity: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.entity == entity)
    }

    /// Units held against `entity` (zero when there is no entry).
    #[must_use]
    pub fn units_of(&self, entity: &str) -> u64 {
        self.holding(entity).map_or(0, |h| h.units)
    }

    /// Apply a signed unit change to the holding for `entity`.
    ///
    /// A missing entry is created at zero first. Fails with
    /// `InsufficientUnits` if the result would be negative; on failure the
    /// account is left unmodified (no zero entry is inserted either).
    pub fn change_holding(&mut self, entity: &str, delta: i64) -> Result<u64, LedgerError> {
        let current = self.units_of(entity);
        let final_units = i128::from(current) + i128::from(delta);

        if final_units < 0 {
            return Err(LedgerError::InsufficientUnits {
                account: self.id.clone(),
                entity: entity.to_string(),
                available: current,
                requested: delta,
            });
        }
        let final_units = u64::try_from(final_units).map_err(|_| LedgerError::UnitOverflow {
            entity: entity.to_string(),
        })?;

        match self.holdings.iter_mut().find(|h| h.entity == entity) {
            Some(holding) => holding.units = final_units,
            None => self.holdings.push(Holding {
                entity: entity.to_string(),
                units: final_units,
            }),
        }

        Ok(final_units)
    }

    /// Add cash.
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount, LedgerError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(LedgerError::InvalidAmount {
                value: amount.to_string(),
            });
        }
        self.cash = self
            .cash
            .checked_add(amount)
            .ok_or_else(|| LedgerError::AmountOverflow {
                context: format!("deposit to {}", self.id),
            })?;
        Ok(self.cash)
    }

    /// Remove cash; never overdraws.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Amount, LedgerError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(LedgerError::InvalidAmount {
                value: amount.to_string(),
            });
        }
        if self.cash < amount {
            return Err(LedgerError::InsufficientFunds {
                account: self.id.clone(),
                required: amount,
                available: self.cash,
            });
        }
        self.cash -= amount;
        Ok(self.cash)
    }
}

// =============================================================================
// TRADES & OFFERS
// =============================================================================

/// Historical unit transfer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Assigned when empty on creation.
    #[serde(default)]
    pub id: TradeId,
    pub account_id: AccountId,
    pub property_id: PropertyId,
    pub direction: Direction,
    /// Per-unit price.
    pub price: Amount,
    pub units: u64,
    #[serde(default)]
    pub escrow: Amount,
}

impl Trade {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.account_id.trim().is_empty() {
            return Err(LedgerError::InvalidTrade {
                reason: "accountId must not be empty".into(),
            });
        }
        if self.property_id.trim().is_empty() {
            return Err(LedgerError::InvalidTrade {
                reason: "propertyId must not be empty".into(),
            });
        }
        if self.units == 0 {
            return Err(LedgerError::InvalidTrade {
                reason: "units must be greater than zero".into(),
            });
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(LedgerError::InvalidTrade {
                reason: format!("negative price {}", self.price),
            });
        }
        if self.escrow.is_sign_negative() && !self.escrow.is_zero() {
            return Err(LedgerError::InvalidTrade {
                reason: format!("negative escrow {}", self.escrow),
            });
        }
        Ok(())
    }

    /// `units * price`.
    pub fn notional(&self) -> Result<Amount, LedgerError> {
        Decimal::from(self.units)
            .checked_mul(self.price)
            .ok_or_else(|| LedgerError::AmountOverflow {
                context: format!("trade {}", self.id),
            })
    }
}

/// Trade index stored per property and per account, keyed by trade id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeMap(pub BTreeMap<TradeId, Trade>);

impl TradeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `trade` unless its id is already filed. Existing entries are
    /// never replaced; returns whether the trade was added.
    pub fn insert(&mut self, trade: Trade) -> bool {
        match self.0.entry(trade.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(trade);
                true
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Trades in id order.
    pub fn trades(&self) -> impl Iterator<Item = &Trade> {
        self.0.values()
    }
}

/// Pending, unmatched order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: OfferId,
    pub property_id: PropertyId,
    pub direction: Direction,
    pub price: Amount,
    pub units: u64,
}

/// Registry of property ids open for trading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradingProperties(pub BTreeSet<PropertyId>);

impl TradingProperties {
    pub fn insert(&mut self, id: impl Into<PropertyId>) -> bool {
        self.0.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.0.remove(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyId> {
        self.0.iter()
    }
}

/// Aggregated market quote for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnTrade {
    pub property_id: PropertyId,
    pub direction: Direction,
    /// Volume-weighted average price.
    pub price: Amount,
    pub units: u64,
}

/// A fully specified unit-for-cash transfer between two participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub seller: AccountId,
    pub buyer: AccountId,
    pub property_id: PropertyId,
    pub units: u64,
    pub price: Amount,
}

impl Settlement {
    /// Cash the buyer pays.
    pub fn value(&self) -> Result<Amount, LedgerError> {
        Decimal::from(self.units)
            .checked_mul(self.price)
            .ok_or_else(|| LedgerError::AmountOverflow {
                context: format!("settlement of {}", self.property_id),
            })
    }
}

// =============================================================================
// ROLES
// =============================================================================

/// Coarse-grained caller role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    MarketMaker,
    Manager,
    PrivateEntity,
    Exchange,
}

impl Role {
    /// Numeric code carried in credentials.
    #[must_use]
    pub fn code(&self) -> u8 {
        match self {
            Role::MarketMaker => 0,
            Role::Manager => 1,
            Role::PrivateEntity => 2,
            Role::Exchange => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Role::MarketMaker),
            1 => Some(Role::Manager),
            2 => Some(Role::PrivateEntity),
            3 => Some(Role::Exchange),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{amount, oakwood_property};

    #[test]
    fn test_property_validation() {
        let property = oakwood_property("cardy", 10_000);
        assert!(property.validate().is_ok());

        let mut no_units = property.clone();
        no_units.units = 0;
        assert!(matches!(
            no_units.validate(),
            Err(LedgerError::InvalidProperty { .. })
        ));

        let mut no_suburb = property;
        no_suburb.suburb = "  ".into();
        assert!(matches!(
            no_suburb.validate(),
            Err(LedgerError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn test_change_holding_creates_entry() {
        let mut account = Account::new("alice");
        assert_eq!(account.change_holding("p1", 50).unwrap(), 50);
        assert_eq!(account.change_holding("p1", -20).unwrap(), 30);
        assert_eq!(account.holdings.len(), 1);
        assert_eq!(account.units_of("p1"), 30);
    }

    #[test]
    fn test_change_holding_rejects_negative_and_leaves_account_unmodified() {
        let mut account = Account::new("alice");
        account.change_holding("p1", 10).unwrap();
        let before = account.clone();

        let err = account.change_holding("p1", -11).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientUnits {
                available: 10,
                requested: -11,
                ..
            }
        ));
        assert_eq!(account, before);

        // No zero entry is left behind for an unknown entity either.
        assert!(account.change_holding("p2", -1).is_err());
        assert_eq!(account, before);
    }

    #[test]
    fn test_change_holding_overflow() {
        let mut account = Account::new("alice");
        account.holdings.push(Holding {
            entity: "p1".into(),
            units: u64::MAX,
        });
        assert!(matches!(
            account.change_holding("p1", 1),
            Err(LedgerError::UnitOverflow { .. })
        ));
        assert_eq!(account.units_of("p1"), u64::MAX);
    }

    #[test]
    fn test_withdraw_never_overdraws() {
        let mut account = Account::new("alice");
        account.deposit(amount("1000")).unwrap();

        let err = account.withdraw(amount("1500")).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(account.cash, amount("1000"));

        assert_eq!(account.withdraw(amount("400")).unwrap(), amount("600"));
    }

    #[test]
    fn test_synthetic_account_mirrors_issuer() {
        let mut property = oakwood_property("cardy", 10_000);
        property.id = "abc".into();
        let synthetic = Account::synthetic(&property);
        assert_eq!(synthetic.id, "abc");
        assert_eq!(synthetic.cash, Decimal::ZERO);
        assert_eq!(
            synthetic.holdings,
            vec![Holding {
                entity: "cardy".into(),
                units: 10_000
            }]
        );
    }

    #[test]
    fn test_trade_validation() {
        let trade = Trade {
            id: String::new(),
            account_id: "alice".into(),
            property_id: "p1".into(),
            direction: Direction::Buy,
            price: amount("100"),
            units: 10,
            escrow: Decimal::ZERO,
        };
        assert!(trade.validate().is_ok());
        assert_eq!(trade.notional().unwrap(), amount("1000"));

        let mut bad = trade.clone();
        bad.units = 0;
        assert!(bad.validate().is_err());

        let mut bad = trade;
        bad.price = amount("-1");
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_trade_map_keeps_first_trade_for_an_id() {
        let first = Trade {
            id: "t1".into(),
            account_id: "alice".into(),
            property_id: "p1".into(),
            direction: Direction::Buy,
            price: amount("100"),
            units: 10,
            escrow: Decimal::ZERO,
        };
        let mut map = TradeMap::new();
        assert!(map.insert(first.clone()));

        let mut second = first.clone();
        second.property_id = "p2".into();
        second.units = 5;
        assert!(!map.insert(second));

        assert_eq!(map.len(), 1);
        assert_eq!(map.trades().next(), Some(&first));
    }

    #[test]
    fn test_property_json_uses_camel_case() {
        let property = oakwood_property("cardy", 10_000);
        let json = serde_json::to_value(&property).unwrap();
        assert_eq!(json["addressLine"], "30 Oakwood St");
        assert_eq!(json["postCode"], "2232");
        assert_eq!(json["status"], "Proposed");
    }

    #[test]
    fn test_role_codes() {
        for role in [
            Role::MarketMaker,
            Role::Manager,
            Role::PrivateEntity,
            Role::Exchange,
        ] {
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
        assert_eq!(Role::from_code(4), None);
    }
}
