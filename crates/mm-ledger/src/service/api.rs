//! # Ledger API Implementation
//!
//! Implements the `LedgerApi` trait.

use super::*;
use crate::domain::entities::{
    Account, Offer, Property, PropertyStatus, ReturnTrade, Settlement, Trade,
};
use crate::domain::errors::EntityKind;
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::services::{aggregate_trades, assign_property_id};
use crate::domain::value_objects::{Amount, Direction, KeyPrefix};
use crate::ports::inbound::LedgerApi;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

impl<KV, RS> LedgerApi for LedgerService<KV, RS>
where
    KV: KeyValueStore,
    RS: RecordSerializer,
{
    #[instrument(skip(self, property), fields(issuer = %property.issuer, units = property.units))]
    fn issue_property(&mut self, mut property: Property) -> Result<Property, LedgerError> {
        property.validate()?;
        assign_property_id(&mut property)?;
        let id = property.id.clone();

        let mut changes = ChangeSet::new();

        if self.load_property(&changes, &id)?.is_some() {
            warn!(property_id = %id, "property already issued");
            return Err(LedgerError::DuplicateProperty { id });
        }
        let mut issuer = self.require_participant(&changes, &property.issuer)?;
        if self.load_account(&changes, &id)?.is_some() {
            warn!(property_id = %id, "synthetic account already present");
            return Err(LedgerError::DuplicateProperty { id });
        }

        property.status = PropertyStatus::Managed;
        self.stage(&mut changes, KeyPrefix::property_key(&id), &property)?;

        let supply = i64::try_from(property.units).map_err(|_| LedgerError::UnitOverflow {
            entity: id.clone(),
        })?;
        issuer.change_holding(&id, supply)?;
        self.stage_account(&mut changes, &issuer)?;

        self.stage_account(&mut changes, &Account::synthetic(&property))?;

        let mut registry = self.load_registry(&changes)?;
        registry.insert(id.clone());
        self.stage(&mut changes, KeyPrefix::trading_properties_key(), &registry)?;

        self.commit(changes)?;
        info!(property_id = %id, "property issued");
        Ok(property)
    }

    #[instrument(skip(self))]
    fn reclaim_property(&mut self, property_id: &str) -> Result<Property, LedgerError> {
        let mut changes = ChangeSet::new();
        let mut property = self.require_property(&changes, property_id)?;
        if property.status == PropertyStatus::Reclaimed {
            warn!("property already reclaimed");
            return Err(LedgerError::PropertyNotTradable {
                id: property_id.to_string(),
            });
        }

        property.status = PropertyStatus::Reclaimed;
        self.stage(&mut changes, KeyPrefix::property_key(property_id), &property)?;

        let mut registry = self.load_registry(&changes)?;
        registry.remove(property_id);
        self.stage(&mut changes, KeyPrefix::trading_properties_key(), &registry)?;

        self.commit(changes)?;
        info!("property reclaimed");
        Ok(property)
    }

    #[instrument(skip(self))]
    fn create_account(&mut self, account_id: &str) -> Result<Account, LedgerError> {
        if account_id.trim().is_empty() {
            return Err(LedgerError::InvalidAccount {
                reason: "account id must not be empty".into(),
            });
        }

        let mut changes = ChangeSet::new();
        if self.load_account(&changes, account_id)?.is_some() {
            warn!("account already exists");
            return Err(LedgerError::AlreadyExists {
                kind: EntityKind::Account,
                id: account_id.to_string(),
            });
        }

        let account = Account::new(account_id);
        self.stage_account(&mut changes, &account)?;
        self.commit(changes)?;
        info!("account created");
        Ok(account)
    }

    #[instrument(skip(self, amount), fields(amount = %amount))]
    fn deposit_cash(&mut self, account_id: &str, amount: Amount) -> Result<Account, LedgerError> {
        let mut changes = ChangeSet::new();
        let mut account = self.require_participant(&changes, account_id)?;
        account.deposit(amount)?;
        self.stage_account(&mut changes, &account)?;
        self.commit(changes)?;
        debug!(cash = %account.cash, "cash deposited");
        Ok(account)
    }

    #[instrument(skip(self, amount), fields(amount = %amount))]
    fn withdraw_cash(&mut self, account_id: &str, amount: Amount) -> Result<Account, LedgerError> {
        let mut changes = ChangeSet::new();
        let mut account = self.require_participant(&changes, account_id)?;
        account
            .withdraw(amount)
            .inspect_err(|e| warn!(error = %e, "withdrawal rejected"))?;
        self.stage_account(&mut changes, &account)?;
        self.commit(changes)?;
        debug!(cash = %account.cash, "cash withdrawn");
        Ok(account)
    }

    #[instrument(skip(self, trade), fields(property_id = %trade.property_id, account_id = %trade.account_id))]
    fn create_trade(&mut self, mut trade: Trade) -> Result<Trade, LedgerError> {
        trade.validate()?;

        let mut changes = ChangeSet::new();
        self.require_tradable_property(&changes, &trade.property_id)?;
        self.require_participant(&changes, &trade.account_id)?;

        if trade.id.is_empty() {
            trade.id = Uuid::new_v4().to_string();
        }
        self.file_trade(&mut changes, &trade)?;
        self.commit(changes)?;
        info!(trade_id = %trade.id, "trade filed");
        Ok(trade)
    }

    #[instrument(skip(self))]
    fn generate_offer(
        &mut self,
        property_id: &str,
        units: u64,
        price: Option<Amount>,
    ) -> Result<Offer, LedgerError> {
        if units == 0 {
            return Err(LedgerError::InvalidTrade {
                reason: "offer units must be greater than zero".into(),
            });
        }

        let mut changes = ChangeSet::new();
        self.require_tradable_property(&changes, property_id)?;

        let price = match price {
            Some(price) if price.is_sign_negative() && !price.is_zero() => {
                return Err(LedgerError::InvalidAmount {
                    value: price.to_string(),
                });
            }
            Some(price) => price,
            None => {
                let trades =
                    self.load_trade_map(&changes, &KeyPrefix::property_trades_key(property_id))?;
                aggregate_trades(property_id, &trades)?.map_or(Decimal::ZERO, |quote| quote.price)
            }
        };

        let offer = Offer {
            id: Uuid::new_v4().to_string(),
            property_id: property_id.to_string(),
            direction: Direction::Sell,
            price,
            units,
        };
        self.stage(&mut changes, KeyPrefix::offer_key(&offer.id), &offer)?;
        self.commit(changes)?;
        info!(offer_id = %offer.id, price = %offer.price, "offer generated");
        Ok(offer)
    }

    #[instrument(skip(self))]
    fn accept_offer(&mut self, offer_id: &str, account_id: &str) -> Result<Trade, LedgerError> {
        let mut changes = ChangeSet::new();
        let offer_key = KeyPrefix::offer_key(offer_id);
        let offer: Offer = self
            .load(&changes, &offer_key)?
            .ok_or_else(|| LedgerError::not_found(EntityKind::Offer, offer_id))?;
        let taker = self.require_participant(&changes, account_id)?;
        let property = self.require_tradable_property(&changes, &offer.property_id)?;

        let settlement = self
            .matcher
            .match_offer(&offer, &property, &taker)
            .inspect_err(|e| warn!(matcher = self.matcher.name(), error = %e, "offer not matched"))?;
        let trade = self
            .stage_settlement(&mut changes, &settlement)
            .inspect_err(|e| warn!(error = %e, "offer settlement rejected"))?;
        changes.delete(offer_key);

        self.commit(changes)?;
        info!(trade_id = %trade.id, "offer accepted");
        Ok(trade)
    }

    #[instrument(skip(self, settlement), fields(
        property_id = %settlement.property_id,
        seller = %settlement.seller,
        buyer = %settlement.buyer,
        units = settlement.units,
    ))]
    fn settle(&mut self, settlement: Settlement) -> Result<Trade, LedgerError> {
        let mut changes = ChangeSet::new();
        let trade = self
            .stage_settlement(&mut changes, &settlement)
            .inspect_err(|e| warn!(error = %e, "settlement rejected"))?;
        self.commit(changes)?;
        info!(trade_id = %trade.id, "settled");
        Ok(trade)
    }

    fn get_account(&self, account_id: &str) -> Result<Account, LedgerError> {
        self.load_account(&ChangeSet::new(), account_id)?
            .ok_or_else(|| LedgerError::not_found(EntityKind::Account, account_id))
    }

    fn get_property(&self, property_id: &str) -> Result<Property, LedgerError> {
        self.require_property(&ChangeSet::new(), property_id)
    }

    fn get_properties(&self, property_ids: &[String]) -> Result<Vec<Property>, LedgerError> {
        if property_ids.len() > self.config.max_query_ids {
            return Err(LedgerError::InvalidArgumentCount {
                operation: "getProperties".into(),
                expected: format!("at most {}", self.config.max_query_ids),
                actual: property_ids.len(),
            });
        }

        property_ids
            .iter()
            .map(|id| self.get_property(id))
            .collect()
    }

    fn get_open_trades_by_account(&self, account_id: &str) -> Result<Vec<Trade>, LedgerError> {
        let none = ChangeSet::new();
        if self.load_account(&none, account_id)?.is_none() {
            return Err(LedgerError::not_found(EntityKind::Account, account_id));
        }
        let trades = self.load_trade_map(&none, &KeyPrefix::account_trades_key(account_id))?;
        Ok(trades.trades().cloned().collect())
    }

    fn get_trades_by_property(&self, property_id: &str) -> Result<Vec<Trade>, LedgerError> {
        let none = ChangeSet::new();
        self.require_property(&none, property_id)?;
        let trades = self.load_trade_map(&none, &KeyPrefix::property_trades_key(property_id))?;
        Ok(trades.trades().cloned().collect())
    }

    fn get_available_trades(&self) -> Result<Vec<ReturnTrade>, LedgerError> {
        let none = ChangeSet::new();
        let registry = self.load_registry(&none)?;

        let mut quotes = Vec::new();
        for property_id in registry.iter() {
            let trades = self.load_trade_map(&none, &KeyPrefix::property_trades_key(property_id))?;
            if let Some(quote) = aggregate_trades(property_id, &trades)? {
                quotes.push(quote);
            }
        }
        Ok(quotes)
    }

    fn get_offer(&self, offer_id: &str) -> Result<Offer, LedgerError> {
        self.load(&ChangeSet::new(), &KeyPrefix::offer_key(offer_id))?
            .ok_or_else(|| LedgerError::not_found(EntityKind::Offer, offer_id))
    }

    #[instrument(skip(self))]
    fn audit_property(&self, property_id: &str) -> Result<InvariantCheckResult, LedgerError> {
        let property = self.get_property(property_id)?;
        let accounts = self.all_accounts()?;
        let synthetic = accounts.iter().find(|a| a.id == property.id);

        let result = check_all_invariants(&property, synthetic, &accounts);
        if let InvariantCheckResult::Invalid(violations) = &result {
            for violation in violations {
                warn!(%violation, "invariant violated");
            }
        }
        Ok(result)
    }
}
