//! # Ledger Service - Helper Methods
//!
//! Record loading, staging and commit plumbing shared by the operations.

use super::*;
use crate::domain::entities::{Account, Property, Trade, TradeMap, TradingProperties};
use crate::domain::errors::EntityKind;
use crate::domain::value_objects::KeyPrefix;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

impl<KV, RS> LedgerService<KV, RS>
where
    KV: KeyValueStore,
    RS: RecordSerializer,
{
    // -------------------------------------------------------------------------
    // Raw access
    // -------------------------------------------------------------------------

    /// Read a key, preferring what `changes` has staged.
    pub(crate) fn read_raw(
        &self,
        changes: &ChangeSet,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>, LedgerError> {
        match changes.staged(key) {
            Some(staged) => Ok(staged.map(<[u8]>::to_vec)),
            None => Ok(self.kv_store.get(key)?),
        }
    }

    pub(crate) fn load<T: DeserializeOwned>(
        &self,
        changes: &ChangeSet,
        key: &[u8],
    ) -> Result<Option<T>, LedgerError> {
        match self.read_raw(changes, key)? {
            Some(bytes) => Ok(Some(self.serializer.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn stage<T: Serialize>(
        &self,
        changes: &mut ChangeSet,
        key: Vec<u8>,
        record: &T,
    ) -> Result<(), LedgerError> {
        let bytes = self.serializer.serialize(record)?;
        changes.put(key, bytes);
        Ok(())
    }

    /// Write every staged change as one atomic batch.
    pub(crate) fn commit(&mut self, changes: ChangeSet) -> Result<(), LedgerError> {
        if changes.is_empty() {
            return Ok(());
        }
        let count = changes.len();
        self.kv_store.atomic_batch_write(changes.into_operations())?;
        debug!(records = count, "change-set committed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Typed records
    // -------------------------------------------------------------------------

    pub(crate) fn load_account(
        &self,
        changes: &ChangeSet,
        id: &str,
    ) -> Result<Option<Account>, LedgerError> {
        self.load(changes, &KeyPrefix::account_key(id))
    }

    /// Participant account that must exist (`UnknownAccount` otherwise).
    ///
    /// Synthetic property accounts share the `account:` keyspace but only
    /// mirror unit attribution, so they are rejected with `InvalidAccount`.
    pub(crate) fn require_participant(
        &self,
        changes: &ChangeSet,
        id: &str,
    ) -> Result<Account, LedgerError> {
        let account = self
            .load_account(changes, id)?
            .ok_or_else(|| LedgerError::UnknownAccount { id: id.to_string() })?;
        if self.load_property(changes, id)?.is_some() {
            return Err(LedgerError::InvalidAccount {
                reason: format!("{id} is a synthetic property account"),
            });
        }
        Ok(account)
    }

    pub(crate) fn stage_account(
        &self,
        changes: &mut ChangeSet,
        account: &Account,
    ) -> Result<(), LedgerError> {
        self.stage(changes, KeyPrefix::account_key(&account.id), account)
    }

    pub(crate) fn load_property(
        &self,
        changes: &ChangeSet,
        id: &str,
    ) -> Result<Option<Property>, LedgerError> {
        self.load(changes, &KeyPrefix::property_key(id))
    }

    pub(crate) fn require_property(
        &self,
        changes: &ChangeSet,
        id: &str,
    ) -> Result<Property, LedgerError> {
        self.load_property(changes, id)?
            .ok_or_else(|| LedgerError::not_found(EntityKind::Property, id))
    }

    /// Property that exists and may take new trades.
    pub(crate) fn require_tradable_property(
        &self,
        changes: &ChangeSet,
        id: &str,
    ) -> Result<Property, LedgerError> {
        let property = self.require_property(changes, id)?;
        if !property.is_tradable() && !self.config.allow_reclaimed_trading {
            return Err(LedgerError::PropertyNotTradable { id: id.to_string() });
        }
        Ok(property)
    }

    pub(crate) fn load_registry(
        &self,
        changes: &ChangeSet,
    ) -> Result<TradingProperties, LedgerError> {
        Ok(self
            .load(changes, &KeyPrefix::trading_properties_key())?
            .unwrap_or_default())
    }

    pub(crate) fn load_trade_map(
        &self,
        changes: &ChangeSet,
        key: &[u8],
    ) -> Result<TradeMap, LedgerError> {
        Ok(self.load(changes, key)?.unwrap_or_default())
    }

    /// Stage `trade` into the per-property and per-account indexes.
    pub(crate) fn file_trade(
        &self,
        changes: &mut ChangeSet,
        trade: &Trade,
    ) -> Result<(), LedgerError> {
        let by_property_key = KeyPrefix::property_trades_key(&trade.property_id);
        let mut by_property = self.load_trade_map(changes, &by_property_key)?;
        if !by_property.insert(trade.clone()) {
            return Err(LedgerError::AlreadyExists {
                kind: EntityKind::Trade,
                id: trade.id.clone(),
            });
        }
        self.stage(changes, by_property_key, &by_property)?;

        let by_account_key = KeyPrefix::account_trades_key(&trade.account_id);
        let mut by_account = self.load_trade_map(changes, &by_account_key)?;
        if !by_account.insert(trade.clone()) {
            return Err(LedgerError::AlreadyExists {
                kind: EntityKind::Trade,
                id: trade.id.clone(),
            });
        }
        self.stage(changes, by_account_key, &by_account)
    }

    /// Every stored account, participants and synthetic ones alike.
    pub(crate) fn all_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        self.kv_store
            .prefix_scan(KeyPrefix::Account.as_str().as_bytes())?
            .into_iter()
            .map(|(_, bytes)| {
                self.serializer
                    .deserialize::<Account>(&bytes)
                    .map_err(LedgerError::from)
            })
            .collect()
    }
}
