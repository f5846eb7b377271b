//! # Inbound Ports (Driving Ports)
//!
//! The primary API of the ledger engine.

use crate::domain::entities::{Account, Offer, Property, ReturnTrade, Settlement, Trade};
use crate::domain::errors::LedgerError;
use crate::domain::invariants::InvariantCheckResult;
use crate::domain::value_objects::Amount;

/// Primary API of the ledger engine.
///
/// Every mutation re-reads the records it needs, applies the change and
/// commits all touched records as one atomic batch. Nothing is cached
/// between calls.
pub trait LedgerApi {
    // -------------------------------------------------------------------------
    // Issuance & lifecycle
    // -------------------------------------------------------------------------

    /// Issue a property and credit its whole supply to the issuer.
    ///
    /// Writes the property, the issuer account, the synthetic property
    /// account and the trading registry in one batch.
    ///
    /// ## Errors
    ///
    /// - `InvalidProperty`: empty address fields or zero units
    /// - `AlreadyAssigned`: payload already carries an id
    /// - `DuplicateProperty`: address already issued
    /// - `UnknownAccount`: issuer account does not exist
    fn issue_property(&mut self, property: Property) -> Result<Property, LedgerError>;

    /// Mark a property reclaimed and drop it from the trading registry.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no such property
    /// - `PropertyNotTradable`: already reclaimed
    fn reclaim_property(&mut self, property_id: &str) -> Result<Property, LedgerError>;

    // -------------------------------------------------------------------------
    // Accounts & cash
    // -------------------------------------------------------------------------

    /// Create an empty active account.
    ///
    /// ## Errors
    ///
    /// - `AlreadyExists`: an account is stored under this id
    fn create_account(&mut self, account_id: &str) -> Result<Account, LedgerError>;

    /// Credit cash.
    ///
    /// ## Errors
    ///
    /// - `UnknownAccount`, `InvalidAmount`
    fn deposit_cash(&mut self, account_id: &str, amount: Amount) -> Result<Account, LedgerError>;

    /// Debit cash; never overdraws.
    ///
    /// ## Errors
    ///
    /// - `UnknownAccount`, `InvalidAmount`
    /// - `InsufficientFunds`: balance below `amount` (balance unchanged)
    fn withdraw_cash(&mut self, account_id: &str, amount: Amount) -> Result<Account, LedgerError>;

    // -------------------------------------------------------------------------
    // Trades, offers & settlement
    // -------------------------------------------------------------------------

    /// File a trade record under both trade indexes. Moves no units.
    fn create_trade(&mut self, trade: Trade) -> Result<Trade, LedgerError>;

    /// Persist a sell offer for `units` of a property.
    ///
    /// Price falls back to the current volume-weighted quote, then zero.
    fn generate_offer(
        &mut self,
        property_id: &str,
        units: u64,
        price: Option<Amount>,
    ) -> Result<Offer, LedgerError>;

    /// Fill an offer for `account_id` through the configured matcher.
    ///
    /// ## Errors
    ///
    /// - `MatchingUnavailable`: matching disabled
    /// - any settlement error
    fn accept_offer(&mut self, offer_id: &str, account_id: &str) -> Result<Trade, LedgerError>;

    /// Atomically move units seller -> buyer and cash buyer -> seller.
    ///
    /// ## Errors
    ///
    /// - `InsufficientUnits`: seller holds fewer than `units`
    /// - `InsufficientFunds`: buyer cannot pay `units * price`
    fn settle(&mut self, settlement: Settlement) -> Result<Trade, LedgerError>;

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    fn get_account(&self, account_id: &str) -> Result<Account, LedgerError>;

    fn get_property(&self, property_id: &str) -> Result<Property, LedgerError>;

    /// Load properties in argument order, failing fast on the first miss.
    fn get_properties(&self, property_ids: &[String]) -> Result<Vec<Property>, LedgerError>;

    /// Trades filed against an account, in trade id order.
    fn get_open_trades_by_account(&self, account_id: &str) -> Result<Vec<Trade>, LedgerError>;

    /// Trades filed against a property, in trade id order.
    fn get_trades_by_property(&self, property_id: &str) -> Result<Vec<Trade>, LedgerError>;

    /// One volume-weighted quote per registered property, ordered by
    /// property id. Properties with zero traded units are omitted.
    fn get_available_trades(&self) -> Result<Vec<ReturnTrade>, LedgerError>;

    fn get_offer(&self, offer_id: &str) -> Result<Offer, LedgerError>;

    /// Verify conservation and mirror invariants for one property.
    fn audit_property(&self, property_id: &str) -> Result<InvariantCheckResult, LedgerError>;
}
