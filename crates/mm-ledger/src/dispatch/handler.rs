//! Routes named operations to a [`LedgerApi`] and encodes the results.

use super::{InvocationKind, Operation};
use crate::domain::entities::{Account, Property, Role, Trade};
use crate::domain::errors::{LedgerError, SerializationError};
use crate::domain::value_objects::parse_amount;
use crate::ports::inbound::LedgerApi;
use crate::ports::outbound::IdentityResolver;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Response of `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub account: Account,
    pub role: Role,
}

/// Dispatcher over a ledger engine.
///
/// Every response is the JSON encoding of the operation's result.
pub struct LedgerHandler<L: LedgerApi> {
    ledger: L,
    identity: Box<dyn IdentityResolver>,
}

impl<L: LedgerApi> LedgerHandler<L> {
    pub fn new(ledger: L, identity: Box<dyn IdentityResolver>) -> Self {
        Self { ledger, identity }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn into_ledger(self) -> L {
        self.ledger
    }

    /// Dispatch to the side named by `kind`.
    pub fn handle(
        &mut self,
        kind: InvocationKind,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, LedgerError> {
        match kind {
            InvocationKind::Invoke => self.invoke(function, args),
            InvocationKind::Query => self.query(function, args),
        }
    }

    /// Run a mutating operation.
    pub fn invoke(&mut self, function: &str, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        let op = Operation::parse(InvocationKind::Invoke, function)?;
        op.check_args(args)?;
        debug!(operation = %op, args = args.len(), "invoke");

        match op {
            Operation::IssueProperty => {
                let property: Property = decode_arg(&args[0])?;
                encode(&self.ledger.issue_property(property)?)
            }
            Operation::CreateAccount => encode(&self.ledger.create_account(&args[0])?),
            Operation::DepositCash => {
                let amount = parse_amount(&args[1])?;
                encode(&self.ledger.deposit_cash(&args[0], amount)?)
            }
            Operation::WithdrawCash => {
                let amount = parse_amount(&args[1])?;
                encode(&self.ledger.withdraw_cash(&args[0], amount)?)
            }
            Operation::CreateTrade => {
                let trade: Trade = decode_arg(&args[0])?;
                encode(&self.ledger.create_trade(trade)?)
            }
            Operation::GenerateOffer => {
                let units = parse_units(&args[1])?;
                let price = args.get(2).map(|raw| parse_amount(raw)).transpose()?;
                encode(&self.ledger.generate_offer(&args[0], units, price)?)
            }
            Operation::AcceptOffer => encode(&self.ledger.accept_offer(&args[0], &args[1])?),
            Operation::ReclaimProperty => encode(&self.ledger.reclaim_property(&args[0])?),
            _ => Err(LedgerError::InvalidOperation {
                name: function.to_string(),
            }),
        }
    }

    /// Run a read-only operation.
    pub fn query(&self, function: &str, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        let op = Operation::parse(InvocationKind::Query, function)?;
        op.check_args(args)?;
        debug!(operation = %op, args = args.len(), "query");

        match op {
            Operation::Login => {
                let account = self.ledger.get_account(&args[0])?;
                let role = self.identity.resolve_role(&account.id)?;
                encode(&LoginResponse { account, role })
            }
            Operation::GetAccount => encode(&self.ledger.get_account(&args[0])?),
            Operation::GetProperties => encode(&self.ledger.get_properties(args)?),
            Operation::GetOpenTradesByAccount => {
                encode(&self.ledger.get_open_trades_by_account(&args[0])?)
            }
            Operation::GetAvailableTrades => encode(&self.ledger.get_available_trades()?),
            Operation::GetOffer => encode(&self.ledger.get_offer(&args[0])?),
            _ => Err(LedgerError::InvalidOperation {
                name: function.to_string(),
            }),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(value).map_err(|e| SerializationError::new(e.to_string()).into())
}

fn decode_arg<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T, LedgerError> {
    serde_json::from_str(raw).map_err(|e| SerializationError::new(e.to_string()).into())
}

fn parse_units(raw: &str) -> Result<u64, LedgerError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| LedgerError::InvalidTrade {
            reason: format!("units must be a non-negative integer, got {raw:?}"),
        })
}
