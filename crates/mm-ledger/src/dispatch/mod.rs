//! # Operation Dispatch
//!
//! Named operations with positional string arguments, split into a
//! mutating invoke side and a read-only query side.
//!
//! | Invoke | Args | Query | Args |
//! |--------|------|-------|------|
//! | `issueProperty` | propertyJson | `login` | accountId |
//! | `createAccount` | accountId | `getAccount` | accountId |
//! | `depositCash` | accountId, amount | `getProperties` | id... |
//! | `withdrawCash` | accountId, amount | `getOpenTradesByAccount` | accountId |
//! | `createTrade` | tradeJson | `getAvailableTrades` | - |
//! | `generateOffer` | propertyId, units[, price] | `getOffer` | offerId |
//! | `acceptOffer` | offerId, accountId | | |
//! | `reclaimProperty` | propertyId | | |

mod handler;

pub use handler::{LedgerHandler, LoginResponse};

use crate::domain::errors::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the dispatcher an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationKind {
    Invoke,
    Query,
}

impl fmt::Display for InvocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationKind::Invoke => write!(f, "invoke"),
            InvocationKind::Query => write!(f, "query"),
        }
    }
}

/// Accepted number of positional arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    #[must_use]
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Between(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Between(min, max) => write!(f, "{min} to {max}"),
            Arity::AtLeast(min) => write!(f, "at least {min}"),
        }
    }
}

/// Every operation the dispatcher knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Invoke side
    IssueProperty,
    CreateAccount,
    DepositCash,
    WithdrawCash,
    CreateTrade,
    GenerateOffer,
    AcceptOffer,
    ReclaimProperty,
    // Query side
    Login,
    GetAccount,
    GetProperties,
    GetOpenTradesByAccount,
    GetAvailableTrades,
    GetOffer,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::IssueProperty,
        Operation::CreateAccount,
        Operation::DepositCash,
        Operation::WithdrawCash,
        Operation::CreateTrade,
        Operation::GenerateOffer,
        Operation::AcceptOffer,
        Operation::ReclaimProperty,
        Operation::Login,
        Operation::GetAccount,
        Operation::GetProperties,
        Operation::GetOpenTradesByAccount,
        Operation::GetAvailableTrades,
        Operation::GetOffer,
    ];

    /// Wire name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Operation::IssueProperty => "issueProperty",
            Operation::CreateAccount => "createAccount",
            Operation::DepositCash => "depositCash",
            Operation::WithdrawCash => "withdrawCash",
            Operation::CreateTrade => "createTrade",
            Operation::GenerateOffer => "generateOffer",
            Operation::AcceptOffer => "acceptOffer",
            Operation::ReclaimProperty => "reclaimProperty",
            Operation::Login => "login",
            Operation::GetAccount => "getAccount",
            Operation::GetProperties => "getProperties",
            Operation::GetOpenTradesByAccount => "getOpenTradesByAccount",
            Operation::GetAvailableTrades => "getAvailableTrades",
            Operation::GetOffer => "getOffer",
        }
    }

    #[must_use]
    pub fn kind(&self) -> InvocationKind {
        match self {
            Operation::IssueProperty
            | Operation::CreateAccount
            | Operation::DepositCash
            | Operation::WithdrawCash
            | Operation::CreateTrade
            | Operation::GenerateOffer
            | Operation::AcceptOffer
            | Operation::ReclaimProperty => InvocationKind::Invoke,
            Operation::Login
            | Operation::GetAccount
            | Operation::GetProperties
            | Operation::GetOpenTradesByAccount
            | Operation::GetAvailableTrades
            | Operation::GetOffer => InvocationKind::Query,
        }
    }

    #[must_use]
    pub fn arity(&self) -> Arity {
        match self {
            Operation::GetAvailableTrades => Arity::Exact(0),
            Operation::IssueProperty
            | Operation::CreateAccount
            | Operation::CreateTrade
            | Operation::ReclaimProperty
            | Operation::Login
            | Operation::GetAccount
            | Operation::GetOpenTradesByAccount
            | Operation::GetOffer => Arity::Exact(1),
            Operation::DepositCash | Operation::WithdrawCash | Operation::AcceptOffer => {
                Arity::Exact(2)
            }
            Operation::GenerateOffer => Arity::Between(2, 3),
            Operation::GetProperties => Arity::AtLeast(1),
        }
    }

    /// Resolve `name` on the given side.
    ///
    /// Unknown names, and names that belong to the other side, fail with
    /// `InvalidOperation`.
    pub fn parse(kind: InvocationKind, name: &str) -> Result<Self, LedgerError> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name && op.kind() == kind)
            .ok_or_else(|| LedgerError::InvalidOperation {
                name: name.to_string(),
            })
    }

    /// Fail with `InvalidArgumentCount` unless `args` fits the arity.
    pub fn check_args(&self, args: &[String]) -> Result<(), LedgerError> {
        let arity = self.arity();
        if arity.accepts(args.len()) {
            Ok(())
        } else {
            Err(LedgerError::InvalidArgumentCount {
                operation: self.name().to_string(),
                expected: arity.to_string(),
                actual: args.len(),
            })
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
