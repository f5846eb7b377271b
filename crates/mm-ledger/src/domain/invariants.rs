//! # Domain Invariants
//!
//! Conditions that must hold for every issued property after each committed
//! operation:
//!
//! - Unit conservation: participant holdings of a property sum to its supply
//! - Unique holdings: at most one holding entry per entity in an account
//! - Synthetic mirror: the property's synthetic account attributes exactly
//!   the units each participant holds
//!
//! Non-negativity is structural (`Holding::units` is unsigned and
//! `Account::change_holding` refuses negative results).

use crate::domain::entities::{Account, Property};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Sum of `entity == property.id` holdings across `accounts`.
///
/// Saturates instead of overflowing; a saturated sum never equals a valid
/// supply, so the conservation check still fails.
#[must_use]
pub fn units_held(property_id: &str, accounts: &[Account]) -> u64 {
    accounts
        .iter()
        .map(|a| a.units_of(property_id))
        .fold(0u64, u64::saturating_add)
}

/// Unit conservation: holdings of the property across all accounts equal
/// its fixed supply.
#[must_use]
pub fn check_unit_conservation_invariant(property: &Property, accounts: &[Account]) -> bool {
    units_held(&property.id, accounts) == property.units
}

/// Unique holdings: no entity appears twice in one account's holdings.
#[must_use]
pub fn check_unique_holdings_invariant(account: &Account) -> bool {
    let mut seen = BTreeSet::new();
    account.holdings.iter().all(|h| seen.insert(h.entity.as_str()))
}

/// Synthetic mirror: the synthetic account attributes to each holder the
/// units that holder owns, and its entries sum to the supply.
#[must_use]
pub fn check_synthetic_mirror_invariant(
    property: &Property,
    synthetic: &Account,
    accounts: &[Account],
) -> bool {
    let attributed = synthetic
        .holdings
        .iter()
        .map(|h| h.units)
        .fold(0u64, u64::saturating_add);
    if attributed != property.units {
        return false;
    }

    accounts
        .iter()
        .filter(|a| a.id != synthetic.id)
        .all(|a| synthetic.units_of(&a.id) == a.units_of(&property.id))
}

/// Check all invariants for one property.
///
/// `accounts` holds every participant account; the synthetic account may be
/// included or passed separately.
#[must_use]
pub fn check_all_invariants(
    property: &Property,
    synthetic: Option<&Account>,
    accounts: &[Account],
) -> InvariantCheckResult {
    let mut violations = Vec::new();

    let participants: Vec<Account> = accounts
        .iter()
        .filter(|a| a.id != property.id)
        .cloned()
        .collect();

    if !check_unit_conservation_invariant(property, &participants) {
        violations.push(InvariantViolation::UnitsNotConserved {
            property: property.id.clone(),
            supply: property.units,
            held: units_held(&property.id, &participants),
        });
    }

    for account in accounts {
        if !check_unique_holdings_invariant(account) {
            violations.push(InvariantViolation::DuplicateHolding {
                account: account.id.clone(),
            });
        }
    }

    match synthetic {
        Some(synthetic) => {
            if !check_unique_holdings_invariant(synthetic)
                && !accounts.iter().any(|a| a.id == synthetic.id)
            {
                violations.push(InvariantViolation::DuplicateHolding {
                    account: synthetic.id.clone(),
                });
            }
            if !check_synthetic_mirror_invariant(property, synthetic, &participants) {
                violations.push(InvariantViolation::SyntheticMismatch {
                    property: property.id.clone(),
                });
            }
        }
        None => violations.push(InvariantViolation::MissingSyntheticAccount {
            property: property.id.clone(),
        }),
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Result of an invariant audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantCheckResult {
    Valid,
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, InvariantCheckResult::Valid)
    }

    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        match self {
            InvariantCheckResult::Valid => &[],
            InvariantCheckResult::Invalid(v) => v,
        }
    }
}

/// A single invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    UnitsNotConserved {
        property: String,
        supply: u64,
        held: u64,
    },
    DuplicateHolding {
        account: String,
    },
    SyntheticMismatch {
        property: String,
    },
    MissingSyntheticAccount {
        property: String,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnitsNotConserved {
                property,
                supply,
                held,
            } => write!(
                f,
                "units of {property} not conserved: supply {supply}, held {held}"
            ),
            Self::DuplicateHolding { account } => {
                write!(f, "account {account} has duplicate holding entries")
            }
            Self::SyntheticMismatch { property } => {
                write!(f, "synthetic account of {property} does not mirror holdings")
            }
            Self::MissingSyntheticAccount { property } => {
                write!(f, "synthetic account of {property} is missing")
            }
        }
    }
}
