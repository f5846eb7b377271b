//! # Domain Services
//!
//! Stateless computations used by the engine.
//!
//! - Deterministic property ids (SHA-256 over the address, truncated to
//!   128 bits)
//! - Volume-weighted trade aggregation

use crate::domain::entities::{Property, ReturnTrade, TradeMap};
use crate::domain::errors::LedgerError;
use crate::domain::value_objects::{Amount, PropertyId};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

/// Length of a property id digest in bytes.
pub const PROPERTY_ID_BYTES: usize = 16;

/// Compute the deterministic id of a property.
///
/// Digest of `addressLine + suburb + state + postCode`; no other field
/// takes part, so re-issuing the same address yields the same id.
#[must_use]
pub fn compute_property_id(property: &Property) -> PropertyId {
    let mut hasher = Sha256::new();
    hasher.update(property.address_line.as_bytes());
    hasher.update(property.suburb.as_bytes());
    hasher.update(property.state.as_bytes());
    hasher.update(property.post_code.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..PROPERTY_ID_BYTES])
}

/// Assign the deterministic id to a freshly decoded property.
///
/// Fails with `AlreadyAssigned` if the payload already carries an id.
pub fn assign_property_id(property: &mut Property) -> Result<&PropertyId, LedgerError> {
    if !property.id.is_empty() {
        return Err(LedgerError::AlreadyAssigned {
            id: property.id.clone(),
        });
    }
    property.id = compute_property_id(property);
    Ok(&property.id)
}

/// Reduce the trades filed against one property into a market quote.
///
/// `units` is the sum of trade units and `price` the volume-weighted
/// average. `direction` comes from the first trade in id order; mixed
/// directions are not split. Returns `None` when the summed units are zero.
pub fn aggregate_trades(
    property_id: &str,
    trades: &TradeMap,
) -> Result<Option<ReturnTrade>, LedgerError> {
    let Some(first) = trades.trades().next() else {
        return Ok(None);
    };

    let mut units: u64 = 0;
    let mut weighted: Amount = Decimal::ZERO;
    for trade in trades.trades() {
        units = units
            .checked_add(trade.units)
            .ok_or_else(|| LedgerError::UnitOverflow {
                entity: property_id.to_string(),
            })?;
        weighted = weighted
            .checked_add(trade.notional()?)
            .ok_or_else(|| LedgerError::AmountOverflow {
                context: format!("aggregate of {property_id}"),
            })?;
    }

    if units == 0 {
        return Ok(None);
    }

    let price = weighted
        .checked_div(Decimal::from(units))
        .ok_or_else(|| LedgerError::AmountOverflow {
            context: format!("aggregate of {property_id}"),
        })?
        .normalize();

    Ok(Some(ReturnTrade {
        property_id: property_id.to_string(),
        direction: first.direction,
        price,
        units,
    }))
}
