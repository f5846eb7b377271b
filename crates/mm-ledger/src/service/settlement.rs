//! # Settlement
//!
//! The one place units change hands after issuance. A settlement is staged
//! as a whole into the caller's change-set:
//!
//! 1. `-units` on the seller's holding, `+units` on the buyer's
//! 2. the same move between their entries in the synthetic property account
//! 3. `units * price` cash from buyer to seller
//! 4. the resulting trade filed under both trade indexes
//!
//! Any failure aborts before the change-set is committed.

use super::*;
use crate::domain::entities::{Settlement, Trade};
use crate::domain::errors::EntityKind;
use crate::domain::value_objects::Direction;
use rust_decimal::Decimal;
use uuid::Uuid;

impl<KV, RS> LedgerService<KV, RS>
where
    KV: KeyValueStore,
    RS: RecordSerializer,
{
    pub(crate) fn stage_settlement(
        &self,
        changes: &mut ChangeSet,
        settlement: &Settlement,
    ) -> Result<Trade, LedgerError> {
        let property_id = settlement.property_id.as_str();

        if settlement.units == 0 {
            return Err(LedgerError::InvalidTrade {
                reason: "settlement units must be greater than zero".into(),
            });
        }
        if settlement.price.is_sign_negative() && !settlement.price.is_zero() {
            return Err(LedgerError::InvalidTrade {
                reason: format!("negative price {}", settlement.price),
            });
        }
        if settlement.seller == settlement.buyer {
            return Err(LedgerError::InvalidTrade {
                reason: format!("{} cannot trade with itself", settlement.seller),
            });
        }
        if settlement.seller == property_id || settlement.buyer == property_id {
            return Err(LedgerError::InvalidTrade {
                reason: "the synthetic property account cannot trade".into(),
            });
        }

        self.require_tradable_property(changes, property_id)?;
        let delta = i64::try_from(settlement.units).map_err(|_| LedgerError::UnitOverflow {
            entity: property_id.to_string(),
        })?;

        let mut seller = self.require_participant(changes, &settlement.seller)?;
        let mut buyer = self.require_participant(changes, &settlement.buyer)?;
        let mut synthetic = self
            .load_account(changes, property_id)?
            .ok_or_else(|| LedgerError::not_found(EntityKind::Account, property_id))?;

        seller.change_holding(property_id, -delta)?;
        buyer.change_holding(property_id, delta)?;
        synthetic.change_holding(&settlement.seller, -delta)?;
        synthetic.change_holding(&settlement.buyer, delta)?;

        let value = settlement.value()?;
        buyer.withdraw(value)?;
        seller.deposit(value)?;

        self.stage_account(changes, &seller)?;
        self.stage_account(changes, &buyer)?;
        self.stage_account(changes, &synthetic)?;

        let trade = Trade {
            id: Uuid::new_v4().to_string(),
            account_id: buyer.id.clone(),
            property_id: property_id.to_string(),
            direction: Direction::Buy,
            price: settlement.price,
            units: settlement.units,
            escrow: Decimal::ZERO,
        };
        self.file_trade(changes, &trade)?;

        Ok(trade)
    }
}
