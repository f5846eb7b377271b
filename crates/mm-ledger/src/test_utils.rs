use crate::domain::config::LedgerConfig;
use crate::domain::entities::{Property, PropertyStatus, Trade};
use crate::domain::value_objects::{Amount, Direction};
use crate::service::LedgerService;
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn amount(raw: &str) -> Amount {
    Decimal::from_str(raw).unwrap()
}

/// "30 Oakwood St, Sutherland, NSW, 2232", unassigned id.
pub fn oakwood_property(issuer: &str, units: u64) -> Property {
    property_at("30 Oakwood St", issuer, units)
}

pub fn property_at(address_line: &str, issuer: &str, units: u64) -> Property {
    Property {
        id: String::new(),
        address_line: address_line.into(),
        suburb: "Sutherland".into(),
        state: "NSW".into(),
        post_code: "2232".into(),
        managed_by: String::new(),
        issuer: issuer.into(),
        units,
        status: PropertyStatus::Proposed,
    }
}

pub fn trade(id: &str, property_id: &str, direction: Direction, units: u64, price: &str) -> Trade {
    Trade {
        id: id.into(),
        account_id: "trader".into(),
        property_id: property_id.into(),
        direction,
        price: amount(price),
        units,
        escrow: Decimal::ZERO,
    }
}

pub fn ledger() -> LedgerService {
    LedgerService::new_in_memory(LedgerConfig::default())
}

/// Ledger with `issuer` funded and the Oakwood property issued.
///
/// Returns the ledger and the property id.
pub fn ledger_with_oakwood(issuer: &str, units: u64) -> (LedgerService, String) {
    use crate::ports::inbound::LedgerApi;

    let mut ledger = ledger();
    ledger.create_account(issuer).unwrap();
    let property = ledger
        .issue_property(oakwood_property(issuer, units))
        .unwrap();
    (ledger, property.id)
}
