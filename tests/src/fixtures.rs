//! Shared builders for test scenarios.

use mm_ledger::adapters::StaticIdentityResolver;
use mm_ledger::dispatch::LedgerHandler;
use mm_ledger::domain::config::LedgerConfig;
use mm_ledger::domain::entities::{Property, Role};
use mm_ledger::domain::value_objects::Amount;
use mm_ledger::ports::outbound::KeyValueStore;
use mm_ledger::service::{LedgerDependencies, LedgerService};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::str::FromStr;

/// Positional arguments from string slices.
pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Decimal literal.
pub fn amount(raw: &str) -> Amount {
    Amount::from_str(raw).unwrap()
}

/// JSON argument for `issueProperty`.
pub fn property_json(address_line: &str, issuer: &str, units: u64) -> String {
    json!({
        "addressLine": address_line,
        "suburb": "Sutherland",
        "state": "NSW",
        "postCode": "2232",
        "issuer": issuer,
        "units": units,
    })
    .to_string()
}

/// Decode a dispatcher response.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

/// Dispatcher over a fresh in-memory ledger.
pub fn in_memory_handler(config: LedgerConfig) -> LedgerHandler<LedgerService> {
    handler_with(LedgerService::new_in_memory(config))
}

/// Dispatcher over an arbitrary store.
pub fn handler_over<KV: KeyValueStore>(
    store: KV,
    config: LedgerConfig,
) -> LedgerHandler<LedgerService<KV>> {
    let deps = LedgerDependencies::with_store(store, &config);
    handler_with(LedgerService::new(deps, config))
}

fn handler_with<KV: KeyValueStore>(ledger: LedgerService<KV>) -> LedgerHandler<LedgerService<KV>> {
    let identity = StaticIdentityResolver::with_default(Role::PrivateEntity)
        .with_role("cardy", Role::Manager)
        .with_role("exchange", Role::Exchange);
    LedgerHandler::new(ledger, Box::new(identity))
}

/// Issue a property through the dispatcher and return it.
pub fn issue<KV: KeyValueStore>(
    handler: &mut LedgerHandler<LedgerService<KV>>,
    address_line: &str,
    issuer: &str,
    units: u64,
) -> Property {
    let bytes = handler
        .invoke(
            "issueProperty",
            &[property_json(address_line, issuer, units)],
        )
        .unwrap();
    decode(&bytes)
}
