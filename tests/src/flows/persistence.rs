//! # Persistence Flows
//!
//! Ledger state written through the snapshot-file store must survive a
//! restart, and a failed operation must not leave anything behind on disk.

#[cfg(test)]
mod tests {
    use crate::fixtures::{amount, args, decode, handler_over, issue};
    use mm_ledger::adapters::FileBackedKVStore;
    use mm_ledger::domain::config::LedgerConfig;
    use mm_ledger::domain::entities::{Account, Property, ReturnTrade};
    use mm_ledger::ports::inbound::LedgerApi;
    use serde_json::json;
    use std::path::Path;

    fn open(path: &Path) -> mm_ledger::dispatch::LedgerHandler<
        mm_ledger::service::LedgerService<FileBackedKVStore>,
    > {
        let store = FileBackedKVStore::open(path).unwrap();
        handler_over(store, LedgerConfig::default())
    }

    #[test]
    fn test_state_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.snapshot");

        let property_id = {
            let mut handler = open(&path);
            handler.invoke("createAccount", &args(&["cardy"])).unwrap();
            handler.invoke("createAccount", &args(&["alice"])).unwrap();
            handler
                .invoke("depositCash", &args(&["alice", "1000.50"]))
                .unwrap();
            let property = issue(&mut handler, "30 Oakwood St", "cardy", 10_000);
            handler
                .invoke(
                    "createTrade",
                    &[json!({
                        "id": "t1",
                        "accountId": "alice",
                        "propertyId": property.id,
                        "direction": "Sell",
                        "price": "99.95",
                        "units": 4,
                    })
                    .to_string()],
                )
                .unwrap();
            property.id
        };

        let handler = open(&path);
        let alice: Account = decode(&handler.query("getAccount", &args(&["alice"])).unwrap());
        assert_eq!(alice.cash, amount("1000.50"));

        let properties: Vec<Property> =
            decode(&handler.query("getProperties", &args(&[property_id.as_str()])).unwrap());
        assert_eq!(properties[0].units, 10_000);

        let quotes: Vec<ReturnTrade> =
            decode(&handler.query("getAvailableTrades", &[]).unwrap());
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].price, amount("99.95"));

        assert!(handler.ledger().audit_property(&property_id).unwrap().is_valid());
    }

    #[test]
    fn test_rejected_operation_leaves_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.snapshot");

        {
            let mut handler = open(&path);
            handler.invoke("createAccount", &args(&["alice"])).unwrap();
            handler
                .invoke("depositCash", &args(&["alice", "1000"]))
                .unwrap();
        }
        let before = std::fs::read(&path).unwrap();

        {
            let mut handler = open(&path);
            let err = handler
                .invoke("withdrawCash", &args(&["alice", "1500"]))
                .unwrap_err();
            assert_eq!(err.kind(), "InsufficientFunds");

            // Unknown issuer: nothing of the property may be written.
            let err = handler
                .invoke(
                    "issueProperty",
                    &[crate::fixtures::property_json("1 Nowhere Rd", "ghost", 5)],
                )
                .unwrap_err();
            assert_eq!(err.kind(), "UnknownAccount");
        }

        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}
