//! # Dispatcher Flows
//!
//! Market scenarios driven only through operation names and string
//! arguments, the way an external caller sees the ledger.

#[cfg(test)]
mod tests {
    use crate::fixtures::{amount, args, decode, in_memory_handler, issue};
    use mm_ledger::dispatch::LoginResponse;
    use mm_ledger::domain::config::{LedgerConfig, MatchingMode};
    use mm_ledger::domain::entities::{
        Account, Offer, Property, PropertyStatus, ReturnTrade, Role, Trade,
    };
    use mm_ledger::domain::value_objects::Direction;
    use mm_ledger::ports::inbound::LedgerApi;
    use serde_json::json;

    fn trade_json(id: &str, account: &str, property: &str, units: u64, price: &str) -> String {
        json!({
            "id": id,
            "accountId": account,
            "propertyId": property,
            "direction": "Buy",
            "price": price,
            "units": units,
        })
        .to_string()
    }

    // =========================================================================
    // ISSUANCE AND QUOTES
    // =========================================================================

    #[test]
    fn test_issue_trade_and_quote() {
        let mut handler = in_memory_handler(LedgerConfig::default());
        for id in ["cardy", "alice", "bob"] {
            handler.invoke("createAccount", &args(&[id])).unwrap();
        }

        let property = issue(&mut handler, "30 Oakwood St", "cardy", 10_000);
        assert_eq!(property.status, PropertyStatus::Managed);
        assert_eq!(property.id.len(), 32);

        let cardy: Account = decode(&handler.query("getAccount", &args(&["cardy"])).unwrap());
        assert_eq!(cardy.units_of(&property.id), 10_000);

        handler
            .invoke(
                "createTrade",
                &[trade_json("t1", "alice", &property.id, 10, "100")],
            )
            .unwrap();
        handler
            .invoke(
                "createTrade",
                &[trade_json("t2", "bob", &property.id, 30, "120")],
            )
            .unwrap();

        let quotes: Vec<ReturnTrade> =
            decode(&handler.query("getAvailableTrades", &[]).unwrap());
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].property_id, property.id);
        assert_eq!(quotes[0].direction, Direction::Buy);
        assert_eq!(quotes[0].units, 40);
        assert_eq!(quotes[0].price, amount("115"));

        let alice_trades: Vec<Trade> =
            decode(&handler.query("getOpenTradesByAccount", &args(&["alice"])).unwrap());
        assert_eq!(alice_trades.len(), 1);
        assert_eq!(alice_trades[0].id, "t1");

        // Filing trades moves no units.
        let cardy: Account = decode(&handler.query("getAccount", &args(&["cardy"])).unwrap());
        assert_eq!(cardy.units_of(&property.id), 10_000);
    }

    #[test]
    fn test_duplicate_issue_is_rejected() {
        let mut handler = in_memory_handler(LedgerConfig::default());
        handler.invoke("createAccount", &args(&["cardy"])).unwrap();
        issue(&mut handler, "30 Oakwood St", "cardy", 100);

        let err = handler
            .invoke(
                "issueProperty",
                &[crate::fixtures::property_json("30 Oakwood St", "cardy", 100)],
            )
            .unwrap_err();
        assert_eq!(err.kind(), "DuplicateProperty");

        let cardy: Account = decode(&handler.query("getAccount", &args(&["cardy"])).unwrap());
        assert_eq!(cardy.holdings.len(), 1);
    }

    #[test]
    fn test_get_properties_respects_limit() {
        let mut handler = in_memory_handler(LedgerConfig::default().with_max_query_ids(2));
        handler.invoke("createAccount", &args(&["cardy"])).unwrap();
        let a = issue(&mut handler, "1 First Ave", "cardy", 10);
        let b = issue(&mut handler, "2 Second Ave", "cardy", 20);

        let found: Vec<Property> = decode(
            &handler
                .query("getProperties", &args(&[b.id.as_str(), a.id.as_str()]))
                .unwrap(),
        );
        assert_eq!(found, vec![b.clone(), a.clone()]);

        let err = handler
            .query("getProperties", &args(&[a.id.as_str(), b.id.as_str(), a.id.as_str()]))
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidArgumentCount");

        let err = handler
            .query("getProperties", &args(&[a.id.as_str(), "missing"]))
            .unwrap_err();
        assert_eq!(err.kind(), "NotFound");
    }

    // =========================================================================
    // OFFERS
    // =========================================================================

    #[test]
    fn test_offer_accepted_against_issuer() {
        let config = LedgerConfig::default().with_matching(MatchingMode::Issuer);
        let mut handler = in_memory_handler(config);
        handler.invoke("createAccount", &args(&["cardy"])).unwrap();
        handler.invoke("createAccount", &args(&["bob"])).unwrap();
        handler
            .invoke("depositCash", &args(&["bob", "500"]))
            .unwrap();
        let property = issue(&mut handler, "30 Oakwood St", "cardy", 1_000);

        let offer: Offer = decode(
            &handler
                .invoke("generateOffer", &args(&[property.id.as_str(), "10", "12.5"]))
                .unwrap(),
        );
        assert_eq!(offer.direction, Direction::Sell);

        let trade: Trade = decode(
            &handler
                .invoke("acceptOffer", &args(&[offer.id.as_str(), "bob"]))
                .unwrap(),
        );
        assert_eq!(trade.account_id, "bob");
        assert_eq!(trade.units, 10);

        let bob: Account = decode(&handler.query("getAccount", &args(&["bob"])).unwrap());
        let cardy: Account = decode(&handler.query("getAccount", &args(&["cardy"])).unwrap());
        assert_eq!(bob.units_of(&property.id), 10);
        assert_eq!(bob.cash, amount("375"));
        assert_eq!(cardy.units_of(&property.id), 990);
        assert_eq!(cardy.cash, amount("125"));

        assert_eq!(
            handler
                .query("getOffer", &args(&[offer.id.as_str()]))
                .unwrap_err()
                .kind(),
            "NotFound"
        );
        assert!(handler.ledger().audit_property(&property.id).unwrap().is_valid());
    }

    #[test]
    fn test_offer_rejected_when_taker_cannot_pay() {
        let config = LedgerConfig::default().with_matching(MatchingMode::Issuer);
        let mut handler = in_memory_handler(config);
        handler.invoke("createAccount", &args(&["cardy"])).unwrap();
        handler.invoke("createAccount", &args(&["bob"])).unwrap();
        let property = issue(&mut handler, "30 Oakwood St", "cardy", 1_000);

        let offer: Offer = decode(
            &handler
                .invoke("generateOffer", &args(&[property.id.as_str(), "10", "12.5"]))
                .unwrap(),
        );
        let err = handler
            .invoke("acceptOffer", &args(&[offer.id.as_str(), "bob"]))
            .unwrap_err();
        assert_eq!(err.kind(), "InsufficientFunds");

        // Nothing moved and the offer is still open.
        let bob: Account = decode(&handler.query("getAccount", &args(&["bob"])).unwrap());
        assert_eq!(bob.units_of(&property.id), 0);
        assert!(handler.query("getOffer", &args(&[offer.id.as_str()])).is_ok());
    }

    #[test]
    fn test_offer_matching_disabled_by_default() {
        let mut handler = in_memory_handler(LedgerConfig::default());
        handler.invoke("createAccount", &args(&["cardy"])).unwrap();
        let property = issue(&mut handler, "30 Oakwood St", "cardy", 1_000);

        let offer: Offer = decode(
            &handler
                .invoke("generateOffer", &args(&[property.id.as_str(), "5"]))
                .unwrap(),
        );
        assert_eq!(offer.price, amount("0"));

        let err = handler
            .invoke("acceptOffer", &args(&[offer.id.as_str(), "cardy"]))
            .unwrap_err();
        assert_eq!(err.kind(), "MatchingUnavailable");
    }

    // =========================================================================
    // RECLAMATION AND LOGIN
    // =========================================================================

    #[test]
    fn test_reclaimed_property_leaves_market() {
        let mut handler = in_memory_handler(LedgerConfig::default());
        handler.invoke("createAccount", &args(&["cardy"])).unwrap();
        let property = issue(&mut handler, "30 Oakwood St", "cardy", 100);
        handler
            .invoke(
                "createTrade",
                &[trade_json("t1", "cardy", &property.id, 10, "5")],
            )
            .unwrap();

        let reclaimed: Property = decode(
            &handler
                .invoke("reclaimProperty", &args(&[property.id.as_str()]))
                .unwrap(),
        );
        assert_eq!(reclaimed.status, PropertyStatus::Reclaimed);

        let quotes: Vec<ReturnTrade> =
            decode(&handler.query("getAvailableTrades", &[]).unwrap());
        assert!(quotes.is_empty());

        let err = handler
            .invoke(
                "createTrade",
                &[trade_json("t2", "cardy", &property.id, 1, "5")],
            )
            .unwrap_err();
        assert_eq!(err.kind(), "PropertyNotTradable");

        // Holdings survive reclamation.
        let cardy: Account = decode(&handler.query("getAccount", &args(&["cardy"])).unwrap());
        assert_eq!(cardy.units_of(&property.id), 100);
    }

    #[test]
    fn test_login_resolves_roles() {
        let mut handler = in_memory_handler(LedgerConfig::default());
        handler.invoke("createAccount", &args(&["cardy"])).unwrap();
        handler.invoke("createAccount", &args(&["alice"])).unwrap();

        let cardy: LoginResponse = decode(&handler.query("login", &args(&["cardy"])).unwrap());
        assert_eq!(cardy.role, Role::Manager);

        let alice: LoginResponse = decode(&handler.query("login", &args(&["alice"])).unwrap());
        assert_eq!(alice.role, Role::PrivateEntity);
        assert_eq!(alice.account.cash, amount("0"));
    }
}
