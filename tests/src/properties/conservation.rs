//! # Conservation Properties
//!
//! Random settlement sequences, including ones that must fail, never change
//! total supply, total cash, or the synthetic account's mirror of holdings.
//! Parties are drawn from participants and from property accounts, which
//! must never hold cash or units of their own.

#[cfg(test)]
mod tests {
    use crate::fixtures::amount;
    use mm_ledger::domain::config::LedgerConfig;
    use mm_ledger::domain::entities::{Property, Settlement};
    use mm_ledger::domain::invariants::units_held;
    use mm_ledger::domain::value_objects::Amount;
    use mm_ledger::ports::inbound::LedgerApi;
    use mm_ledger::service::LedgerService;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    const PARTICIPANTS: [&str; 4] = ["cardy", "alice", "bob", "carol"];
    const SUPPLY: u64 = 1_000;

    #[derive(Debug, Clone)]
    struct Step {
        seller: usize,
        buyer: usize,
        units: u64,
        cents: u32,
    }

    /// Traded property, a second property, and every account id a step may
    /// pick: the participants followed by both property accounts.
    struct Market {
        ledger: LedgerService,
        traded: String,
        other: String,
        parties: Vec<String>,
    }

    fn step() -> impl Strategy<Value = Step> {
        let parties = PARTICIPANTS.len() + 2;
        (0..parties, 0..parties, 0u64..400, 0u32..5_000).prop_map(
            |(seller, buyer, units, cents)| Step {
                seller,
                buyer,
                units,
                cents,
            },
        )
    }

    fn issue(ledger: &mut LedgerService, address_line: &str) -> String {
        ledger
            .issue_property(Property {
                address_line: address_line.into(),
                suburb: "Sutherland".into(),
                state: "NSW".into(),
                post_code: "2232".into(),
                issuer: "cardy".into(),
                units: SUPPLY,
                ..Property::default()
            })
            .unwrap()
            .id
    }

    fn setup() -> Market {
        let mut ledger = LedgerService::new_in_memory(LedgerConfig::default());
        for id in PARTICIPANTS {
            ledger.create_account(id).unwrap();
            ledger.deposit_cash(id, amount("250")).unwrap();
        }
        let traded = issue(&mut ledger, "30 Oakwood St");
        let other = issue(&mut ledger, "1 Other St");
        let parties = PARTICIPANTS
            .iter()
            .map(|id| id.to_string())
            .chain([traded.clone(), other.clone()])
            .collect();
        Market {
            ledger,
            traded,
            other,
            parties,
        }
    }

    fn is_property_account(market: &Market, id: &str) -> bool {
        id == market.traded || id == market.other
    }

    fn total_cash(ledger: &LedgerService) -> Amount {
        PARTICIPANTS
            .iter()
            .map(|id| ledger.get_account(id).unwrap().cash)
            .sum()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn settlements_conserve_units_and_cash(steps in prop::collection::vec(step(), 1..40)) {
            let mut market = setup();
            let cash_before = total_cash(&market.ledger);

            for step in steps {
                let seller = market.parties[step.seller].clone();
                let buyer = market.parties[step.buyer].clone();
                let result = market.ledger.settle(Settlement {
                    seller: seller.clone(),
                    buyer: buyer.clone(),
                    property_id: market.traded.clone(),
                    units: step.units,
                    price: Decimal::new(i64::from(step.cents), 2),
                });
                if is_property_account(&market, &seller) || is_property_account(&market, &buyer) {
                    prop_assert!(result.is_err());
                }

                let ledger = &market.ledger;
                let accounts: Vec<_> = market
                    .parties
                    .iter()
                    .map(|id| ledger.get_account(id).unwrap())
                    .collect();
                for property_id in [&market.traded, &market.other] {
                    prop_assert_eq!(units_held(property_id, &accounts), SUPPLY);
                    prop_assert!(ledger.audit_property(property_id).unwrap().is_valid());
                }
                prop_assert!(accounts.iter().all(|a| !a.cash.is_sign_negative() || a.cash.is_zero()));
            }

            let ledger = &market.ledger;
            for property_id in [&market.traded, &market.other] {
                let account = ledger.get_account(property_id).unwrap();
                prop_assert!(account.cash.is_zero());
                prop_assert_eq!(account.units_of(&market.traded), 0);
                prop_assert_eq!(account.units_of(&market.other), 0);
            }
            prop_assert_eq!(total_cash(ledger), cash_before);
        }

        #[test]
        fn failed_settlement_changes_nothing(units in (SUPPLY + 1)..(SUPPLY * 4)) {
            let Market { mut ledger, traded: property_id, .. } = setup();
            let before: Vec<_> = PARTICIPANTS
                .iter()
                .map(|id| ledger.get_account(id).unwrap())
                .collect();

            let result = ledger.settle(Settlement {
                seller: "cardy".into(),
                buyer: "alice".into(),
                property_id: property_id.clone(),
                units,
                price: Decimal::ZERO,
            });
            prop_assert!(result.is_err());

            let after: Vec<_> = PARTICIPANTS
                .iter()
                .map(|id| ledger.get_account(id).unwrap())
                .collect();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn property_accounts_take_no_cash(cents in 0u32..100_000, pick in 0usize..2) {
            let mut market = setup();
            let id = if pick == 0 { market.traded.clone() } else { market.other.clone() };
            let before = market.ledger.get_account(&id).unwrap();

            let value = Decimal::new(i64::from(cents), 2);
            let deposit = market.ledger.deposit_cash(&id, value);
            prop_assert_eq!(deposit.unwrap_err().kind(), "InvalidAccount");
            let withdraw = market.ledger.withdraw_cash(&id, value);
            prop_assert_eq!(withdraw.unwrap_err().kind(), "InvalidAccount");

            prop_assert_eq!(market.ledger.get_account(&id).unwrap(), before);
        }
    }
}
