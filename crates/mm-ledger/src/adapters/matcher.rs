//! Offer matchers.
//!
//! The engine has no order book. `acceptOffer` asks an `OfferMatcher` to
//! name the counterparty and the terms, then settles the result atomically.

use crate::domain::config::MatchingMode;
use crate::domain::entities::{Account, Offer, Property, Settlement};
use crate::domain::errors::LedgerError;
use crate::domain::value_objects::Direction;
use crate::ports::outbound::OfferMatcher;

/// Matcher for deployments without matching; every acceptance fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMatcher;

impl OfferMatcher for DisabledMatcher {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn match_offer(
        &self,
        offer: &Offer,
        _property: &Property,
        _taker: &Account,
    ) -> Result<Settlement, LedgerError> {
        Err(LedgerError::MatchingUnavailable {
            offer: offer.id.clone(),
        })
    }
}

/// The property's issuer is the counterparty, at the offer price.
///
/// A sell offer is bought by the taker from the issuer; a buy offer is
/// sold by the taker to the issuer.
#[derive(Debug, Default, Clone, Copy)]
pub struct IssuerCounterpartyMatcher;

impl OfferMatcher for IssuerCounterpartyMatcher {
    fn name(&self) -> &'static str {
        "issuer"
    }

    fn match_offer(
        &self,
        offer: &Offer,
        property: &Property,
        taker: &Account,
    ) -> Result<Settlement, LedgerError> {
        let (seller, buyer) = match offer.direction {
            Direction::Sell => (property.issuer.clone(), taker.id.clone()),
            Direction::Buy => (taker.id.clone(), property.issuer.clone()),
        };

        Ok(Settlement {
            seller,
            buyer,
            property_id: property.id.clone(),
            units: offer.units,
            price: offer.price,
        })
    }
}

/// Matcher for a configured mode.
#[must_use]
pub fn matcher_for(mode: MatchingMode) -> Box<dyn OfferMatcher> {
    match mode {
        MatchingMode::Disabled => Box::new(DisabledMatcher),
        MatchingMode::Issuer => Box::new(IssuerCounterpartyMatcher),
    }
}
