//! # Ledger Configuration
//!
//! Passed by value into `LedgerService::new`. There is no process-wide
//! configuration state, so independent engines can run side by side.

use crate::domain::errors::LedgerError;
use std::fmt;
use std::str::FromStr;

/// Upper bound for [`LedgerConfig::max_query_ids`].
pub const MAX_QUERY_IDS_LIMIT: usize = 10_000;

/// How `acceptOffer` finds the other side of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchingMode {
    /// No matching; `acceptOffer` fails with `MatchingUnavailable`.
    #[default]
    Disabled,
    /// The property's issuer sells at the offer price.
    Issuer,
}

impl fmt::Display for MatchingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchingMode::Disabled => write!(f, "disabled"),
            MatchingMode::Issuer => write!(f, "issuer"),
        }
    }
}

impl FromStr for MatchingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" | "off" | "none" => Ok(MatchingMode::Disabled),
            "issuer" => Ok(MatchingMode::Issuer),
            other => Err(format!("unknown matching mode: {other}")),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Maximum number of ids accepted by one `getProperties` call
    /// (default: 100).
    pub max_query_ids: usize,

    /// Whether reclaimed properties still accept new trades and offers
    /// (default: false).
    pub allow_reclaimed_trading: bool,

    /// Offer matching mode (default: disabled).
    pub matching: MatchingMode,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_query_ids: 100,
            allow_reclaimed_trading: false,
            matching: MatchingMode::Disabled,
        }
    }
}

impl LedgerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `getProperties` id limit.
    pub fn with_max_query_ids(mut self, max: usize) -> Self {
        self.max_query_ids = max;
        self
    }

    /// Allow or forbid trading on reclaimed properties.
    pub fn with_reclaimed_trading(mut self, allow: bool) -> Self {
        self.allow_reclaimed_trading = allow;
        self
    }

    /// Set the offer matching mode.
    pub fn with_matching(mut self, mode: MatchingMode) -> Self {
        self.matching = mode;
        self
    }

    /// Reject configurations the engine cannot serve.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.max_query_ids == 0 || self.max_query_ids > MAX_QUERY_IDS_LIMIT {
            return Err(LedgerError::InvalidConfig {
                reason: format!(
                    "max_query_ids must be within 1..={MAX_QUERY_IDS_LIMIT}, got {}",
                    self.max_query_ids
                ),
            });
        }
        Ok(())
    }
}
