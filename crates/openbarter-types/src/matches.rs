//! The result of pairing one offer with one demand.
//!
//! A `Match` is immutable except for the two acceptance flags and
//! `agreement_created`. Invariant: `agreement_created` implies both
//! acceptance flags are set.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, BarterError, Bid, ContentPath, Result, constants};

/// A paired offer and demand with agreed volume and price, pending mutual
/// acceptance by both counterparties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub offer_owner: Address,
    pub offer_path: ContentPath,
    pub demand_owner: Address,
    pub demand_path: ContentPath,
    /// Agreed quantity; positive, within both sides' quantity ranges.
    pub volume: Decimal,
    /// Agreed execution price; within both sides' price ranges.
    pub unit_price: Decimal,
    /// The earlier of the two bids' expiry instants.
    pub expires: DateTime<Utc>,
    /// Set once by the demand owner accepting the offer side.
    pub offer_accepted: bool,
    /// Set once by the offer owner accepting the demand side.
    pub demand_accepted: bool,
    /// Becomes true exactly once, when both acceptance flags are set.
    pub agreement_created: bool,
}

impl Match {
    /// Build a match from its two constituent bids and the agreed terms.
    #[must_use]
    pub fn from_bids(offer: &Bid, demand: &Bid, volume: Decimal, unit_price: Decimal) -> Self {
        Self {
            offer_owner: offer.owner,
            offer_path: offer.path.clone(),
            demand_owner: demand.owner,
            demand_path: demand.path.clone(),
            volume,
            unit_price,
            expires: offer.expires.min(demand.expires),
            offer_accepted: false,
            demand_accepted: false,
            agreement_created: false,
        }
    }

    /// Boundary validation for directly published matches. The matcher only
    /// emits positive terms; direct publication is held to the same rule, so
    /// no downstream agreement can be born with a zero or oversized goal.
    pub fn validate(&self) -> Result<()> {
        if self.volume <= Decimal::ZERO {
            return Err(BarterError::InvalidMatch {
                reason: format!("non-positive volume: {}", self.volume),
            });
        }
        if self.unit_price <= Decimal::ZERO {
            return Err(BarterError::InvalidMatch {
                reason: format!("non-positive unit price: {}", self.unit_price),
            });
        }
        let limit = Decimal::from(constants::MAX_MAGNITUDE);
        if self.volume > limit || self.unit_price > limit {
            return Err(BarterError::InvalidMatch {
                reason: format!("volume or price above the magnitude cap {limit}"),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn both_accepted(&self) -> bool {
        self.offer_accepted && self.demand_accepted
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires
    }

    /// Total value of the match (`volume × unit_price`).
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.volume * self.unit_price
    }
}
