//! Bid types for the OpenBarter marketplace.
//!
//! A bid is a standing offer or demand. The quantity bounds are inclusive;
//! bids are currently all-or-nothing on quantity (`min_quantity ==
//! max_quantity == volume`). The single limit price is a **floor** for
//! offers and a **ceiling** for demands.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, BarterError, ContentPath, Result, constants};

/// Which side of the market this bid is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum BidKind {
    Offer,
    Demand,
}

impl std::fmt::Display for BidKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offer => write!(f, "OFFER"),
            Self::Demand => write!(f, "DEMAND"),
        }
    }
}

/// Matching status of a bid.
///
/// Mutated only by a matching pass (in-memory) and by the commit-time
/// compare-and-swap on the ledger. A bid that survives a pass `Open` is
/// eligible again in the next pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidStatus {
    Open,
    Matched,
}

impl std::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Matched => write!(f, "MATCHED"),
        }
    }
}

/// A standing offer or demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    /// Identity of the submitting party.
    pub owner: Address,
    /// Reference to the off-ledger, signed bid content.
    pub path: ContentPath,
    pub kind: BidKind,
    /// Inclusive lower bound on tradable quantity.
    pub min_quantity: Decimal,
    /// Inclusive upper bound on tradable quantity.
    pub max_quantity: Decimal,
    /// Price floor (offers) or ceiling (demands).
    pub unit_price: Decimal,
    /// Absolute expiry instant.
    pub expires: DateTime<Utc>,
    pub status: BidStatus,
}

impl Bid {
    /// An all-or-nothing bid: both quantity bounds equal `volume`.
    #[must_use]
    pub fn all_or_nothing(
        owner: Address,
        path: ContentPath,
        kind: BidKind,
        volume: Decimal,
        unit_price: Decimal,
        expires: DateTime<Utc>,
    ) -> Self {
        Self {
            owner,
            path,
            kind,
            min_quantity: volume,
            max_quantity: volume,
            unit_price,
            expires,
            status: BidStatus::Open,
        }
    }

    /// Boundary validation: reject malformed bids before they enter a book.
    pub fn validate(&self) -> Result<()> {
        if self.min_quantity > self.max_quantity {
            return Err(BarterError::InvalidBid {
                reason: format!(
                    "inverted quantity range: {} > {}",
                    self.min_quantity, self.max_quantity
                ),
            });
        }
        if self.max_quantity <= Decimal::ZERO {
            return Err(BarterError::InvalidBid {
                reason: format!("non-positive max quantity: {}", self.max_quantity),
            });
        }
        if self.unit_price < Decimal::ZERO {
            return Err(BarterError::InvalidBid {
                reason: format!("negative unit price: {}", self.unit_price),
            });
        }
        if self.min_quantity.scale() > constants::VOLUME_PRECISION
            || self.max_quantity.scale() > constants::VOLUME_PRECISION
        {
            return Err(BarterError::InvalidBid {
                reason: format!(
                    "quantity precision beyond {} decimal places",
                    constants::VOLUME_PRECISION
                ),
            });
        }
        if self.unit_price.scale() > constants::PRICE_PRECISION {
            return Err(BarterError::InvalidBid {
                reason: format!(
                    "price precision beyond {} decimal places",
                    constants::PRICE_PRECISION
                ),
            });
        }
        // The cap guarantees volume x price stays inside Decimal range.
        let limit = Decimal::from(constants::MAX_MAGNITUDE);
        if self.max_quantity > limit || self.unit_price > limit {
            return Err(BarterError::InvalidBid {
                reason: format!("quantity or price above the magnitude cap {limit}"),
            });
        }
        Ok(())
    }

    /// Acceptable price range: `[unit_price, MAX]` for an offer,
    /// `[0, unit_price]` for a demand.
    #[must_use]
    pub fn price_range(&self) -> (Decimal, Decimal) {
        match self.kind {
            BidKind::Offer => (self.unit_price, Decimal::MAX),
            BidKind::Demand => (Decimal::ZERO, self.unit_price),
        }
    }

    /// Inclusive quantity bounds.
    #[must_use]
    pub fn quantity_range(&self) -> (Decimal, Decimal) {
        (self.min_quantity, self.max_quantity)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == BidStatus::Open
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Bid {
    pub fn dummy_offer(unit_price: Decimal, volume: Decimal) -> Self {
        Self::all_or_nothing(
            Address([0xaa; 20]),
            ContentPath::for_payload(&rand::random::<[u8; 16]>()),
            BidKind::Offer,
            volume,
            unit_price,
            Utc::now() + chrono::Duration::hours(1),
        )
    }

    pub fn dummy_demand(unit_price: Decimal, volume: Decimal) -> Self {
        Self::all_or_nothing(
            Address([0xbb; 20]),
            ContentPath::for_payload(&rand::random::<[u8; 16]>()),
            BidKind::Demand,
            volume,
            unit_price,
            Utc::now() + chrono::Duration::hours(1),
        )
    }
}
