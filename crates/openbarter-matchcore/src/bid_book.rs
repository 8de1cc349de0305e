//! The pending bids for one matching round.
//!
//! Order-preserving container: the matcher's determinism contract is over
//! the insertion order this book maintains. Insertion validates bids at the
//! boundary; malformed bids never reach the matcher.

use chrono::{DateTime, Utc};
use openbarter_types::{Bid, BidKind, Result};

/// The pending offers and demands for one matching round.
#[derive(Debug, Default)]
pub struct BidBook {
    bids: Vec<Bid>,
}

impl BidBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single bid, rejecting malformed input.
    pub fn insert(&mut self, bid: Bid) -> Result<()> {
        bid.validate()?;
        self.bids.push(bid);
        Ok(())
    }

    /// Insert a batch of bids. Stops at the first malformed bid.
    pub fn insert_batch(&mut self, bids: Vec<Bid>) -> Result<()> {
        for bid in bids {
            self.insert(bid)?;
        }
        Ok(())
    }

    /// All bids in insertion order.
    #[must_use]
    pub fn bids(&self) -> &[Bid] {
        &self.bids
    }

    /// Offers in insertion order.
    pub fn offers(&self) -> impl Iterator<Item = &Bid> {
        self.bids.iter().filter(|b| b.kind == BidKind::Offer)
    }

    /// Demands in insertion order.
    pub fn demands(&self) -> impl Iterator<Item = &Bid> {
        self.bids.iter().filter(|b| b.kind == BidKind::Demand)
    }

    /// Snapshot of the bids eligible for a pass at `now`: open and not yet
    /// expired, in insertion order. Expiry filtering happens here, at the
    /// caller side of the pure matcher.
    #[must_use]
    pub fn live_snapshot(&self, now: DateTime<Utc>) -> Vec<Bid> {
        self.bids
            .iter()
            .filter(|b| b.is_open() && !b.is_expired(now))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }
}
