//! The pure deterministic matching function.
//!
//! ```text
//! match_bids(&[Bid]) -> Vec<Match>
//! ```
//!
//! Offers are scanned in input order; for each open offer the demands are
//! scanned in input order. An offer matches **at most one** demand per pass.
//! The caller persists matched/unmatched status; two runs over the same bid
//! sequence must produce identical matches.

use openbarter_types::{Bid, BidKind, BidStatus, Match};
use rust_decimal::Decimal;

/// Pure deterministic matching: takes a bid snapshot, produces matches.
///
/// ## Algorithm
///
/// 1. Partition bids into offers and demands, preserving relative order
/// 2. For each offer not yet matched, scan demands in order:
///    - candidate volume = highest value in both quantity ranges
///    - candidate price = lowest value in both price ranges
///    - both positive -> emit a match, mark both bids matched, move to the
///      next offer
/// 3. Return the emitted matches; bid status changes stay local to the pass
///
/// Complexity is O(offers × demands) in the worst case.
#[must_use]
pub fn match_bids(bids: &[Bid]) -> Vec<Match> {
    let mut offers: Vec<Bid> = Vec::new();
    let mut demands: Vec<Bid> = Vec::new();
    for bid in bids {
        match bid.kind {
            BidKind::Offer => offers.push(bid.clone()),
            BidKind::Demand => demands.push(bid.clone()),
        }
    }

    let mut matches: Vec<Match> = Vec::new();
    for offer in &mut offers {
        for demand in &mut demands {
            if offer.status == BidStatus::Matched {
                break;
            }
            if demand.status == BidStatus::Matched {
                continue;
            }
            let volume = overlap_quantity(offer, demand);
            let unit_price = overlap_price(offer, demand);
            if volume > Decimal::ZERO && unit_price > Decimal::ZERO {
                offer.status = BidStatus::Matched;
                demand.status = BidStatus::Matched;
                tracing::trace!(%volume, %unit_price, "match formed");
                matches.push(Match::from_bids(offer, demand, volume, unit_price));
            }
        }
    }
    matches
}

/// The highest value lying in both bids' quantity ranges, or zero if the
/// ranges do not overlap. When both ranges overlap this is the smaller of
/// the two maxima: the largest volume deliverable by the more constrained
/// side.
#[must_use]
pub fn overlap_quantity(offer: &Bid, demand: &Bid) -> Decimal {
    let (offer_min, offer_max) = offer.quantity_range();
    let (demand_min, demand_max) = demand.quantity_range();
    if demand_max < offer_min || offer_max < demand_min {
        return Decimal::ZERO;
    }
    offer_max.min(demand_max)
}

/// The lowest value lying in both bids' price ranges, or zero if the ranges
/// do not overlap. When both ranges overlap this is the larger of the two
/// floors (the tighter floor), which for an offer/demand pair resolves to
/// the offer's floor.
#[must_use]
pub fn overlap_price(offer: &Bid, demand: &Bid) -> Decimal {
    let (offer_floor, offer_ceiling) = offer.price_range();
    let (demand_floor, demand_ceiling) = demand.price_range();
    if demand_ceiling < offer_floor || offer_ceiling < demand_floor {
        return Decimal::ZERO;
    }
    offer_floor.max(demand_floor)
}
