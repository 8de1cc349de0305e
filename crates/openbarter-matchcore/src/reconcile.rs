//! Pass reconciliation: which bids did a match list consume?
//!
//! A bid that is not matched in a pass remains open and carries over to the
//! next pass. The split is by content path, the stable identity a match
//! keeps for each of its two constituent bids.

use std::collections::HashSet;

use openbarter_types::{Bid, ContentPath, Match};

/// The outcome of splitting a bid set against a match list.
#[derive(Debug)]
pub struct PassPartition {
    /// Bids consumed by a match in this pass.
    pub used: Vec<Bid>,
    /// Bids that carry over to the next pass.
    pub unused: Vec<Bid>,
}

/// Partition `bids` into those referenced by `matches` and those not.
#[must_use]
pub fn partition_by_usage(bids: &[Bid], matches: &[Match]) -> PassPartition {
    let mut matched_paths: HashSet<&ContentPath> = HashSet::new();
    for m in matches {
        matched_paths.insert(&m.offer_path);
        matched_paths.insert(&m.demand_path);
    }

    let mut used = Vec::new();
    let mut unused = Vec::new();
    for bid in bids {
        if matched_paths.contains(&bid.path) {
            used.push(bid.clone());
        } else {
            unused.push(bid.clone());
        }
    }
    PassPartition { used, unused }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::match_bids;

    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn unmatched_bids_carry_over() {
        let bids = vec![
            Bid::dummy_offer(dec(10), dec(5)),
            Bid::dummy_demand(dec(20), dec(5)),
            Bid::dummy_offer(dec(50), dec(5)), // floor above every ceiling
        ];
        let matches = match_bids(&bids);
        assert_eq!(matches.len(), 1);

        let partition = partition_by_usage(&bids, &matches);
        assert_eq!(partition.used.len(), 2);
        assert_eq!(partition.unused.len(), 1);
        assert_eq!(partition.unused[0].path, bids[2].path);
    }

    #[test]
    fn no_matches_means_everything_carries_over() {
        let bids = vec![
            Bid::dummy_offer(dec(50), dec(5)),
            Bid::dummy_demand(dec(30), dec(5)),
        ];
        let partition = partition_by_usage(&bids, &[]);
        assert!(partition.used.is_empty());
        assert_eq!(partition.unused.len(), 2);
    }
}
