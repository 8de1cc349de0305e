//! Per-match acceptance gate.
//!
//! A match proceeds to a trade agreement only after **both** counterparties
//! accept it. The demand owner accepts the offer side and vice versa; each
//! side is settable once. A second accept by the same party is rejected
//! with `AlreadyAccepted` rather than silently re-confirming, so the event
//! log shows exactly one acceptance per side.
//!
//! ```text
//! Open ──accept──▶ OneAccepted ──accept──▶ BothAccepted (agreement spawned)
//! ```

use openbarter_types::{Address, BarterError, Match, Result};

use crate::trade_agreement::TradeAgreement;

/// The demand owner accepts the offer side of the match.
///
/// On the accept that completes the pair, the trade agreement is spawned —
/// exactly once per match — and returned for the caller to persist.
pub fn accept_as_demand_owner(mtch: &mut Match, caller: Address) -> Result<Option<TradeAgreement>> {
    if caller != mtch.demand_owner {
        return Err(BarterError::Unauthorized {
            required: mtch.demand_owner,
            caller,
        });
    }
    if mtch.offer_accepted {
        return Err(BarterError::AlreadyAccepted { caller });
    }
    mtch.offer_accepted = true;
    Ok(spawn_agreement(mtch))
}

/// The offer owner accepts the demand side of the match.
pub fn accept_as_offer_owner(mtch: &mut Match, caller: Address) -> Result<Option<TradeAgreement>> {
    if caller != mtch.offer_owner {
        return Err(BarterError::Unauthorized {
            required: mtch.offer_owner,
            caller,
        });
    }
    if mtch.demand_accepted {
        return Err(BarterError::AlreadyAccepted { caller });
    }
    mtch.demand_accepted = true;
    Ok(spawn_agreement(mtch))
}

/// Spawn the trade agreement when both flags are set and none exists yet.
fn spawn_agreement(mtch: &mut Match) -> Option<TradeAgreement> {
    if mtch.both_accepted() && !mtch.agreement_created {
        mtch.agreement_created = true;
        tracing::debug!(offer_owner = %mtch.offer_owner, demand_owner = %mtch.demand_owner, "trade agreement spawned");
        Some(TradeAgreement::from_match(mtch))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use openbarter_types::Bid;
    use rust_decimal::Decimal;

    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn make_match() -> Match {
        let offer = Bid::dummy_offer(dec(2), dec(10));
        let demand = Bid::dummy_demand(dec(2), dec(10));
        Match::from_bids(&offer, &demand, dec(10), dec(2))
    }

    #[test]
    fn both_accepts_spawn_one_agreement() {
        let mut m = make_match();
        let demand_owner = m.demand_owner;
        let offer_owner = m.offer_owner;

        let first = accept_as_demand_owner(&mut m, demand_owner).unwrap();
        assert!(first.is_none());
        assert!(m.offer_accepted);
        assert!(!m.agreement_created);

        let second = accept_as_offer_owner(&mut m, offer_owner).unwrap();
        let agreement = second.expect("completing accept must spawn the agreement");
        assert!(m.agreement_created);
        assert_eq!(agreement.volume_goal, m.volume);
        assert_eq!(agreement.unit_price, m.unit_price);
        assert_eq!(agreement.offer_owner, m.offer_owner);
        assert_eq!(agreement.demand_owner, m.demand_owner);
        assert_eq!(agreement.expires, m.expires);
    }

    #[test]
    fn acceptance_order_does_not_matter() {
        let mut m = make_match();
        let offer_owner = m.offer_owner;
        let demand_owner = m.demand_owner;
        assert!(accept_as_offer_owner(&mut m, offer_owner).unwrap().is_none());
        assert!(
            accept_as_demand_owner(&mut m, demand_owner)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn wrong_caller_is_unauthorized_and_state_unchanged() {
        let mut m = make_match();
        let intruder = Address([0xee; 20]);
        let offer_owner = m.offer_owner;

        let err = accept_as_demand_owner(&mut m, intruder).unwrap_err();
        assert!(matches!(err, BarterError::Unauthorized { .. }));
        assert!(!m.offer_accepted);

        // The offer owner cannot accept on the demand owner's behalf.
        let err = accept_as_demand_owner(&mut m, offer_owner).unwrap_err();
        assert!(matches!(err, BarterError::Unauthorized { .. }));
        assert!(!m.offer_accepted);
    }

    #[test]
    fn double_accept_is_rejected() {
        let mut m = make_match();
        let demand_owner = m.demand_owner;
        accept_as_demand_owner(&mut m, demand_owner).unwrap();

        let err = accept_as_demand_owner(&mut m, demand_owner).unwrap_err();
        assert!(matches!(err, BarterError::AlreadyAccepted { caller } if caller == demand_owner));
        assert!(m.offer_accepted);
        assert!(!m.agreement_created);
    }

    #[test]
    fn agreement_is_never_spawned_twice() {
        let mut m = make_match();
        let demand_owner = m.demand_owner;
        let offer_owner = m.offer_owner;
        accept_as_demand_owner(&mut m, demand_owner).unwrap();
        accept_as_offer_owner(&mut m, offer_owner).unwrap();

        // Re-accepting either side errors; agreement_created stays true and
        // no second agreement can be produced.
        assert!(accept_as_offer_owner(&mut m, offer_owner).is_err());
        assert!(accept_as_demand_owner(&mut m, demand_owner).is_err());
        assert!(m.agreement_created);
    }
}
