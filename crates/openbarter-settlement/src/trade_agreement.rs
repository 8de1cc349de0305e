//! Incremental-fulfillment state machine for delivered volume.
//!
//! The offer owner claims delivered volume; the demand owner confirms it.
//! Claims and confirms may arrive in arbitrarily small increments and need
//! not pair up in size, only in cumulative bound. Invariant:
//!
//! ```text
//! 0 ≤ volume_actual ≤ volume_claimed ≤ volume_goal
//! ```
//!
//! The confirm that brings `volume_actual` to the goal spawns the payment
//! agreement, exactly once.

use chrono::{DateTime, Utc};
use openbarter_types::{Address, BarterError, ContentPath, Match, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payment_agreement::PaymentAgreement;

/// Derived view of a trade agreement's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAgreementState {
    /// No volume claimed yet.
    Pending,
    /// Some volume claimed or confirmed, goal not yet reached.
    PartiallyClaimed,
    /// Confirmed volume reached the goal; payment agreement spawned.
    Fulfilled,
}

/// Tracks delivery of `volume_goal` units between one offer owner and one
/// demand owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeAgreement {
    pub offer_owner: Address,
    pub offer_path: ContentPath,
    pub demand_owner: Address,
    pub demand_path: ContentPath,
    /// Target volume to deliver (the match's volume).
    pub volume_goal: Decimal,
    /// Cumulative volume the offer owner asserts has been delivered.
    pub volume_claimed: Decimal,
    /// Cumulative volume the demand owner has confirmed.
    pub volume_actual: Decimal,
    pub unit_price: Decimal,
    pub expires: DateTime<Utc>,
    /// True once the payment agreement has been spawned.
    pub agreement_created: bool,
}

impl TradeAgreement {
    /// Seed an agreement from a mutually accepted match.
    #[must_use]
    pub fn from_match(mtch: &Match) -> Self {
        Self {
            offer_owner: mtch.offer_owner,
            offer_path: mtch.offer_path.clone(),
            demand_owner: mtch.demand_owner,
            demand_path: mtch.demand_path.clone(),
            volume_goal: mtch.volume,
            volume_claimed: Decimal::ZERO,
            volume_actual: Decimal::ZERO,
            unit_price: mtch.unit_price,
            expires: mtch.expires,
            agreement_created: false,
        }
    }

    /// The offer owner claims `amount` more delivered volume.
    ///
    /// # Errors
    /// - `Unauthorized` if the caller is not the offer owner
    /// - `NonPositiveAmount` if `amount <= 0`
    /// - `OutOfRange` if the cumulative claim would exceed the goal
    pub fn claim_volume(&mut self, caller: Address, amount: Decimal) -> Result<()> {
        if caller != self.offer_owner {
            return Err(BarterError::Unauthorized {
                required: self.offer_owner,
                caller,
            });
        }
        if amount <= Decimal::ZERO {
            return Err(BarterError::NonPositiveAmount(amount));
        }
        let claimed = self.volume_claimed + amount;
        if claimed > self.volume_goal {
            return Err(BarterError::OutOfRange {
                attempted: claimed,
                limit: self.volume_goal,
            });
        }
        self.volume_claimed = claimed;
        Ok(())
    }

    /// The demand owner confirms `amount` more delivered volume. The
    /// cumulative confirmation can never exceed the cumulative claim.
    ///
    /// The confirm that reaches the goal spawns the payment agreement with
    /// `amount_goal = volume_goal × unit_price`; it is returned for the
    /// caller to persist.
    pub fn confirm_volume(
        &mut self,
        caller: Address,
        amount: Decimal,
    ) -> Result<Option<PaymentAgreement>> {
        if caller != self.demand_owner {
            return Err(BarterError::Unauthorized {
                required: self.demand_owner,
                caller,
            });
        }
        if amount <= Decimal::ZERO {
            return Err(BarterError::NonPositiveAmount(amount));
        }
        let actual = self.volume_actual + amount;
        if actual > self.volume_claimed {
            return Err(BarterError::OutOfRange {
                attempted: actual,
                limit: self.volume_claimed,
            });
        }
        self.volume_actual = actual;

        if self.volume_actual == self.volume_goal && !self.agreement_created {
            self.agreement_created = true;
            return Ok(Some(PaymentAgreement::from_trade_agreement(self)));
        }
        Ok(None)
    }

    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.volume_actual == self.volume_goal
    }

    #[must_use]
    pub fn state(&self) -> TradeAgreementState {
        if self.is_fulfilled() {
            TradeAgreementState::Fulfilled
        } else if self.volume_claimed > Decimal::ZERO {
            TradeAgreementState::PartiallyClaimed
        } else {
            TradeAgreementState::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use openbarter_types::Bid;

    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn make_agreement() -> TradeAgreement {
        let offer = Bid::dummy_offer(dec(2), dec(10));
        let demand = Bid::dummy_demand(dec(2), dec(10));
        let m = Match::from_bids(&offer, &demand, dec(10), dec(2));
        TradeAgreement::from_match(&m)
    }

    #[test]
    fn starts_pending_with_zero_counters() {
        let ta = make_agreement();
        assert_eq!(ta.state(), TradeAgreementState::Pending);
        assert_eq!(ta.volume_claimed, Decimal::ZERO);
        assert_eq!(ta.volume_actual, Decimal::ZERO);
        assert_eq!(ta.volume_goal, dec(10));
    }

    #[test]
    fn staged_claims_and_confirms_hold_the_bound() {
        let mut ta = make_agreement();
        let offer = ta.offer_owner;
        let demand = ta.demand_owner;

        ta.claim_volume(offer, dec(4)).unwrap();
        assert_eq!(ta.state(), TradeAgreementState::PartiallyClaimed);
        ta.confirm_volume(demand, dec(1)).unwrap();
        ta.claim_volume(offer, dec(6)).unwrap();
        ta.confirm_volume(demand, dec(3)).unwrap();

        assert!(ta.volume_actual <= ta.volume_claimed);
        assert!(ta.volume_claimed <= ta.volume_goal);
        assert_eq!(ta.volume_claimed, dec(10));
        assert_eq!(ta.volume_actual, dec(4));
    }

    #[test]
    fn claim_beyond_goal_is_rejected_unchanged() {
        let mut ta = make_agreement();
        let offer = ta.offer_owner;

        ta.claim_volume(offer, dec(8)).unwrap();
        let err = ta.claim_volume(offer, dec(3)).unwrap_err();
        assert!(matches!(err, BarterError::OutOfRange { .. }));
        assert_eq!(ta.volume_claimed, dec(8));
    }

    #[test]
    fn confirm_beyond_claim_is_rejected_unchanged() {
        let mut ta = make_agreement();
        ta.claim_volume(ta.offer_owner, dec(5)).unwrap();

        let err = ta.confirm_volume(ta.demand_owner, dec(6)).unwrap_err();
        assert!(matches!(err, BarterError::OutOfRange { .. }));
        assert_eq!(ta.volume_actual, Decimal::ZERO);
    }

    #[test]
    fn unauthorized_claim_leaves_counter_unchanged() {
        let mut ta = make_agreement();
        let demand = ta.demand_owner;

        let err = ta.claim_volume(demand, dec(5)).unwrap_err();
        assert!(matches!(err, BarterError::Unauthorized { .. }));
        assert_eq!(ta.volume_claimed, Decimal::ZERO);
    }

    #[test]
    fn unauthorized_confirm_leaves_counter_unchanged() {
        let mut ta = make_agreement();
        ta.claim_volume(ta.offer_owner, dec(5)).unwrap();

        let offer = ta.offer_owner;
        let err = ta.confirm_volume(offer, dec(5)).unwrap_err();
        assert!(matches!(err, BarterError::Unauthorized { .. }));
        assert_eq!(ta.volume_actual, Decimal::ZERO);
    }

    #[test]
    fn zero_and_negative_increments_are_rejected() {
        let mut ta = make_agreement();
        let offer = ta.offer_owner;
        assert!(matches!(
            ta.claim_volume(offer, Decimal::ZERO).unwrap_err(),
            BarterError::NonPositiveAmount(_)
        ));
        assert!(ta.claim_volume(offer, dec(-1)).is_err());
    }

    #[test]
    fn fulfillment_spawns_payment_agreement_once() {
        let mut ta = make_agreement();
        let offer = ta.offer_owner;
        let demand = ta.demand_owner;

        ta.claim_volume(offer, dec(10)).unwrap();
        assert!(ta.confirm_volume(demand, dec(9)).unwrap().is_none());

        let pa = ta
            .confirm_volume(demand, dec(1))
            .unwrap()
            .expect("goal-reaching confirm must spawn the payment agreement");
        assert_eq!(ta.state(), TradeAgreementState::Fulfilled);
        assert!(ta.agreement_created);

        // amount_goal = volume_goal x unit_price
        assert_eq!(pa.amount_goal, dec(20));
        assert_eq!(pa.offer_owner, ta.offer_owner);
        assert_eq!(pa.demand_owner, ta.demand_owner);
        assert_eq!(pa.offer_path, ta.offer_path);
        assert_eq!(pa.demand_path, ta.demand_path);
    }

    #[test]
    fn fulfilled_agreement_is_terminal() {
        let mut ta = make_agreement();
        let offer = ta.offer_owner;
        let demand = ta.demand_owner;
        ta.claim_volume(offer, dec(10)).unwrap();
        ta.confirm_volume(demand, dec(10)).unwrap();

        // Counters are saturated; any further movement is out of range.
        assert!(ta.claim_volume(offer, dec(1)).is_err());
        assert!(ta.confirm_volume(demand, dec(1)).is_err());
        assert!(ta.is_fulfilled());
        assert_eq!(ta.volume_actual, ta.volume_goal);
    }
}
