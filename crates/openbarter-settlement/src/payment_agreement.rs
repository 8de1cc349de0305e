//! Incremental-settlement state machine for the amount owed.
//!
//! Mirror image of the trade agreement with the roles swapped: the demand
//! owner is the payer and claims amounts paid; the offer owner is the payee
//! and confirms receipt. Invariant:
//!
//! ```text
//! 0 ≤ amount_actual ≤ amount_claimed ≤ amount_goal
//! ```
//!
//! `finished` is the terminal state of the whole settlement pipeline for
//! one match; nothing follows it.

use openbarter_types::{Address, BarterError, ContentPath, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::trade_agreement::TradeAgreement;

/// Derived view of a payment agreement's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentAgreementState {
    /// No amount claimed yet.
    Pending,
    /// Some amount claimed or confirmed, goal not yet reached.
    PartiallyClaimed,
    /// Confirmed amount reached the goal.
    Finished,
}

/// Tracks payment of `amount_goal = volume × unit_price` between the same
/// two parties as the originating trade agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAgreement {
    pub offer_owner: Address,
    pub offer_path: ContentPath,
    pub demand_owner: Address,
    pub demand_path: ContentPath,
    /// Total amount owed.
    pub amount_goal: Decimal,
    /// Cumulative amount the demand owner (payer) asserts has been paid.
    pub amount_claimed: Decimal,
    /// Cumulative amount the offer owner (payee) has confirmed.
    pub amount_actual: Decimal,
    pub finished: bool,
}

impl PaymentAgreement {
    /// Seed a payment agreement from a fulfilled trade agreement.
    #[must_use]
    pub fn from_trade_agreement(agreement: &TradeAgreement) -> Self {
        Self {
            offer_owner: agreement.offer_owner,
            offer_path: agreement.offer_path.clone(),
            demand_owner: agreement.demand_owner,
            demand_path: agreement.demand_path.clone(),
            amount_goal: agreement.volume_goal * agreement.unit_price,
            amount_claimed: Decimal::ZERO,
            amount_actual: Decimal::ZERO,
            finished: false,
        }
    }

    /// The demand owner claims `amount` more paid.
    ///
    /// # Errors
    /// - `Unauthorized` if the caller is not the demand owner
    /// - `NonPositiveAmount` if `amount <= 0`
    /// - `OutOfRange` if the cumulative claim would exceed the goal
    pub fn claim_amount(&mut self, caller: Address, amount: Decimal) -> Result<()> {
        if caller != self.demand_owner {
            return Err(BarterError::Unauthorized {
                required: self.demand_owner,
                caller,
            });
        }
        if amount <= Decimal::ZERO {
            return Err(BarterError::NonPositiveAmount(amount));
        }
        let claimed = self.amount_claimed + amount;
        if claimed > self.amount_goal {
            return Err(BarterError::OutOfRange {
                attempted: claimed,
                limit: self.amount_goal,
            });
        }
        self.amount_claimed = claimed;
        Ok(())
    }

    /// The offer owner confirms receipt of `amount` more. The cumulative
    /// confirmation can never exceed the cumulative claim.
    ///
    /// Returns `true` when this confirm reached the goal and finished the
    /// agreement.
    pub fn confirm_amount(&mut self, caller: Address, amount: Decimal) -> Result<bool> {
        if caller != self.offer_owner {
            return Err(BarterError::Unauthorized {
                required: self.offer_owner,
                caller,
            });
        }
        if amount <= Decimal::ZERO {
            return Err(BarterError::NonPositiveAmount(amount));
        }
        let actual = self.amount_actual + amount;
        if actual > self.amount_claimed {
            return Err(BarterError::OutOfRange {
                attempted: actual,
                limit: self.amount_claimed,
            });
        }
        self.amount_actual = actual;

        if self.amount_actual == self.amount_goal && !self.finished {
            self.finished = true;
            return Ok(true);
        }
        Ok(false)
    }

    #[must_use]
    pub fn state(&self) -> PaymentAgreementState {
        if self.finished {
            PaymentAgreementState::Finished
        } else if self.amount_claimed > Decimal::ZERO {
            PaymentAgreementState::PartiallyClaimed
        } else {
            PaymentAgreementState::Pending
        }
    }
}
