//! # openbarter-settlement
//!
//! **Settlement plane**: the three state machines that take a committed
//! match through mutual acceptance, incremental volume delivery, and
//! incremental payment.
//!
//! ```text
//! Match ──accept×2──▶ TradeAgreement ──claim/confirm volume──▶
//!         PaymentAgreement ──claim/confirm amount──▶ finished
//! ```
//!
//! Each transition requires the right counterparty and is all-or-nothing:
//! a failed authorization or bound check leaves the state unchanged. The
//! machines operate on entity snapshots; the ledger crate persists the new
//! state and emits the domain event once a transition succeeds.

pub mod match_gate;
pub mod payment_agreement;
pub mod trade_agreement;

pub use match_gate::{accept_as_demand_owner, accept_as_offer_owner};
pub use payment_agreement::{PaymentAgreement, PaymentAgreementState};
pub use trade_agreement::{TradeAgreement, TradeAgreementState};
