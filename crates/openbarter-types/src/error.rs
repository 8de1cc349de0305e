//! Error types for the OpenBarter marketplace.
//!
//! All errors use the `OB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Bid / signature errors
//! - 2xx: Match errors
//! - 3xx: Trade agreement errors
//! - 4xx: Payment agreement errors
//! - 5xx: Authorization / bound errors
//! - 9xx: General / internal errors
//!
//! "No feasible match" is **not** an error: the Matcher simply emits no
//! match for a bid pair whose quantity or price ranges do not overlap.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Address, BidId, MatchId, PaymentAgreementId, TradeAgreementId};

/// Central error enum for all OpenBarter operations.
#[derive(Debug, Error)]
pub enum BarterError {
    // =================================================================
    // Bid / signature errors (1xx)
    // =================================================================
    /// The referenced bid does not exist on the ledger.
    #[error("OB_ERR_100: Bid not found: {0}")]
    BidNotFound(BidId),

    /// The bid failed boundary validation (bad ranges, bad values).
    #[error("OB_ERR_101: Invalid bid: {reason}")]
    InvalidBid { reason: String },

    /// A retrieved bid's signature failed verification against the claimed
    /// owner's verifying key.
    #[error("OB_ERR_102: Bid signature verification failed for owner {owner}")]
    SignatureInvalid { owner: Address },

    /// No verifying key is registered for this address.
    #[error("OB_ERR_103: No verifying key registered for {0}")]
    UnknownSigner(Address),

    /// A verifying key is already registered for this address.
    #[error("OB_ERR_104: {0} already has a verifying key registered")]
    SignerAlreadyRegistered(Address),

    /// The referenced object-store path holds no content.
    #[error("OB_ERR_105: No content stored at path {0}")]
    ContentNotFound(crate::ContentPath),

    // =================================================================
    // Match errors (2xx)
    // =================================================================
    /// The referenced match does not exist on the ledger.
    #[error("OB_ERR_200: Match not found: {0}")]
    MatchNotFound(MatchId),

    /// The caller's side of this match is already accepted. A second accept
    /// is rejected rather than treated as a silent re-confirmation.
    #[error("OB_ERR_201: Match side already accepted by {caller}")]
    AlreadyAccepted { caller: Address },

    /// The match expired before acceptance.
    #[error("OB_ERR_202: Match {0} has expired")]
    MatchExpired(MatchId),

    /// The match terms failed boundary validation (direct publication).
    #[error("OB_ERR_203: Invalid match: {reason}")]
    InvalidMatch { reason: String },

    // =================================================================
    // Trade agreement errors (3xx)
    // =================================================================
    /// The referenced trade agreement does not exist on the ledger.
    #[error("OB_ERR_300: Trade agreement not found: {0}")]
    TradeAgreementNotFound(TradeAgreementId),

    // =================================================================
    // Payment agreement errors (4xx)
    // =================================================================
    /// The referenced payment agreement does not exist on the ledger.
    #[error("OB_ERR_400: Payment agreement not found: {0}")]
    PaymentAgreementNotFound(PaymentAgreementId),

    // =================================================================
    // Authorization / bound errors (5xx)
    // =================================================================
    /// Caller is not the required counterparty for this transition.
    #[error("OB_ERR_500: Unauthorized: operation requires {required}, caller is {caller}")]
    Unauthorized { required: Address, caller: Address },

    /// A claim or confirm would push a cumulative counter above its bound
    /// (the goal, or the counterparty's cumulative counter).
    #[error("OB_ERR_501: Out of range: cumulative {attempted} exceeds bound {limit}")]
    OutOfRange { attempted: Decimal, limit: Decimal },

    /// Claims and confirms must move the counter forward.
    #[error("OB_ERR_502: Non-positive increment: {0}")]
    NonPositiveAmount(Decimal),

    // =================================================================
    // General / internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OB_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("OB_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, BarterError>;

impl From<serde_json::Error> for BarterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = BarterError::BidNotFound(BidId(3));
        let msg = format!("{err}");
        assert!(msg.starts_with("OB_ERR_100"), "Got: {msg}");
        assert!(msg.contains("bid:3"));
    }

    #[test]
    fn unauthorized_display_names_both_parties() {
        let err = BarterError::Unauthorized {
            required: Address([1u8; 20]),
            caller: Address([2u8; 20]),
        };
        let msg = format!("{err}");
        assert!(msg.contains("OB_ERR_500"));
        assert!(msg.contains("0x0101"));
        assert!(msg.contains("0x0202"));
    }

    #[test]
    fn out_of_range_display() {
        let err = BarterError::OutOfRange {
            attempted: Decimal::new(12, 0),
            limit: Decimal::new(10, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("OB_ERR_501"));
        assert!(msg.contains("12"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn all_errors_have_ob_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(BarterError::InvalidBid {
                reason: "test".into(),
            }),
            Box::new(BarterError::UnknownSigner(Address([0u8; 20]))),
            Box::new(BarterError::MatchExpired(MatchId(1))),
            Box::new(BarterError::InvalidMatch {
                reason: "test".into(),
            }),
            Box::new(BarterError::NonPositiveAmount(Decimal::ZERO)),
            Box::new(BarterError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("OB_ERR_"),
                "Error missing OB_ERR_ prefix: {msg}"
            );
        }
    }
}
