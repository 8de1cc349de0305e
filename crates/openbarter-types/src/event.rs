//! Strongly-typed domain events.
//!
//! Every auditable transition on the ledger emits one of these. Observers
//! subscribe to the event bus; the core never consumes its own events.

use serde::{Deserialize, Serialize};

use crate::{Address, BidId, MatchId, PaymentAgreementId, TradeAgreementId};

/// A domain event, carrying the relevant entity id and party addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// A bid was recorded on the ledger.
    NewBid { id: BidId, owner: Address },
    /// A match was committed (by a matching pass or direct publication).
    NewMatch {
        id: MatchId,
        offer_owner: Address,
        demand_owner: Address,
    },
    /// Both parties accepted; a trade agreement was created.
    NewTradeAgreement {
        id: TradeAgreementId,
        offer_owner: Address,
        demand_owner: Address,
    },
    /// The offer owner claimed delivered volume.
    VolumeClaimed {
        id: TradeAgreementId,
        offer_owner: Address,
        demand_owner: Address,
    },
    /// The demand owner confirmed delivered volume.
    VolumeConfirmed {
        id: TradeAgreementId,
        offer_owner: Address,
        demand_owner: Address,
    },
    /// Delivery reached its goal; a payment agreement was created.
    NewPaymentAgreement {
        id: PaymentAgreementId,
        offer_owner: Address,
        demand_owner: Address,
    },
    /// The demand owner claimed a paid amount.
    AmountClaimed {
        id: PaymentAgreementId,
        offer_owner: Address,
        demand_owner: Address,
    },
    /// The offer owner confirmed a received amount.
    AmountConfirmed {
        id: PaymentAgreementId,
        offer_owner: Address,
        demand_owner: Address,
    },
    /// Payment reached its goal; the settlement pipeline is complete.
    PaymentAgreementFinished {
        id: PaymentAgreementId,
        offer_owner: Address,
        demand_owner: Address,
    },
}

impl MarketEvent {
    /// Stable event name, for logs and observers keying by kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewBid { .. } => "NewBid",
            Self::NewMatch { .. } => "NewMatch",
            Self::NewTradeAgreement { .. } => "NewTradeAgreement",
            Self::VolumeClaimed { .. } => "VolumeClaimed",
            Self::VolumeConfirmed { .. } => "VolumeConfirmed",
            Self::NewPaymentAgreement { .. } => "NewPaymentAgreement",
            Self::AmountClaimed { .. } => "AmountClaimed",
            Self::AmountConfirmed { .. } => "AmountConfirmed",
            Self::PaymentAgreementFinished { .. } => "PaymentAgreementFinished",
        }
    }
}

impl std::fmt::Display for MarketEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
