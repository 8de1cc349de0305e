//! The injected state store.
//!
//! The ledger owns all persisted entity state and serializes mutations: at
//! most one mutating operation is ever applied to a given entity at a time
//! (`&mut self` on every mutator). The core algorithms operate on copies
//! and hand back new states; nothing holds a reference across calls.
//!
//! `cas_bid_status` is the commit primitive for matching passes: a proposed
//! match is committed only if both constituent bids are still `Open` at
//! commit time.

use std::collections::BTreeMap;

use openbarter_types::{
    BarterError, Bid, BidId, BidStatus, Match, MatchId, PaymentAgreementId, Result,
    TradeAgreementId,
};

use openbarter_settlement::{PaymentAgreement, TradeAgreement};

/// Typed get/put/compare-and-swap over the ledger's entity tables.
pub trait LedgerStore {
    /// Append a bid; the ledger assigns the next index.
    fn put_bid(&mut self, bid: Bid) -> BidId;
    fn bid(&self, id: BidId) -> Result<Bid>;
    /// All bids in index order (ids are assigned sequentially, so this is
    /// also submission order).
    fn bids(&self) -> Vec<(BidId, Bid)>;
    /// Compare-and-swap a bid's status. Returns `false` without mutating
    /// when the current status is not `expected`.
    fn cas_bid_status(&mut self, id: BidId, expected: BidStatus, next: BidStatus) -> Result<bool>;

    fn put_match(&mut self, mtch: Match) -> MatchId;
    fn get_match(&self, id: MatchId) -> Result<Match>;
    fn update_match(&mut self, id: MatchId, mtch: Match) -> Result<()>;

    fn put_trade_agreement(&mut self, agreement: TradeAgreement) -> TradeAgreementId;
    fn trade_agreement(&self, id: TradeAgreementId) -> Result<TradeAgreement>;
    fn update_trade_agreement(&mut self, id: TradeAgreementId, agreement: TradeAgreement)
    -> Result<()>;

    fn put_payment_agreement(&mut self, agreement: PaymentAgreement) -> PaymentAgreementId;
    fn payment_agreement(&self, id: PaymentAgreementId) -> Result<PaymentAgreement>;
    fn update_payment_agreement(
        &mut self,
        id: PaymentAgreementId,
        agreement: PaymentAgreement,
    ) -> Result<()>;
}

/// In-memory ledger: append-only index-keyed tables.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    bids: BTreeMap<BidId, Bid>,
    matches: BTreeMap<MatchId, Match>,
    trade_agreements: BTreeMap<TradeAgreementId, TradeAgreement>,
    payment_agreements: BTreeMap<PaymentAgreementId, PaymentAgreement>,
    next_bid: BidId,
    next_match: MatchId,
    next_trade_agreement: TradeAgreementId,
    next_payment_agreement: PaymentAgreementId,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedger {
    fn put_bid(&mut self, bid: Bid) -> BidId {
        let id = self.next_bid;
        self.next_bid = id.next();
        self.bids.insert(id, bid);
        id
    }

    fn bid(&self, id: BidId) -> Result<Bid> {
        self.bids
            .get(&id)
            .cloned()
            .ok_or(BarterError::BidNotFound(id))
    }

    fn bids(&self) -> Vec<(BidId, Bid)> {
        self.bids.iter().map(|(id, b)| (*id, b.clone())).collect()
    }

    fn cas_bid_status(&mut self, id: BidId, expected: BidStatus, next: BidStatus) -> Result<bool> {
        let bid = self.bids.get_mut(&id).ok_or(BarterError::BidNotFound(id))?;
        if bid.status != expected {
            return Ok(false);
        }
        bid.status = next;
        Ok(true)
    }

    fn put_match(&mut self, mtch: Match) -> MatchId {
        let id = self.next_match;
        self.next_match = id.next();
        self.matches.insert(id, mtch);
        id
    }

    fn get_match(&self, id: MatchId) -> Result<Match> {
        self.matches
            .get(&id)
            .cloned()
            .ok_or(BarterError::MatchNotFound(id))
    }

    fn update_match(&mut self, id: MatchId, mtch: Match) -> Result<()> {
        match self.matches.get_mut(&id) {
            Some(slot) => {
                *slot = mtch;
                Ok(())
            }
            None => Err(BarterError::MatchNotFound(id)),
        }
    }

    fn put_trade_agreement(&mut self, agreement: TradeAgreement) -> TradeAgreementId {
        let id = self.next_trade_agreement;
        self.next_trade_agreement = id.next();
        self.trade_agreements.insert(id, agreement);
        id
    }

    fn trade_agreement(&self, id: TradeAgreementId) -> Result<TradeAgreement> {
        self.trade_agreements
            .get(&id)
            .cloned()
            .ok_or(BarterError::TradeAgreementNotFound(id))
    }

    fn update_trade_agreement(
        &mut self,
        id: TradeAgreementId,
        agreement: TradeAgreement,
    ) -> Result<()> {
        match self.trade_agreements.get_mut(&id) {
            Some(slot) => {
                *slot = agreement;
                Ok(())
            }
            None => Err(BarterError::TradeAgreementNotFound(id)),
        }
    }

    fn put_payment_agreement(&mut self, agreement: PaymentAgreement) -> PaymentAgreementId {
        let id = self.next_payment_agreement;
        self.next_payment_agreement = id.next();
        self.payment_agreements.insert(id, agreement);
        id
    }

    fn payment_agreement(&self, id: PaymentAgreementId) -> Result<PaymentAgreement> {
        self.payment_agreements
            .get(&id)
            .cloned()
            .ok_or(BarterError::PaymentAgreementNotFound(id))
    }

    fn update_payment_agreement(
        &mut self,
        id: PaymentAgreementId,
        agreement: PaymentAgreement,
    ) -> Result<()> {
        match self.payment_agreements.get_mut(&id) {
            Some(slot) => {
                *slot = agreement;
                Ok(())
            }
            None => Err(BarterError::PaymentAgreementNotFound(id)),
        }
    }
}
