//! The marketplace orchestrator.
//!
//! One external call, one transaction: every method loads the entity,
//! applies a state-machine transition, and persists the new state only if
//! the transition succeeded. A failed authorization or bound check leaves
//! the ledger untouched — there is no partial application.
//!
//! Caller identity is an explicit `caller` parameter here; a real deployment
//! supplies it from the transport's authenticated transaction context.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use openbarter_matchcore::{BidBook, match_bids};
use openbarter_settlement::{
    PaymentAgreement, TradeAgreement, accept_as_demand_owner, accept_as_offer_owner,
};
use openbarter_types::{
    Address, BarterError, Bid, BidContent, BidId, BidStatus, ContentPath, MarketEvent,
    MarketplaceConfig, Match, MatchId, PaymentAgreementId, Result, SignedBid, TradeAgreementId,
    constants,
};
use tokio::sync::broadcast;

use crate::events::{EventBus, EventEnvelope};
use crate::object_store::{KeyRegistry, MemoryObjectStore, ObjectStore};
use crate::store::{InMemoryLedger, LedgerStore};

/// Ties the injected state store, the object store, the signer registry,
/// and the event bus into one marketplace instance.
pub struct Marketplace<S, O> {
    config: MarketplaceConfig,
    store: S,
    objects: O,
    keys: KeyRegistry,
    events: EventBus,
}

impl Marketplace<InMemoryLedger, MemoryObjectStore> {
    /// A fully in-memory marketplace, as used by tests and simulations.
    #[must_use]
    pub fn in_memory(config: MarketplaceConfig) -> Self {
        Self::new(config, InMemoryLedger::new(), MemoryObjectStore::new())
    }
}

impl<S: LedgerStore, O: ObjectStore> Marketplace<S, O> {
    #[must_use]
    pub fn new(config: MarketplaceConfig, store: S, objects: O) -> Self {
        tracing::debug!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            "marketplace created"
        );
        let events = EventBus::new(config.event_capacity);
        Self {
            config,
            store,
            objects,
            keys: KeyRegistry::new(),
            events,
        }
    }

    /// Subscribe to the domain-event stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    /// Register a participant's verifying key. One key per address, ever.
    pub fn register_signer(&mut self, address: Address, key: ed25519_dalek::VerifyingKey)
    -> Result<()> {
        self.keys.register(address, key)
    }

    // =================================================================
    // Bids
    // =================================================================

    /// Verify, store, and record a signed bid.
    ///
    /// The signature must verify against the owner's registered key and the
    /// terms must pass boundary validation before anything is persisted.
    pub fn publish_bid(&mut self, signed: SignedBid) -> Result<BidId> {
        let owner = signed.content.owner;
        let key = self.keys.verifying_key(owner)?;
        signed.verify(key)?;

        let bid = signed.content.to_bid(signed.content_path()?);
        bid.validate()?;

        let path = self.objects.store_bid(signed)?;
        debug_assert_eq!(path, bid.path);
        let id = self.store.put_bid(bid);
        tracing::info!(bid_id = %id, %owner, "bid published");
        self.events.emit(MarketEvent::NewBid { id, owner });
        Ok(id)
    }

    /// Publish a batch of signed bids. Stops at the first invalid bid;
    /// bids published before the failure stay published.
    pub fn publish_bids(&mut self, batch: Vec<SignedBid>) -> Result<Vec<BidId>> {
        let mut ids = Vec::with_capacity(batch.len());
        for signed in batch {
            ids.push(self.publish_bid(signed)?);
        }
        Ok(ids)
    }

    pub fn bid(&self, id: BidId) -> Result<Bid> {
        self.store.bid(id)
    }

    /// Retrieve a bid's off-ledger terms, re-verifying the signature.
    pub fn bid_content(&self, id: BidId) -> Result<BidContent> {
        let bid = self.store.bid(id)?;
        let signed = self.objects.retrieve_bid(&bid.path)?;
        signed.verify(self.keys.verifying_key(signed.content.owner)?)?;
        Ok(signed.content)
    }

    // =================================================================
    // Matching
    // =================================================================

    /// Run one matching pass over the open, unexpired bids and commit the
    /// resulting matches under compare-and-swap.
    ///
    /// The matcher runs on an immutable snapshot; each proposed match is
    /// committed only if both constituent bids are still `Open` at commit
    /// time. A candidate that loses the swap is discarded, its already-
    /// swapped side reverted, and matching continues with the next one.
    pub fn run_matching_pass(&mut self, now: DateTime<Utc>) -> Result<Vec<MatchId>> {
        let mut book = BidBook::new();
        let mut path_index: HashMap<ContentPath, BidId> = HashMap::new();
        for (id, bid) in self.store.bids() {
            if book.len() >= self.config.max_bids_per_pass {
                break;
            }
            if !bid.is_open() || bid.is_expired(now) {
                continue;
            }
            path_index.insert(bid.path.clone(), id);
            book.insert(bid)?;
        }

        let snapshot = book.live_snapshot(now);
        let proposed = match_bids(&snapshot);
        tracing::debug!(
            bids = snapshot.len(),
            candidates = proposed.len(),
            "matching pass"
        );

        let mut committed = Vec::with_capacity(proposed.len());
        for mtch in proposed {
            // Every match references bids drawn from the snapshot above.
            let (Some(&offer_id), Some(&demand_id)) = (
                path_index.get(&mtch.offer_path),
                path_index.get(&mtch.demand_path),
            ) else {
                continue;
            };

            if !self
                .store
                .cas_bid_status(offer_id, BidStatus::Open, BidStatus::Matched)?
            {
                tracing::debug!(bid_id = %offer_id, "discarding candidate: offer no longer open");
                continue;
            }
            if !self
                .store
                .cas_bid_status(demand_id, BidStatus::Open, BidStatus::Matched)?
            {
                // Undo the half-applied swap before discarding.
                self.store
                    .cas_bid_status(offer_id, BidStatus::Matched, BidStatus::Open)?;
                tracing::debug!(bid_id = %demand_id, "discarding candidate: demand no longer open");
                continue;
            }

            committed.push(self.commit_match(mtch));
        }
        Ok(committed)
    }

    /// Direct match publication, bypassing the matcher. Terms are validated
    /// to the matcher's rule (positive, capped volume and price) and the
    /// acceptance flags are reset: a published match always starts
    /// unaccepted.
    pub fn publish_match(&mut self, mut mtch: Match) -> Result<MatchId> {
        mtch.validate()?;
        mtch.offer_accepted = false;
        mtch.demand_accepted = false;
        mtch.agreement_created = false;
        Ok(self.commit_match(mtch))
    }

    fn commit_match(&mut self, mtch: Match) -> MatchId {
        let (offer_owner, demand_owner) = (mtch.offer_owner, mtch.demand_owner);
        let id = self.store.put_match(mtch);
        tracing::info!(match_id = %id, %offer_owner, %demand_owner, "match committed");
        self.events.emit(MarketEvent::NewMatch {
            id,
            offer_owner,
            demand_owner,
        });
        id
    }

    pub fn get_match(&self, id: MatchId) -> Result<Match> {
        self.store.get_match(id)
    }

    // =================================================================
    // Acceptance
    // =================================================================

    /// The demand owner accepts the offer side of the match.
    ///
    /// Expiry is evaluated against the injected `now` when enforcement is
    /// configured on. Returns the id of the trade agreement if this accept
    /// completed the pair and spawned it.
    pub fn accept_offer(
        &mut self,
        caller: Address,
        match_id: MatchId,
        now: DateTime<Utc>,
    ) -> Result<Option<TradeAgreementId>> {
        let mut mtch = self.load_acceptable(match_id, now)?;
        let spawned = accept_as_demand_owner(&mut mtch, caller)?;
        self.store.update_match(match_id, mtch)?;
        Ok(self.record_spawned_agreement(match_id, spawned))
    }

    /// The offer owner accepts the demand side of the match.
    pub fn accept_demand(
        &mut self,
        caller: Address,
        match_id: MatchId,
        now: DateTime<Utc>,
    ) -> Result<Option<TradeAgreementId>> {
        let mut mtch = self.load_acceptable(match_id, now)?;
        let spawned = accept_as_offer_owner(&mut mtch, caller)?;
        self.store.update_match(match_id, mtch)?;
        Ok(self.record_spawned_agreement(match_id, spawned))
    }

    fn load_acceptable(&self, match_id: MatchId, now: DateTime<Utc>) -> Result<Match> {
        let mtch = self.store.get_match(match_id)?;
        if self.config.enforce_expiry && mtch.is_expired(now) {
            return Err(BarterError::MatchExpired(match_id));
        }
        Ok(mtch)
    }

    fn record_spawned_agreement(
        &mut self,
        match_id: MatchId,
        spawned: Option<TradeAgreement>,
    ) -> Option<TradeAgreementId> {
        let agreement = spawned?;
        let (offer_owner, demand_owner) = (agreement.offer_owner, agreement.demand_owner);
        let id = self.store.put_trade_agreement(agreement);
        tracing::info!(%match_id, agreement_id = %id, "both sides accepted, trade agreement created");
        self.events.emit(MarketEvent::NewTradeAgreement {
            id,
            offer_owner,
            demand_owner,
        });
        Some(id)
    }

    // =================================================================
    // Delivery
    // =================================================================

    /// The offer owner claims `amount` more delivered volume.
    pub fn claim_volume(
        &mut self,
        caller: Address,
        id: TradeAgreementId,
        amount: rust_decimal::Decimal,
    ) -> Result<()> {
        let mut agreement = self.store.trade_agreement(id)?;
        agreement.claim_volume(caller, amount)?;
        let (offer_owner, demand_owner) = (agreement.offer_owner, agreement.demand_owner);
        self.store.update_trade_agreement(id, agreement)?;
        self.events.emit(MarketEvent::VolumeClaimed {
            id,
            offer_owner,
            demand_owner,
        });
        Ok(())
    }

    /// The demand owner confirms `amount` more delivered volume.
    ///
    /// Returns the id of the payment agreement if this confirm fulfilled
    /// the trade agreement and spawned it.
    pub fn confirm_volume(
        &mut self,
        caller: Address,
        id: TradeAgreementId,
        amount: rust_decimal::Decimal,
    ) -> Result<Option<PaymentAgreementId>> {
        let mut agreement = self.store.trade_agreement(id)?;
        let spawned = agreement.confirm_volume(caller, amount)?;
        let (offer_owner, demand_owner) = (agreement.offer_owner, agreement.demand_owner);
        self.store.update_trade_agreement(id, agreement)?;
        self.events.emit(MarketEvent::VolumeConfirmed {
            id,
            offer_owner,
            demand_owner,
        });

        let Some(payment) = spawned else {
            return Ok(None);
        };
        let payment_id = self.store.put_payment_agreement(payment);
        tracing::info!(agreement_id = %id, payment_id = %payment_id, "delivery fulfilled, payment agreement created");
        self.events.emit(MarketEvent::NewPaymentAgreement {
            id: payment_id,
            offer_owner,
            demand_owner,
        });
        Ok(Some(payment_id))
    }

    pub fn trade_agreement(&self, id: TradeAgreementId) -> Result<TradeAgreement> {
        self.store.trade_agreement(id)
    }

    // =================================================================
    // Payment
    // =================================================================

    /// The demand owner (payer) claims `amount` more paid.
    pub fn claim_amount(
        &mut self,
        caller: Address,
        id: PaymentAgreementId,
        amount: rust_decimal::Decimal,
    ) -> Result<()> {
        let mut agreement = self.store.payment_agreement(id)?;
        agreement.claim_amount(caller, amount)?;
        let (offer_owner, demand_owner) = (agreement.offer_owner, agreement.demand_owner);
        self.store.update_payment_agreement(id, agreement)?;
        self.events.emit(MarketEvent::AmountClaimed {
            id,
            offer_owner,
            demand_owner,
        });
        Ok(())
    }

    /// The offer owner (payee) confirms receipt of `amount` more.
    ///
    /// Returns `true` when this confirm finished the payment agreement —
    /// the terminal transition of the settlement pipeline.
    pub fn confirm_amount(
        &mut self,
        caller: Address,
        id: PaymentAgreementId,
        amount: rust_decimal::Decimal,
    ) -> Result<bool> {
        let mut agreement = self.store.payment_agreement(id)?;
        let finished = agreement.confirm_amount(caller, amount)?;
        let (offer_owner, demand_owner) = (agreement.offer_owner, agreement.demand_owner);
        self.store.update_payment_agreement(id, agreement)?;
        self.events.emit(MarketEvent::AmountConfirmed {
            id,
            offer_owner,
            demand_owner,
        });

        if finished {
            tracing::info!(payment_id = %id, "payment agreement finished");
            self.events.emit(MarketEvent::PaymentAgreementFinished {
                id,
                offer_owner,
                demand_owner,
            });
        }
        Ok(finished)
    }

    pub fn payment_agreement(&self, id: PaymentAgreementId) -> Result<PaymentAgreement> {
        self.store.payment_agreement(id)
    }

    /// Direct access to the underlying store, for collaborators that layer
    /// their own reads on top.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
