//! End-to-end exercise of the full pipeline through the marketplace:
//! signed publication, matching pass, mutual acceptance, staged delivery,
//! staged payment, and the event stream recorded along the way.

use chrono::Utc;
use ed25519_dalek::SigningKey;
use openbarter_ledger::{EventEnvelope, InMemoryLedger, Marketplace, MemoryObjectStore};
use openbarter_types::{
    Address, BarterError, BidContent, BidKind, BidStatus, MarketplaceConfig,
};
use rand::rngs::OsRng;
use rust_decimal::Decimal;
use tokio::sync::broadcast;

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

struct Trader {
    key: SigningKey,
    address: Address,
}

fn trader(market: &mut Marketplace<InMemoryLedger, MemoryObjectStore>) -> Trader {
    let key = SigningKey::generate(&mut OsRng);
    let address = Address::from_verifying_key(&key.verifying_key());
    market
        .register_signer(address, key.verifying_key())
        .expect("fresh key registers");
    Trader { key, address }
}

fn drain_names(rx: &mut broadcast::Receiver<EventEnvelope>) -> Vec<&'static str> {
    let mut names = Vec::new();
    while let Ok(envelope) = rx.try_recv() {
        names.push(envelope.event.name());
    }
    names
}

#[test]
fn full_lifecycle_from_publication_to_finished_payment() {
    let mut market = Marketplace::in_memory(MarketplaceConfig::default());
    let seller = trader(&mut market);
    let buyer = trader(&mut market);
    let mut events = market.subscribe();

    // Seller offers 10 units at a floor of 2; buyer demands 10 at a
    // ceiling of 2. Clearing price is 2, notional 20.
    let offer_id = market
        .publish_bid(BidContent::dummy(BidKind::Offer, dec(2), dec(10), seller.address).sign(&seller.key))
        .unwrap();
    let demand_id = market
        .publish_bid(BidContent::dummy(BidKind::Demand, dec(2), dec(10), buyer.address).sign(&buyer.key))
        .unwrap();

    let committed = market.run_matching_pass(Utc::now()).unwrap();
    assert_eq!(committed.len(), 1);
    let match_id = committed[0];

    let mtch = market.get_match(match_id).unwrap();
    assert_eq!(mtch.volume, dec(10));
    assert_eq!(mtch.unit_price, dec(2));
    assert_eq!(market.bid(offer_id).unwrap().status, BidStatus::Matched);
    assert_eq!(market.bid(demand_id).unwrap().status, BidStatus::Matched);

    // Mutual acceptance: the first accept spawns nothing, the second
    // spawns the trade agreement.
    assert!(
        market
            .accept_offer(buyer.address, match_id, Utc::now())
            .unwrap()
            .is_none()
    );
    let ta_id = market
        .accept_demand(seller.address, match_id, Utc::now())
        .unwrap()
        .expect("second accept spawns the trade agreement");

    // Staged delivery: claims and confirms in unequal increments.
    market.claim_volume(seller.address, ta_id, dec(6)).unwrap();
    assert!(market.confirm_volume(buyer.address, ta_id, dec(6)).unwrap().is_none());
    market.claim_volume(seller.address, ta_id, dec(4)).unwrap();
    let pa_id = market
        .confirm_volume(buyer.address, ta_id, dec(4))
        .unwrap()
        .expect("goal-reaching confirm spawns the payment agreement");

    let ta = market.trade_agreement(ta_id).unwrap();
    assert!(ta.is_fulfilled());
    assert_eq!(ta.volume_actual, dec(10));

    // Staged payment of the 20 owed.
    let pa = market.payment_agreement(pa_id).unwrap();
    assert_eq!(pa.amount_goal, dec(20));

    market.claim_amount(buyer.address, pa_id, dec(15)).unwrap();
    assert!(!market.confirm_amount(seller.address, pa_id, dec(15)).unwrap());
    market.claim_amount(buyer.address, pa_id, dec(5)).unwrap();
    assert!(market.confirm_amount(seller.address, pa_id, dec(5)).unwrap());

    let pa = market.payment_agreement(pa_id).unwrap();
    assert!(pa.finished);
    assert_eq!(pa.amount_actual, dec(20));

    assert_eq!(
        drain_names(&mut events),
        vec![
            "NewBid",
            "NewBid",
            "NewMatch",
            "NewTradeAgreement",
            "VolumeClaimed",
            "VolumeConfirmed",
            "VolumeClaimed",
            "VolumeConfirmed",
            "NewPaymentAgreement",
            "AmountClaimed",
            "AmountConfirmed",
            "AmountClaimed",
            "AmountConfirmed",
            "PaymentAgreementFinished",
        ]
    );
}

#[test]
fn double_accept_of_the_same_side_is_rejected() {
    let mut market = Marketplace::in_memory(MarketplaceConfig::default());
    let seller = trader(&mut market);
    let buyer = trader(&mut market);

    market
        .publish_bid(BidContent::dummy(BidKind::Offer, dec(2), dec(10), seller.address).sign(&seller.key))
        .unwrap();
    market
        .publish_bid(BidContent::dummy(BidKind::Demand, dec(2), dec(10), buyer.address).sign(&buyer.key))
        .unwrap();
    let match_id = market.run_matching_pass(Utc::now()).unwrap()[0];

    market
        .accept_offer(buyer.address, match_id, Utc::now())
        .unwrap();
    let err = market
        .accept_offer(buyer.address, match_id, Utc::now())
        .unwrap_err();
    assert!(matches!(err, BarterError::AlreadyAccepted { .. }));

    // The rejection left the match intact; the other side still completes.
    assert!(
        market
            .accept_demand(seller.address, match_id, Utc::now())
            .unwrap()
            .is_some()
    );
}

#[test]
fn stranger_cannot_drive_someone_elses_settlement() {
    let mut market = Marketplace::in_memory(MarketplaceConfig::default());
    let seller = trader(&mut market);
    let buyer = trader(&mut market);
    let stranger = trader(&mut market);

    market
        .publish_bid(BidContent::dummy(BidKind::Offer, dec(2), dec(10), seller.address).sign(&seller.key))
        .unwrap();
    market
        .publish_bid(BidContent::dummy(BidKind::Demand, dec(2), dec(10), buyer.address).sign(&buyer.key))
        .unwrap();
    let match_id = market.run_matching_pass(Utc::now()).unwrap()[0];

    assert!(matches!(
        market
            .accept_offer(stranger.address, match_id, Utc::now())
            .unwrap_err(),
        BarterError::Unauthorized { .. }
    ));

    market
        .accept_offer(buyer.address, match_id, Utc::now())
        .unwrap();
    let ta_id = market
        .accept_demand(seller.address, match_id, Utc::now())
        .unwrap()
        .unwrap();
    market.claim_volume(seller.address, ta_id, dec(10)).unwrap();

    assert!(matches!(
        market
            .confirm_volume(stranger.address, ta_id, dec(10))
            .unwrap_err(),
        BarterError::Unauthorized { .. }
    ));
    let ta = market.trade_agreement(ta_id).unwrap();
    assert_eq!(ta.volume_actual, Decimal::ZERO);
}

#[test]
fn unmatched_remainder_matches_in_a_later_pass() {
    let mut market = Marketplace::in_memory(MarketplaceConfig::default());
    let seller = trader(&mut market);
    let buyer = trader(&mut market);

    // Two offers, one demand: one offer survives the first pass open.
    market
        .publish_bid(BidContent::dummy(BidKind::Offer, dec(2), dec(10), seller.address).sign(&seller.key))
        .unwrap();
    let second_offer = market
        .publish_bid(BidContent::dummy(BidKind::Offer, dec(3), dec(10), seller.address).sign(&seller.key))
        .unwrap();
    market
        .publish_bid(BidContent::dummy(BidKind::Demand, dec(5), dec(10), buyer.address).sign(&buyer.key))
        .unwrap();

    assert_eq!(market.run_matching_pass(Utc::now()).unwrap().len(), 1);
    assert_eq!(market.bid(second_offer).unwrap().status, BidStatus::Open);

    // A new demand arrives; the leftover offer clears on the next pass.
    market
        .publish_bid(BidContent::dummy(BidKind::Demand, dec(4), dec(10), buyer.address).sign(&buyer.key))
        .unwrap();
    let committed = market.run_matching_pass(Utc::now()).unwrap();
    assert_eq!(committed.len(), 1);
    assert_eq!(market.get_match(committed[0]).unwrap().unit_price, dec(3));
    assert_eq!(market.bid(second_offer).unwrap().status, BidStatus::Matched);
}
