//! Off-ledger bid content and its signature envelope.
//!
//! The ledger stores only a [`ContentPath`] per bid; the bid's terms live in
//! the content-addressed object store as a [`SignedBid`]. The marketplace
//! accepts only bids whose signature verifies against the verifying key
//! registered for the claimed owner.

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, BarterError, Bid, BidKind, ContentPath, Result};

/// The terms of a bid as stored off-ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidContent {
    pub kind: BidKind,
    pub unit_price: Decimal,
    pub volume: Decimal,
    pub expires: DateTime<Utc>,
    pub owner: Address,
}

impl BidContent {
    /// Canonical signing payload for ed25519 verification.
    ///
    /// Format: `"openbarter:bid:v1:" || kind || unit_price || volume || expires_ms || owner`
    #[must_use]
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(128);
        payload.extend_from_slice(b"openbarter:bid:v1:");
        payload.push(match self.kind {
            BidKind::Offer => 0,
            BidKind::Demand => 1,
        });
        payload.extend_from_slice(self.unit_price.to_string().as_bytes());
        payload.extend_from_slice(self.volume.to_string().as_bytes());
        payload.extend_from_slice(&self.expires.timestamp_millis().to_le_bytes());
        payload.extend_from_slice(self.owner.as_bytes());
        payload
    }

    /// Sign the content with the owner's key.
    #[must_use]
    pub fn sign(self, key: &SigningKey) -> SignedBid {
        let signature = key.sign(&self.signing_payload()).to_bytes().to_vec();
        SignedBid {
            content: self,
            signature,
        }
    }

    /// The ledger-side view of this content: an all-or-nothing [`Bid`]
    /// referencing the given object-store path.
    #[must_use]
    pub fn to_bid(&self, path: ContentPath) -> Bid {
        Bid::all_or_nothing(
            self.owner,
            path,
            self.kind,
            self.volume,
            self.unit_price,
            self.expires,
        )
    }
}

/// Signed bid content as held by the object store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedBid {
    pub content: BidContent,
    /// Ed25519 signature over [`BidContent::signing_payload`].
    pub signature: Vec<u8>,
}

impl SignedBid {
    /// Verify the signature against the owner's registered verifying key.
    pub fn verify(&self, key: &VerifyingKey) -> Result<()> {
        let invalid = || BarterError::SignatureInvalid {
            owner: self.content.owner,
        };
        let signature = Signature::from_slice(&self.signature).map_err(|_| invalid())?;
        key.verify(&self.content.signing_payload(), &signature)
            .map_err(|_| invalid())
    }

    /// Canonical serialized form used for content addressing.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// The content-addressed path this payload stores under.
    pub fn content_path(&self) -> Result<ContentPath> {
        Ok(ContentPath::for_payload(&self.canonical_bytes()?))
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl BidContent {
    pub fn dummy(kind: BidKind, unit_price: Decimal, volume: Decimal, owner: Address) -> Self {
        Self {
            kind,
            unit_price,
            volume,
            expires: Utc::now() + chrono::Duration::hours(1),
            owner,
        }
    }
}
