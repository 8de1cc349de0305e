//! Content-addressed, signature-verified storage for off-ledger payloads.
//!
//! The ledger records a [`ContentPath`] per bid; the signed terms live
//! here. Retrieval verifies the payload's signature against the owner's
//! registered verifying key, so a tampered or mis-attributed payload never
//! reaches the matcher.

use std::collections::HashMap;

use ed25519_dalek::VerifyingKey;
use openbarter_types::{Address, BarterError, ContentPath, Result, SignedBid};

/// Verifying keys known to this marketplace, one per address.
///
/// A key can be registered exactly once; re-registration is rejected so an
/// address's identity cannot be silently swapped.
#[derive(Debug, Default)]
pub struct KeyRegistry {
    keys: HashMap<Address, VerifyingKey>,
}

impl KeyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, address: Address, key: VerifyingKey) -> Result<()> {
        if self.keys.contains_key(&address) {
            return Err(BarterError::SignerAlreadyRegistered(address));
        }
        self.keys.insert(address, key);
        Ok(())
    }

    pub fn verifying_key(&self, address: Address) -> Result<&VerifyingKey> {
        self.keys
            .get(&address)
            .ok_or(BarterError::UnknownSigner(address))
    }
}

/// The object-store boundary: store a signed bid, get its content path back;
/// retrieve a signed bid by path.
pub trait ObjectStore {
    fn store_bid(&mut self, signed: SignedBid) -> Result<ContentPath>;
    fn retrieve_bid(&self, path: &ContentPath) -> Result<SignedBid>;
}

/// In-memory object store keyed by content path.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: HashMap<ContentPath, SignedBid>,
}

impl MemoryObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn store_bid(&mut self, signed: SignedBid) -> Result<ContentPath> {
        let path = signed.content_path()?;
        // Content addressing: the same payload lands on the same path, so
        // re-storing is a no-op rather than a conflict.
        self.objects.insert(path.clone(), signed);
        Ok(path)
    }

    fn retrieve_bid(&self, path: &ContentPath) -> Result<SignedBid> {
        self.objects
            .get(path)
            .cloned()
            .ok_or_else(|| BarterError::ContentNotFound(path.clone()))
    }
}
