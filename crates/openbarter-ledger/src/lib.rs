//! # openbarter-ledger
//!
//! **System-of-record boundary** for OpenBarter: everything the pure core
//! needs injected to behave like a marketplace.
//!
//! - [`LedgerStore`]: typed get/put/compare-and-swap over the entity tables;
//!   the ledger is the sole owner and sole mutator of persisted state and
//!   serializes every transition
//! - [`ObjectStore`] + [`KeyRegistry`]: content-addressed, signature-verified
//!   storage for off-ledger bid payloads
//! - [`EventBus`]: strongly-typed domain events over a broadcast channel
//! - [`Marketplace`]: the orchestrator wiring bids through the matcher and
//!   the settlement state machines, one transaction per external call

pub mod events;
pub mod marketplace;
pub mod object_store;
pub mod store;

pub use events::{EventBus, EventEnvelope};
pub use marketplace::Marketplace;
pub use object_store::{KeyRegistry, MemoryObjectStore, ObjectStore};
pub use store::{InMemoryLedger, LedgerStore};
