//! Typed domain-event channel.
//!
//! Replaces topic-hash log decoding with a broadcast channel of
//! strongly-typed [`MarketEvent`]s. Observers subscribe; the core never
//! consumes its own events. Emission never blocks and never fails: with no
//! subscribers the event is simply dropped, like an unwatched log.

use chrono::{DateTime, Utc};
use openbarter_types::{EventId, MarketEvent};
use tokio::sync::broadcast;

/// A domain event with its audit identity.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    /// UUIDv7: an event log sorted by id is sorted by emission time.
    pub id: EventId,
    pub emitted_at: DateTime<Utc>,
    pub event: MarketEvent,
}

/// Broadcast channel for domain events.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus. Subscribers lagging more than `capacity` events behind
    /// lose the oldest ones.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all events emitted after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    /// Emit an event to all current subscribers.
    pub fn emit(&self, event: MarketEvent) {
        let envelope = EventEnvelope {
            id: EventId::new(),
            emitted_at: Utc::now(),
            event,
        };
        tracing::debug!(event = envelope.event.name(), id = %envelope.id, "emit");
        // A send error only means there are no subscribers right now.
        let _ = self.tx.send(envelope);
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
