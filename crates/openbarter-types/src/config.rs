//! Configuration for a marketplace instance.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for a marketplace instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Capacity of the domain-event broadcast channel. Slow subscribers
    /// that fall further behind than this lose the oldest events.
    pub event_capacity: usize,
    /// Reject acceptance of expired matches. Expired bids are always
    /// excluded from matching passes regardless of this flag.
    pub enforce_expiry: bool,
    /// Upper bound on the number of bids snapshotted into one matching pass.
    pub max_bids_per_pass: usize,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            event_capacity: constants::DEFAULT_EVENT_CAPACITY,
            enforce_expiry: constants::DEFAULT_ENFORCE_EXPIRY,
            max_bids_per_pass: constants::DEFAULT_MAX_BIDS_PER_PASS,
        }
    }
}
