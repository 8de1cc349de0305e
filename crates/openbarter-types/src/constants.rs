//! System-wide constants for the OpenBarter marketplace.

/// Maximum decimal precision for unit prices (8 decimal places).
pub const PRICE_PRECISION: u32 = 8;

/// Maximum decimal precision for volumes (8 decimal places).
pub const VOLUME_PRECISION: u32 = 8;

/// Magnitude cap on unit prices and volumes (10^12). Keeps every
/// `volume × unit_price` product representable in `Decimal`.
pub const MAX_MAGNITUDE: i64 = 1_000_000_000_000;

/// Default capacity of the domain-event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Maximum bids considered in a single matching pass.
pub const DEFAULT_MAX_BIDS_PER_PASS: usize = 10_000;

/// Whether expired matches are rejected at acceptance time by default.
pub const DEFAULT_ENFORCE_EXPIRY: bool = true;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenBarter";
